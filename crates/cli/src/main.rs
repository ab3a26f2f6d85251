//! Pocket Shop CLI - drive the storefront client against a real shop.
//!
//! # Usage
//!
//! ```bash
//! # Create the device-local store
//! pocket-shop migrate
//!
//! # Sign in (password from POCKET_SHOP_PASSWORD or one line on stdin)
//! pocket-shop login -e ada@example.com
//!
//! # Restore the persisted session, renewing it if it expires within a week
//! pocket-shop restore
//!
//! # Browse
//! pocket-shop search "linen shirt" --sort price --reverse
//! pocket-shop product linen-shirt
//! pocket-shop highest-price
//!
//! # Bottom tabs for the current session, right-to-left
//! pocket-shop tabs --rtl
//! ```
//!
//! Results are printed to stdout as JSON; logs go to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pocket_shop_storefront::config::StorefrontConfig;
use pocket_shop_storefront::error::AppError;
use pocket_shop_storefront::shopify::SearchSortKey;

mod commands;

#[derive(Parser)]
#[command(name = "pocket-shop")]
#[command(author, version, about = "Pocket Shop storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the device-local store
    Migrate,
    /// Sign in with email and password
    Login {
        /// Customer email address
        #[arg(short, long)]
        email: String,
    },
    /// Sign out and forget the cart
    Logout,
    /// Show the signed-in customer
    Whoami,
    /// Restore the persisted session
    Restore,
    /// Search products
    Search {
        /// Search text
        query: String,

        /// Page size (Shopify caps pages at 250)
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(i64).range(1..=250))]
        first: i64,

        /// Cursor from a previous page
        #[arg(long)]
        after: Option<String>,

        /// Sort order
        #[arg(long, value_enum, default_value = "relevance")]
        sort: SortArg,

        /// Reverse the sort order
        #[arg(long)]
        reverse: bool,

        /// Lowest price
        #[arg(long)]
        min_price: Option<Decimal>,

        /// Highest price
        #[arg(long)]
        max_price: Option<Decimal>,
    },
    /// Show the price filter bounds
    HighestPrice,
    /// Show a product by handle
    Product {
        /// Product handle
        handle: String,
    },
    /// Show the bottom tabs for the current session
    Tabs {
        /// Lay out right-to-left (defaults to the configured language)
        #[arg(long)]
        rtl: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Relevance,
    Price,
}

impl From<SortArg> for SearchSortKey {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Relevance => Self::Relevance,
            SortArg::Price => Self::Price,
        }
    }
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pocket_shop_storefront=info,pocket_shop=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    if let Err(e) = run(cli, config).await {
        let message = e.report();
        tracing::error!(error = %e, "Command failed: {message}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), AppError> {
    if matches!(cli.command, Commands::Migrate) {
        return commands::migrate::run(&config).await;
    }

    let app = pocket_shop_storefront::AppState::connect(config).await?;

    match cli.command {
        Commands::Migrate => {}
        Commands::Login { email } => commands::session::login(&app, &email).await?,
        Commands::Logout => commands::session::logout(&app).await?,
        Commands::Whoami => commands::session::whoami(&app).await?,
        Commands::Restore => commands::session::restore(&app).await?,
        Commands::Search {
            query,
            first,
            after,
            sort,
            reverse,
            min_price,
            max_price,
        } => {
            let args = commands::catalog::SearchArgs {
                query,
                first,
                after,
                sort_key: sort.into(),
                reverse,
                min_price,
                max_price,
            };
            commands::catalog::search(&app, args).await?;
        }
        Commands::HighestPrice => commands::catalog::highest_price(&app).await?,
        Commands::Product { handle } => commands::catalog::product(&app, &handle).await?,
        Commands::Tabs { rtl } => commands::session::tabs(&app, rtl).await?,
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn search_first(args: &[&str]) -> Result<i64, clap::Error> {
        let cli = Cli::try_parse_from(["pocket-shop", "search", "shirt"].iter().chain(args))?;
        match cli.command {
            Commands::Search { first, .. } => Ok(first),
            _ => unreachable!("parsed a search command"),
        }
    }

    #[test]
    fn test_search_page_size_default() {
        assert_eq!(search_first(&[]).unwrap(), 10);
    }

    #[test]
    fn test_search_page_size_bounds() {
        assert_eq!(search_first(&["--first", "250"]).unwrap(), 250);
        assert!(search_first(&["--first", "0"]).is_err());
        assert!(search_first(&["--first", "-5"]).is_err());
        assert!(search_first(&["--first", "251"]).is_err());
    }
}
