//! Pocket Shop Storefront library.
//!
//! Everything under the screens of the mobile storefront: the Storefront API
//! client, device-local persistence, the customer session, typed navigation,
//! headless view-models and the cart. The UI layer renders what these expose.
//!
//! # Startup
//!
//! ```rust,ignore
//! let config = StorefrontConfig::from_env()?;
//! let app = AppState::connect(config).await?;
//! app.session().restore().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod navigation;
pub mod screens;
pub mod session;
pub mod shopify;
pub mod state;
pub mod store;

pub use state::AppState;
