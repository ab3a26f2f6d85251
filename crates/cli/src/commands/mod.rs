//! Subcommand implementations.

pub mod catalog;
pub mod migrate;
pub mod session;

use serde::Serialize;

use pocket_shop_storefront::error::{AppError, Result};

/// Print a result to stdout as pretty JSON. The only stdout writer.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Internal(format!("Failed to encode output: {e}")))?;

    #[allow(clippy::print_stdout)]
    {
        println!("{json}");
    }
    Ok(())
}
