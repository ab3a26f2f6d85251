//! Core types for Pocket Shop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod gid;
pub mod locale;
pub mod price;

pub use email::{Email, EmailError};
pub use gid::*;
pub use locale::{CountryCode, Language, LocaleError, TextDirection};
pub use price::{CurrencyCode, Price, PriceError};
