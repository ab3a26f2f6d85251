//! Pocket Shop Core - Shared types library.
//!
//! This crate provides common types used across all Pocket Shop components:
//! - `storefront` - Headless storefront client (session, API, navigation)
//! - `cli` - Command-line driver for the storefront client
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no persistence,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for Shopify global IDs, prices, emails, and locales

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
