//! Vitrine Core - Shared types library.
//!
//! This crate provides common types used across all Vitrine components:
//! - `storefront` - Customer-facing multi-tenant e-commerce site
//! - `theme` - Runtime theme-resolution subsystem
//! - `cli` - Command-line tools for theme inspection
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no theme
//! loading. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and the
//!   business-category enumeration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
