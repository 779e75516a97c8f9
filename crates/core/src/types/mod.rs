//! Core types for Vitrine.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod price;

pub use category::ServiceCategory;
pub use id::*;
pub use price::{CurrencyCode, Price};
