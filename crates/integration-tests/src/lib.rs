//! Integration tests for Vitrine.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vitrine-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `theme_resolution` - Full resolution pipeline against instrumented and
//!   filesystem sources
//! - `theme_binding` - Per-request consumer behavior: render modes,
//!   placeholders, error boundary
//!
//! The tests here cross crate boundaries; single-module behavior is covered
//! by unit tests inside each crate.
