//! Vitrine Theme - Runtime theme resolution and component loading.
//!
//! Every Vitrine store renders the same logical UI slots (Navbar, Hero,
//! ProductDesc, Footer, ...), but each store may ship its own implementation
//! of any slot. This crate decides, at request time, which theme fragment to
//! render for a given store, caches that decision for the life of the
//! process, and falls back safely when the preferred fragment is absent.
//!
//! # Resolution pipeline
//!
//! ```text
//! StoreContext -> ThemeKey -> CandidatePaths -> ComponentLoader -> SlotHandle
//!                                   |                 ^
//!                                   +-- ResolutionCache (single-flight)
//! ```
//!
//! A slot resolves to the store's own fragment
//! (`{store}/{theme}/components/{name}`) when one exists, otherwise to the
//! business-category default
//! (`default/{category}/{variant}/components/{name}`), otherwise to nothing.
//! A missing store fragment is routine - most stores only customize a handful
//! of slots - so the fallback chain never surfaces an error.
//!
//! # Crate layout
//!
//! - [`key`] - addressing key derivation from tenant context
//! - [`path`] - candidate fragment locations for a slot
//! - [`fragment`] - loaded fragments and placeholder substitution
//! - [`source`] - where fragments come from (filesystem, in-memory)
//! - [`loader`] - primary-then-fallback loading
//! - [`cache`] - process-wide memoization of resolution outcomes
//! - [`engine`] - the assembled pipeline plus speculative preloading
//! - [`binding`] - per-request consumer API and render-error boundary

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod binding;
pub mod cache;
pub mod engine;
pub mod fragment;
pub mod key;
pub mod loader;
pub mod path;
pub mod source;

pub use binding::{RenderMode, ThemeBinding};
pub use cache::{CacheKey, ResolutionCache};
pub use engine::ThemeEngine;
pub use fragment::{Fragment, Props, RenderError};
pub use key::{StoreContext, ThemeKey};
pub use loader::{ComponentLoader, SlotHandle};
pub use path::{CandidatePaths, FragmentPath};
pub use source::{ComponentSource, FsComponentSource, LoadError, StaticComponentSource};
