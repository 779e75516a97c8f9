//! HTTP middleware for the storefront.
//!
//! - [`request_id`] - request correlation IDs
//! - [`security_headers`] - restrictive response headers
//! - [`tenant`] - Host-header tenant resolution and render-mode detection

pub mod request_id;
pub mod security_headers;
pub mod tenant;

pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use tenant::{Tenant, tenant_middleware};
