//! API Module
//!
//! HTTP handlers and routing for the page cache.
//!
//! # Endpoints
//! - `GET /page?url=...` - Fetch a page through the cache
//! - `GET /count?url=...` - Read the access counter for a page
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
