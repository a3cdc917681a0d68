//! API Module
//!
//! HTTP handlers and routing: the composition root that wires the response
//! cache, its invalidation, and the login guard into a request pipeline.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `/api/articles...` - Cached article reads, invalidating writes
//! - `POST /api/auth/login` - Login behind the abuse guard
//! - `/api/cache...` - Cache diagnostics and manual invalidation

pub mod articles;
pub mod auth;
pub mod handlers;
pub mod routes;

pub use handlers::{AppState, CachePolicies};
pub use routes::create_router;
