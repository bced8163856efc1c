//! Authentication module for identifying the user behind a request.
//!
//! This module provides the public interface for the auth collaborator:
//! bearer-token validation, the `AuthUser` extractor that protected handlers
//! take as an argument, and the `/api/auth/me` route. Logging in and session
//! cookies are handled by the upstream identity provider that issues tokens.

pub mod routes;
pub mod handlers;
pub mod models;
pub mod middleware;
pub mod service;
pub mod errors;

// Re-exports for convenience
pub use handlers::*;
pub use models::*;
pub use routes::*;
pub use service::*;
pub use errors::*;
