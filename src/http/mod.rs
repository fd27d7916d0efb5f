//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, query parameters, caller headers)
//!     → proxy.rs (GET / POST handlers)
//!     → relay::Forwarder (one upstream call)
//!     → response.rs (text/html + cache directive, or error status)
//!     → Send to client
//! ```

pub mod proxy;
pub mod request;
pub mod response;
pub mod server;

pub use request::{ProxyParams, X_REQUEST_ID};
pub use response::CachePolicy;
pub use server::{create_router, AppState, HttpServer, ServerError, PROXY_PATH};
