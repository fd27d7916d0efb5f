//! Page relay library.
//!
//! Forwards browser GET and POST requests to a third-party site so the
//! page can be read without tripping cross-origin restrictions.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::{Forwarder, RelayError};
