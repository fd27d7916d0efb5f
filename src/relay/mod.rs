//! Forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! handler (http::proxy)
//!     → forward.rs (one outbound call)
//!         → headers.rs (profile + caller user agent)
//!         → referer.rs (POST only: override or derived)
//!     → inspect.rs (POST only: log-only scan of the response)
//!     → Bytes or RelayError back to the handler
//! ```

pub mod error;
pub mod forward;
pub mod headers;
pub mod inspect;
pub mod referer;

pub use error::RelayError;
pub use forward::Forwarder;
pub use headers::{HeaderSet, InvalidHeader};
pub use inspect::SubmissionReport;
pub use referer::resolve_referer;
