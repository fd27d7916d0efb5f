//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the forwarder produce:
//!     → logging.rs (structured log events, tagged with the request ID span)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, when enabled)
//! ```

pub mod logging;
pub mod metrics;
