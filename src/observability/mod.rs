//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Forwarder and HTTP layer produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stderr (fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Every HTTP request span records its `request_id`
//!   (`http::RequestIdSpan`)
//! - Metric updates go through the `metrics` facade and are no-ops
//!   until an exporter is installed

pub mod logging;
pub mod metrics;
