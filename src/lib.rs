//! Stateless HTTP forwarding gateway.
//!
//! Requests arriving under a fixed mount path are rewritten onto a single
//! backend origin, forwarded, and the backend's response relayed back with
//! binary bodies carried as base64.

pub mod config;
pub mod forwarder;
pub mod http;
pub mod invoke;
pub mod lifecycle;
pub mod observability;

pub use config::schema::GatewayConfig;
pub use forwarder::{Forwarder, InboundRequest, OutboundResponse};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
