//! HTTP hosting layer.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, HTTP request → InboundRequest)
//!     → Forwarder
//!     → response.rs (OutboundResponse → HTTP response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id, MakeRequestUuidV4, RequestIdSpan, X_REQUEST_ID};
pub use response::into_http_response;
pub use server::HttpServer;
