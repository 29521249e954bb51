//! HTTP API layer for dzretour.
//!
//! The two public endpoints, their request/response shapes, the client IP
//! extractor, and the in-process fixed-window rate limiter.
//!
//! Built on Axum 0.8 with a Tower middleware stack applied by the server.

pub mod endpoints;
pub mod extractors;
pub mod rate_limit;
pub mod state;

pub use endpoints::router;
pub use extractors::ClientIp;
pub use rate_limit::{RateLimitDecision, RateLimitPolicy, RateLimiter};
pub use state::AppState;
