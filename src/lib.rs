//! Per-IP rate limiting for booking endpoints.
//!
//! Throttles booking creation with a fixed-window counter keyed by client
//! IP, built on Axum and Tokio.
//!
//! # Features
//!
//! - **Fixed-window counting**: `max_attempts` bookings per window, counter
//!   reset entirely when the window elapses
//! - **Proxy-aware identity**: client IP resolved from forwarded headers in
//!   a fixed precedence order, failing open when unresolvable
//! - **Tower middleware**: admitted responses carry `X-RateLimit-*` headers,
//!   denials answer 429 with `Retry-After` and a JSON body
//! - **Admin operations**: per-client status snapshots, single-client clear,
//!   full reset
//! - **Background sweep**: cancellable periodic task removing expired
//!   records
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::{routing::post, Router};
//! use booking_ratelimit::{RateLimitConfig, RateLimitLayer};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Initialize logging
//!     booking_ratelimit::init_tracing();
//!
//!     let layer = RateLimitLayer::new(RateLimitConfig::default())
//!         .expect("default config is valid");
//!
//!     let app: Router = Router::new()
//!         .route("/bookings", post(|| async { "confirmed" }))
//!         .layer(layer);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```
//!
//! The store is in-memory and per-process: every replica counts
//! independently, so horizontal scaling multiplies the effective limit.

mod client_ip;
mod clock;
mod config;
mod error;
mod layer;
mod limiter;
mod store;
mod sweeper;

// Re-exports for public API
pub use client_ip::client_ip;
pub use clock::{Clock, MockClock, SystemClock};
pub use config::{RateLimitConfig, RateLimitConfigBuilder};
pub use error::{RateLimitError, Result};
pub use layer::{RateLimitLayer, RateLimitService};
pub use limiter::{BookingRateLimiter, Decision, RateLimitStatus};
pub use store::{AttemptRecord, AttemptStore};
pub use sweeper::{DEFAULT_SWEEP_INTERVAL, SweeperHandle};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging with sensible defaults
///
/// This should be called early in your application, typically in main().
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "debug", "booking_ratelimit=debug")
/// - `BOOKING_LOG_JSON`: Set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = std::env::var("BOOKING_LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
