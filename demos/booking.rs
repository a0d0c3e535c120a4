//! Minimal booking API protected by the rate limiter.
//!
//! Run with `cargo run --example booking`, then:
//!
//! ```sh
//! curl -i -X POST -H 'x-forwarded-for: 203.0.113.9' http://127.0.0.1:3000/bookings
//! ```
//!
//! The fourth attempt from the same address answers 429.

use axum::{Json, Router, routing::post};
use booking_ratelimit::{
    BookingRateLimiter, DEFAULT_SWEEP_INTERVAL, RateLimitConfig, RateLimitLayer,
};
use serde_json::json;

#[tokio::main]
async fn main() {
    booking_ratelimit::init_tracing();

    let config = RateLimitConfig::builder()
        .max_attempts(3)
        .window_ms(60_000)
        .build();
    let limiter = BookingRateLimiter::new(config).expect("config is valid");
    let sweeper = limiter.start_sweeper(DEFAULT_SWEEP_INTERVAL);

    let app = Router::new()
        .route("/bookings", post(create_booking))
        .layer(RateLimitLayer::with_limiter(limiter));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000")
        .await
        .expect("bind 127.0.0.1:3000");
    println!("listening on http://127.0.0.1:3000");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .expect("server error");

    sweeper.shutdown().await;
}

async fn create_booking() -> Json<serde_json::Value> {
    Json(json!({ "status": "confirmed" }))
}
