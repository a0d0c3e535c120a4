//! Tower middleware translating rate limit decisions into HTTP responses.
//!
//! Mount on the booking-creation route. Admitted responses carry the
//! `X-RateLimit-Limit`, `X-RateLimit-Remaining` and `X-RateLimit-Reset`
//! headers; denials answer 429 with a JSON body and a `Retry-After`
//! header. Requests whose client identity cannot be resolved pass through
//! untouched.

use crate::client_ip::client_ip;
use crate::config::RateLimitConfig;
use crate::error::Result;
use crate::limiter::{BookingRateLimiter, Decision};
use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

/// Denial payload returned with HTTP 429.
#[derive(serde::Serialize)]
struct RateLimitExceeded {
    error: String,
    #[serde(rename = "retryAfter")]
    retry_after: u64,
    #[serde(skip)]
    limit: u32,
    #[serde(skip)]
    reset_at: u64,
}

impl IntoResponse for RateLimitExceeded {
    fn into_response(self) -> Response {
        (
            StatusCode::TOO_MANY_REQUESTS,
            [
                ("Retry-After", self.retry_after.to_string()),
                ("X-RateLimit-Limit", self.limit.to_string()),
                ("X-RateLimit-Remaining", "0".to_string()),
                ("X-RateLimit-Reset", self.reset_at.to_string()),
            ],
            axum::Json(self),
        )
            .into_response()
    }
}

/// Tower layer applying per-IP booking rate limits.
#[derive(Clone)]
pub struct RateLimitLayer {
    limiter: BookingRateLimiter,
}

impl RateLimitLayer {
    /// Build a layer with its own limiter. Fails on an invalid config.
    pub fn new(config: RateLimitConfig) -> Result<Self> {
        Ok(Self {
            limiter: BookingRateLimiter::new(config)?,
        })
    }

    /// Build a layer around an existing limiter, e.g. one shared with an
    /// admin surface or a running sweeper.
    pub fn with_limiter(limiter: BookingRateLimiter) -> Self {
        Self { limiter }
    }

    /// The limiter backing this layer.
    pub fn limiter(&self) -> &BookingRateLimiter {
        &self.limiter
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            limiter: self.limiter.clone(),
        }
    }
}

/// Tower service performing the admit/deny check per request.
#[derive(Clone)]
pub struct RateLimitService<S> {
    inner: S,
    limiter: BookingRateLimiter,
}

impl<S> Service<Request> for RateLimitService<S>
where
    S: Service<Request> + Clone + Send + Sync + 'static,
    S::Response: IntoResponse,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let ip = client_ip(req.headers());

        match self.limiter.check(ip.as_deref()) {
            Decision::Admitted {
                limit,
                remaining,
                reset_at,
            } => {
                let mut svc = self.inner.clone();
                Box::pin(async move {
                    let mut response = svc.call(req).await?.into_response();
                    set_rate_limit_headers(response.headers_mut(), limit, remaining, reset_at);
                    Ok(response)
                })
            }
            // Fail-open: no identity, no headers.
            Decision::Unidentified => {
                let mut svc = self.inner.clone();
                Box::pin(async move {
                    let response = svc.call(req).await?;
                    Ok(response.into_response())
                })
            }
            Decision::Denied {
                limit,
                reset_at,
                retry_after_seconds,
                ..
            } => {
                let denied = RateLimitExceeded {
                    error: self.limiter.config().message.clone(),
                    retry_after: retry_after_seconds,
                    limit,
                    reset_at,
                };
                Box::pin(async move { Ok(denied.into_response()) })
            }
        }
    }
}

fn set_rate_limit_headers(headers: &mut HeaderMap, limit: u32, remaining: u32, reset_at: u64) {
    headers.insert("x-ratelimit-limit", HeaderValue::from(limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
    headers.insert("x-ratelimit-reset", HeaderValue::from(reset_at));
}
