//! Measures the per-request cost of the admit path.

use booking_ratelimit::{BookingRateLimiter, RateLimitConfig};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn bench_check(c: &mut Criterion) {
    // A budget large enough that the hot path stays on the increment branch.
    let config = RateLimitConfig::builder()
        .max_attempts(u32::MAX)
        .window_ms(60 * 60 * 1000)
        .build();
    let limiter = BookingRateLimiter::new(config).expect("config is valid");

    c.bench_function("check_single_ip", |b| {
        b.iter(|| black_box(limiter.check(Some("203.0.113.9"))))
    });

    let config = RateLimitConfig::builder()
        .max_attempts(u32::MAX)
        .window_ms(60 * 60 * 1000)
        .build();
    let limiter = BookingRateLimiter::new(config).expect("config is valid");
    let ips: Vec<String> = (0..1024)
        .map(|i| format!("10.0.{}.{}", i / 256, i % 256))
        .collect();

    c.bench_function("check_rotating_ips", |b| {
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 1) % ips.len();
            black_box(limiter.check(Some(&ips[i])))
        })
    });
}

criterion_group!(benches, bench_check);
criterion_main!(benches);
