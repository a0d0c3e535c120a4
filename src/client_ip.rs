//! Client identity resolution from proxy headers.
//!
//! The booking API sits behind a trusted edge proxy, so the forwarded
//! headers are checked in a fixed precedence order. When none of them
//! yields a usable value the caller fails open: anonymous traffic is
//! admitted rather than bucketed under a single shared key or blocked
//! outright by a misconfigured proxy.

use axum::http::HeaderMap;

/// Maximum client id length (IPv6 maximum). Longer values are truncated
/// so a forged header cannot bloat store keys.
const MAX_IP_LENGTH: usize = 45;

/// Resolve the client IP address from forwarded headers.
///
/// Precedence:
/// 1. `x-forwarded-for` — may carry a comma-separated chain
///    ("client, proxy1, proxy2"); the leftmost entry is the original
///    client, taken trimmed.
/// 2. `x-real-ip`
/// 3. `cf-connecting-ip`
///
/// Returns `None` when no header yields a non-empty value.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    header_str(headers, "x-forwarded-for")
        .map(|s| s.split(',').next().unwrap_or(s).trim())
        .filter(|s| !s.is_empty())
        .or_else(|| header_str(headers, "x-real-ip"))
        .or_else(|| header_str(headers, "cf-connecting-ip"))
        .map(|ip| truncate_ip(ip).to_string())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Truncate oversized values. Header values that survive `to_str` are
/// visible ASCII, so slicing at a byte index is safe.
fn truncate_ip(ip: &str) -> &str {
    if ip.len() <= MAX_IP_LENGTH {
        ip
    } else {
        &ip[..MAX_IP_LENGTH]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_forwarded_for_takes_first_entry() {
        let headers = headers(&[("x-forwarded-for", "203.0.113.9, 10.0.0.1, 10.0.0.2")]);
        assert_eq!(client_ip(&headers), Some("203.0.113.9".to_string()));
    }

    #[test]
    fn test_forwarded_for_entry_is_trimmed() {
        let headers = headers(&[("x-forwarded-for", "  203.0.113.9 , 10.0.0.1")]);
        assert_eq!(client_ip(&headers), Some("203.0.113.9".to_string()));
    }

    #[test]
    fn test_forwarded_for_wins_over_real_ip() {
        let headers = headers(&[
            ("x-forwarded-for", "203.0.113.9"),
            ("x-real-ip", "198.51.100.1"),
            ("cf-connecting-ip", "192.0.2.1"),
        ]);
        assert_eq!(client_ip(&headers), Some("203.0.113.9".to_string()));
    }

    #[test]
    fn test_real_ip_wins_over_edge_header() {
        let headers = headers(&[
            ("x-real-ip", "198.51.100.1"),
            ("cf-connecting-ip", "192.0.2.1"),
        ]);
        assert_eq!(client_ip(&headers), Some("198.51.100.1".to_string()));
    }

    #[test]
    fn test_edge_header_used_last() {
        let headers = headers(&[("cf-connecting-ip", "192.0.2.1")]);
        assert_eq!(client_ip(&headers), Some("192.0.2.1".to_string()));
    }

    #[test]
    fn test_no_headers_is_unresolved() {
        assert_eq!(client_ip(&HeaderMap::new()), None);
    }

    #[test]
    fn test_empty_header_is_unresolved() {
        let headers = headers(&[("x-forwarded-for", "   ")]);
        assert_eq!(client_ip(&headers), None);
    }

    #[test]
    fn test_oversized_value_is_truncated() {
        let long = "a".repeat(100);
        let headers = headers(&[("x-real-ip", long.as_str())]);
        let resolved = client_ip(&headers).unwrap();
        assert_eq!(resolved.len(), MAX_IP_LENGTH);
    }
}
