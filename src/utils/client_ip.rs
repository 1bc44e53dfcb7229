//! Client address extraction from HTTP request headers.

use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderMap;

/// Resolves the address a click is attributed to.
///
/// When `behind_proxy` is set the first entry of `X-Forwarded-For` wins,
/// then `X-Real-IP`. A header value only counts if it parses as an IP
/// address. Otherwise, or when neither header carries one, the TCP peer
/// address is used. Proxy headers are ignored on direct deployments.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
///
/// let peer: SocketAddr = "10.0.0.1:4000".parse().unwrap();
/// assert_eq!(client_ip(&headers, peer, true), "203.0.113.7");
/// assert_eq!(client_ip(&headers, peer, false), "10.0.0.1");
/// ```
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy {
        let forwarded = header_str(headers, "x-forwarded-for")
            .and_then(|value| value.split(',').next())
            .and_then(parse_ip);

        if let Some(ip) =
            forwarded.or_else(|| header_str(headers, "x-real-ip").and_then(parse_ip))
        {
            return ip.to_string();
        }
    }

    peer.ip().to_string()
}

fn parse_ip(value: &str) -> Option<IpAddr> {
    value.trim().parse().ok()
}

/// Returns a header value as trimmed text, `None` when absent, empty or not UTF-8.
pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
