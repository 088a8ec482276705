use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

use crate::errors::ProxyError;
use crate::security::SecurityValidator;

/// Headers set by reverse proxies, in order of precedence
const FORWARDING_HEADERS: [&str; 3] = ["x-forwarded-for", "x-real-ip", "cf-connecting-ip"];

/// Client IP as reported by a fronting proxy, if any header parses.
///
/// `X-Forwarded-For` may hold a chain ("client, proxy1, proxy2"); the first
/// entry is the original client.
fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    FORWARDING_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name)?.to_str().ok())
        .find_map(|value| value.split(',').next()?.trim().parse::<IpAddr>().ok())
}

/// Client IP: forwarding headers when the peer is a trusted proxy, else the socket peer
pub fn extract_real_ip(
    security: &SecurityValidator,
    headers: &HeaderMap,
    peer: &SocketAddr,
) -> IpAddr {
    let peer_ip = peer.ip();
    if security.trusts_proxy(&peer_ip) {
        forwarded_ip(headers).unwrap_or(peer_ip)
    } else {
        peer_ip
    }
}

/// Resolve the client IP and check it against the allowlist
pub fn validate_ip_access(
    security: &SecurityValidator,
    headers: &HeaderMap,
    peer: &SocketAddr,
) -> Result<IpAddr, ProxyError> {
    let real_ip = extract_real_ip(security, headers, peer);
    security.validate_ip(&real_ip)?;
    Ok(real_ip)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer() -> SocketAddr {
        "192.168.1.1:8080".parse().unwrap()
    }

    fn behind_proxy() -> SecurityValidator {
        SecurityValidator::new(vec![])
            .unwrap()
            .with_trusted_proxies(vec!["192.168.1.1".to_string()])
            .unwrap()
    }

    #[test]
    fn test_direct_connection() {
        let ip = extract_real_ip(&behind_proxy(), &HeaderMap::new(), &peer());
        assert_eq!(ip.to_string(), "192.168.1.1");
    }

    #[test]
    fn test_forwarded_for_chain_uses_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            "203.0.113.195, 70.41.3.18, 150.172.238.178".parse().unwrap(),
        );
        assert_eq!(
            extract_real_ip(&behind_proxy(), &headers, &peer()).to_string(),
            "203.0.113.195"
        );
    }

    #[test]
    fn test_header_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", "198.51.100.178".parse().unwrap());
        headers.insert("cf-connecting-ip", "198.51.100.179".parse().unwrap());
        assert_eq!(forwarded_ip(&headers).unwrap().to_string(), "198.51.100.178");

        headers.insert("x-forwarded-for", "203.0.113.195".parse().unwrap());
        assert_eq!(forwarded_ip(&headers).unwrap().to_string(), "203.0.113.195");
    }

    #[test]
    fn test_unparseable_header_is_skipped() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "unknown".parse().unwrap());
        headers.insert("cf-connecting-ip", "203.0.113.7".parse().unwrap());
        assert_eq!(forwarded_ip(&headers).unwrap().to_string(), "203.0.113.7");
    }

    #[test]
    fn test_headers_ignored_from_untrusted_peer() {
        let security = SecurityValidator::new(vec![]).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "10.0.0.1".parse().unwrap());
        headers.insert("x-real-ip", "10.0.0.1".parse().unwrap());

        assert_eq!(extract_real_ip(&security, &headers, &peer()).to_string(), "192.168.1.1");
    }

    #[test]
    fn test_validate_ip_access() {
        let security = SecurityValidator::new(vec!["192.168.1.1".to_string()]).unwrap();
        assert!(validate_ip_access(&security, &HeaderMap::new(), &peer()).is_ok());

        // A spoofed header from an untrusted peer changes nothing
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", "10.9.9.9".parse().unwrap());
        assert_eq!(
            validate_ip_access(&security, &headers, &peer()).unwrap().to_string(),
            "192.168.1.1"
        );

        let security = SecurityValidator::new(vec!["192.168.1.1".to_string()])
            .unwrap()
            .with_trusted_proxies(vec!["192.168.1.1".to_string()])
            .unwrap();
        let err = validate_ip_access(&security, &headers, &peer()).unwrap_err();
        assert!(matches!(err, ProxyError::Unauthorized(_)));
    }
}
