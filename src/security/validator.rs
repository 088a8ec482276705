use std::collections::HashSet;
use std::net::IpAddr;

use crate::errors::ProxyError;

/// Client IP allowlist; an empty list allows everyone
///
/// Forwarding headers are only believed when the socket peer is one of the
/// trusted proxies.
#[derive(Clone, Debug, Default)]
pub struct SecurityValidator {
    allowed_ips: HashSet<IpAddr>,
    trusted_proxies: HashSet<IpAddr>,
}

fn parse_ips(entries: Vec<String>, kind: &str) -> Result<HashSet<IpAddr>, ProxyError> {
    let mut ips = HashSet::new();
    for ip_str in entries {
        let ip: IpAddr = ip_str
            .trim()
            .parse()
            .map_err(|_| ProxyError::Config(format!("Invalid {kind}: {ip_str}")))?;
        ips.insert(ip);
    }
    Ok(ips)
}

impl SecurityValidator {
    pub fn new(allowed_ips: Vec<String>) -> Result<Self, ProxyError> {
        Ok(Self {
            allowed_ips: parse_ips(allowed_ips, "IP address")?,
            trusted_proxies: HashSet::new(),
        })
    }

    pub fn with_trusted_proxies(mut self, trusted_proxies: Vec<String>) -> Result<Self, ProxyError> {
        self.trusted_proxies = parse_ips(trusted_proxies, "trusted proxy address")?;
        Ok(self)
    }

    /// Whether `peer` may report the client address through forwarding headers
    pub fn trusts_proxy(&self, peer: &IpAddr) -> bool {
        self.trusted_proxies.contains(peer)
    }

    pub fn validate_ip(&self, ip: &IpAddr) -> Result<(), ProxyError> {
        // If no IPs configured, allow all
        if self.allowed_ips.is_empty() {
            return Ok(());
        }

        if !self.allowed_ips.contains(ip) {
            return Err(ProxyError::Unauthorized(format!("IP address {ip} is not allowed")));
        }

        Ok(())
    }
}
