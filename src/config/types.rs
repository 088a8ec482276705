use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::defaults;
use crate::errors::ProxyError;
use crate::security::SecurityValidator;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub signer: SignerConfig,
    #[serde(default)]
    pub tls: TlsConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Answer CORS preflight and add `Access-Control-Allow-Origin: *`
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: defaults::ADDRESS.to_string(),
            port: defaults::PORT,
            cors: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// JSON-RPC endpoint of the Ethereum node
    pub url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: defaults::UPSTREAM_TIMEOUT_SECS,
        }
    }
}

/// Connection parameters of the custodial signing service
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    pub base_url: Option<String>,
    pub organization_id: Option<String>,
    pub key_id: Option<String>,
    pub api_public_key: Option<String>,
    pub api_private_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            organization_id: None,
            key_id: None,
            api_public_key: None,
            api_private_key: None,
            timeout_secs: defaults::SIGNER_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for SignerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerConfig")
            .field("base_url", &self.base_url)
            .field("organization_id", &self.organization_id)
            .field("key_id", &self.key_id)
            .field("api_public_key", &self.api_public_key)
            .field(
                "api_private_key",
                &self.api_private_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    pub enabled: bool,
    pub cert_file: Option<String>,
    pub key_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SecurityConfig {
    /// Allowed client IP addresses (empty = allow all)
    pub allowed_ips: Vec<String>,
    /// Reverse proxies whose forwarding headers name the real client
    pub trusted_proxies: Vec<String>,
}

impl SecurityConfig {
    pub fn validator(&self) -> Result<SecurityValidator, ProxyError> {
        SecurityValidator::new(self.allowed_ips.clone())?
            .with_trusted_proxies(self.trusted_proxies.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub enabled: bool,
    pub log_path: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: defaults::AUDIT_LOG_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: defaults::LOG_LEVEL.to_string(),
        }
    }
}

impl LoggingConfig {
    /// Filter directive for `tracing_subscriber`; "off" when logging is disabled
    pub fn filter(&self) -> &str {
        if self.enabled {
            &self.level
        } else {
            "off"
        }
    }
}

/// Borrow a required setting or fail with the setting's name
pub fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, ProxyError> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ProxyError::Config(format!("Missing required configuration: {name}")))
}

impl Config {
    /// Redacted, human-readable description used at startup and by `check-config`
    pub fn summary(&self) -> Vec<String> {
        let set = |value: &Option<String>| if value.is_some() { "set" } else { "MISSING" };

        vec![
            format!("Server: {}:{}", self.server.address, self.server.port),
            format!("CORS: {}", if self.server.cors { "enabled" } else { "disabled" }),
            format!(
                "Upstream: {} (timeout {}s)",
                if self.upstream.url.is_some() { "configured" } else { "MISSING" },
                self.upstream.timeout_secs
            ),
            format!(
                "Signing service: {} (timeout {}s)",
                self.signer.base_url.as_deref().unwrap_or("MISSING"),
                self.signer.timeout_secs
            ),
            format!(
                "  organization: {}, key: {}",
                self.signer.organization_id.as_deref().unwrap_or("MISSING"),
                self.signer.key_id.as_deref().unwrap_or("MISSING")
            ),
            format!(
                "  API public key: {}, API private key: {}",
                set(&self.signer.api_public_key),
                set(&self.signer.api_private_key)
            ),
            format!("TLS: {}", if self.tls.enabled { "enabled" } else { "disabled" }),
            if self.security.allowed_ips.is_empty() {
                "Allowed IPs: any".to_string()
            } else {
                format!("Allowed IPs: [{}]", self.security.allowed_ips.join(", "))
            },
            if self.security.trusted_proxies.is_empty() {
                "Trusted proxies: none (forwarding headers ignored)".to_string()
            } else {
                format!("Trusted proxies: [{}]", self.security.trusted_proxies.join(", "))
            },
            if self.audit.enabled {
                format!("Audit log: {}", self.audit.log_path)
            } else {
                "Audit log: disabled".to_string()
            },
        ]
    }
}
