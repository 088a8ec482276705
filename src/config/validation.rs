use std::net::IpAddr;
use tracing::warn;

use super::types::Config;
use crate::errors::ProxyError;

impl Config {
    /// Validate the configuration settings
    pub fn validate(&self) -> Result<(), ProxyError> {
        // Validate required connection settings
        self.validate_required()?;

        // Validate endpoint URLs
        self.validate_urls()?;

        // Validate TLS configuration
        self.validate_tls()?;

        // Validate server configuration
        self.validate_server()?;

        // Validate security configuration
        self.validate_security()?;

        Ok(())
    }

    /// Names of required settings that are unset or blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let required = [
            ("upstream.url", &self.upstream.url),
            ("signer.base_url", &self.signer.base_url),
            ("signer.organization_id", &self.signer.organization_id),
            ("signer.key_id", &self.signer.key_id),
            ("signer.api_public_key", &self.signer.api_public_key),
            ("signer.api_private_key", &self.signer.api_private_key),
        ];

        required
            .into_iter()
            .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
            .map(|(name, _)| name)
            .collect()
    }

    fn validate_required(&self) -> Result<(), ProxyError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ProxyError::Config(format!(
                "Missing required configuration: {}",
                missing.join(", ")
            )));
        }

        Ok(())
    }

    fn validate_urls(&self) -> Result<(), ProxyError> {
        for (name, value) in [
            ("upstream.url", &self.upstream.url),
            ("signer.base_url", &self.signer.base_url),
        ] {
            let Some(raw) = value else { continue };
            let url = reqwest::Url::parse(raw)
                .map_err(|e| ProxyError::Config(format!("Invalid {name} '{raw}': {e}")))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ProxyError::Config(format!(
                    "Invalid {name}: scheme must be http or https"
                )));
            }
        }

        if self
            .signer
            .base_url
            .as_deref()
            .is_some_and(|url| url.starts_with("http://"))
        {
            warn!("⚠️  SECURITY WARNING: Signing service reached over plain HTTP");
            warn!("⚠️  API credentials will be sent unencrypted");
        }

        if self.upstream.timeout_secs == 0 || self.signer.timeout_secs == 0 {
            return Err(ProxyError::Config(
                "Timeouts must be at least 1 second".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate TLS configuration
    fn validate_tls(&self) -> Result<(), ProxyError> {
        if self.tls.enabled {
            if self.tls.cert_file.is_none() || self.tls.key_file.is_none() {
                return Err(ProxyError::Config(
                    "TLS certificate and key files are required when TLS is enabled".to_string(),
                ));
            }

            if let Some(cert_file) = &self.tls.cert_file {
                if !std::path::Path::new(cert_file).exists() {
                    return Err(ProxyError::Config(format!(
                        "TLS certificate file not found: {cert_file}"
                    )));
                }
            }

            if let Some(key_file) = &self.tls.key_file {
                if !std::path::Path::new(key_file).exists() {
                    return Err(ProxyError::Config(format!(
                        "TLS key file not found: {key_file}"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Validate server configuration
    fn validate_server(&self) -> Result<(), ProxyError> {
        if self.server.port == 0 {
            return Err(ProxyError::Config(
                "Invalid port number: must be between 1 and 65535".to_string(),
            ));
        }

        self.server
            .address
            .parse::<IpAddr>()
            .map_err(|e| ProxyError::Config(format!("Invalid bind address: {e}")))?;

        Ok(())
    }

    /// Validate security configuration and log warnings
    fn validate_security(&self) -> Result<(), ProxyError> {
        self.security.validator()?;

        let loopback = self
            .server
            .address
            .parse::<IpAddr>()
            .is_ok_and(|ip| ip.is_loopback());

        if !loopback && !self.tls.enabled {
            warn!("⚠️  SECURITY WARNING: Proxy bound to {} without TLS", self.server.address);
            warn!("⚠️  Anyone who can reach this port can request signatures");
        }

        if !loopback && self.security.allowed_ips.is_empty() {
            warn!("⚠️  SECURITY WARNING: No IP restrictions configured on a non-loopback address");
            warn!("⚠️  Configure 'allowed_ips' to limit who can use the custodial key");
        }

        if self.server.cors {
            warn!("⚠️  CORS enabled: any web page can submit requests through this proxy");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;

    fn complete_config() -> Config {
        let mut config = Config::default();
        config.upstream.url = Some("http://localhost:8546".to_string());
        config.signer.base_url = Some("https://signer.example.com".to_string());
        config.signer.organization_id = Some("org-1".to_string());
        config.signer.key_id = Some("key-1".to_string());
        config.signer.api_public_key = Some("pub".to_string());
        config.signer.api_private_key = Some("secret".to_string());
        config
    }

    #[test]
    fn test_complete_config_is_valid() {
        assert!(complete_config().validate().is_ok());
    }

    #[test]
    fn test_missing_fields_are_all_listed() {
        let err = Config::default().validate().unwrap_err().to_string();
        for field in [
            "upstream.url",
            "signer.base_url",
            "signer.organization_id",
            "signer.key_id",
            "signer.api_public_key",
            "signer.api_private_key",
        ] {
            assert!(err.contains(field), "{field} not reported in: {err}");
        }
    }

    #[test]
    fn test_blank_credential_counts_as_missing() {
        let mut config = complete_config();
        config.signer.api_private_key = Some("   ".to_string());
        assert_eq!(config.missing_fields(), vec!["signer.api_private_key"]);
    }

    #[test]
    fn test_rejects_non_http_upstream() {
        let mut config = complete_config();
        config.upstream.url = Some("ws://localhost:8546".to_string());
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("scheme must be http or https"));
    }

    #[test]
    fn test_rejects_zero_port() {
        let mut config = complete_config();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config = complete_config();
        config.signer.timeout_secs = 0;
        assert!(config.validate().unwrap_err().to_string().contains("Timeouts"));
    }

    #[test]
    fn test_rejects_invalid_allowed_ip() {
        let mut config = complete_config();
        config.security.allowed_ips = vec!["not-an-ip".to_string()];
        assert!(config.validate().unwrap_err().to_string().contains("Invalid IP address"));
    }

    #[test]
    fn test_rejects_invalid_trusted_proxy() {
        let mut config = complete_config();
        config.security.trusted_proxies = vec!["lb.internal".to_string()];
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("Invalid trusted proxy address"));
    }

    #[test]
    fn test_tls_requires_files() {
        let mut config = complete_config();
        config.tls.enabled = true;
        assert!(config.validate().is_err());

        config.tls.cert_file = Some("/nonexistent/cert.pem".to_string());
        config.tls.key_file = Some("/nonexistent/key.pem".to_string());
        assert!(config.validate().unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_private_key_is_redacted_in_debug() {
        let debug = format!("{:?}", complete_config());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("secret"));
    }
}
