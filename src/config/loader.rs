use anyhow::Result;
use std::fs;

use super::types::*;
use crate::cli::StartArgs;
use crate::constants::defaults;
use crate::errors::ProxyError;

impl Config {
    /// Load configuration from CLI arguments and optional config file
    pub fn load(cli: StartArgs) -> Result<Self> {
        let mut config = match &cli.config {
            Some(config_path) => Self::load_from_file(config_path)?,
            None => Self::default(),
        };

        config.apply_cli(cli);
        Ok(config)
    }

    /// Load configuration from a TOML file
    fn load_from_file(config_path: &str) -> Result<Self, ProxyError> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            ProxyError::Config(format!("Failed to read config file {config_path}: {e}"))
        })?;

        toml::from_str(&config_content)
            .map_err(|e| ProxyError::Config(format!("Failed to parse config file: {e}")))
    }

    /// Explicit CLI args override config file values; CLI defaults do not
    fn apply_cli(&mut self, cli: StartArgs) {
        if cli.address != defaults::ADDRESS {
            self.server.address = cli.address;
        }
        if cli.port != defaults::PORT {
            self.server.port = cli.port;
        }
        if cli.cors {
            self.server.cors = true;
        }

        self.upstream.url = cli.upstream_url.or(self.upstream.url.take());
        if let Some(timeout) = cli.upstream_timeout {
            self.upstream.timeout_secs = timeout;
        }

        self.signer.base_url = cli.signer_url.or(self.signer.base_url.take());
        self.signer.organization_id = cli.organization_id.or(self.signer.organization_id.take());
        self.signer.key_id = cli.key_id.or(self.signer.key_id.take());
        self.signer.api_public_key = cli.api_public_key.or(self.signer.api_public_key.take());
        self.signer.api_private_key = cli.api_private_key.or(self.signer.api_private_key.take());
        if let Some(timeout) = cli.signer_timeout {
            self.signer.timeout_secs = timeout;
        }

        if cli.tls {
            self.tls.enabled = true;
        }
        self.tls.cert_file = cli.tls_cert.or(self.tls.cert_file.take());
        self.tls.key_file = cli.tls_key.or(self.tls.key_file.take());

        if !cli.allowed_ips.is_empty() {
            self.security.allowed_ips = cli.allowed_ips;
        }
        if !cli.trusted_proxies.is_empty() {
            self.security.trusted_proxies = cli.trusted_proxies;
        }

        if let Some(log_path) = cli.audit_log {
            self.audit.enabled = true;
            self.audit.log_path = log_path;
        }

        // Logging stays on only if neither the CLI nor the file turned it off
        if !cli.logging {
            self.logging.enabled = false;
        }
        if let Some(level) = cli.log_level {
            self.logging.level = level;
        }
    }
}
