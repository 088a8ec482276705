use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use std::path::Path;
use tracing::info;

use crate::config::TlsConfig;
use crate::errors::ProxyError;

/// Binds the proxy either as plain HTTP or behind rustls
pub struct TlsManager {
    config: TlsConfig,
}

impl TlsManager {
    pub fn new(config: TlsConfig) -> Self {
        Self { config }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Certificate and key pair, both required when TLS is on
    fn pem_files(&self) -> Result<(&str, &str), ProxyError> {
        if !self.config.enabled {
            return Err(ProxyError::Tls("TLS is not enabled".to_string()));
        }

        let cert_file = self
            .config
            .cert_file
            .as_deref()
            .ok_or_else(|| ProxyError::Tls("TLS certificate file not specified".to_string()))?;
        let key_file = self
            .config
            .key_file
            .as_deref()
            .ok_or_else(|| ProxyError::Tls("TLS key file not specified".to_string()))?;

        for file in [cert_file, key_file] {
            if !Path::new(file).exists() {
                return Err(ProxyError::Tls(format!("TLS file not found: {file}")));
            }
        }

        Ok((cert_file, key_file))
    }

    pub async fn load_rustls_config(&self) -> Result<RustlsConfig, ProxyError> {
        let (cert_file, key_file) = self.pem_files()?;
        info!("Loading TLS configuration from {} and {}", cert_file, key_file);

        // reqwest and axum-server enable different rustls backends, so pick one
        // for the process before building a server config. Err means already set.
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

        RustlsConfig::from_pem_file(cert_file, key_file)
            .await
            .map_err(|e| ProxyError::Tls(format!("Failed to load TLS config: {e}")))
    }

    /// Serve `app` on `addr` until the listener fails
    pub async fn serve(&self, app: Router, addr: SocketAddr) -> Result<(), ProxyError> {
        let service = app.into_make_service_with_connect_info::<SocketAddr>();

        if self.is_enabled() {
            let rustls_config = self.load_rustls_config().await?;
            info!("🔒 Accepting TLS connections on {}", addr);

            axum_server::bind_rustls(addr, rustls_config)
                .serve(service)
                .await
                .map_err(|e| ProxyError::Internal(format!("TLS server error: {e}")))
        } else {
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .map_err(|e| ProxyError::Internal(format!("Failed to bind to {addr}: {e}")))?;
            info!("✅ Accepting connections (HTTP only) on {}", addr);

            axum::serve(listener, service)
                .await
                .map_err(|e| ProxyError::Internal(format!("Server error: {e}")))
        }
    }

    pub fn summary(&self) -> String {
        match (&self.config.cert_file, &self.config.key_file) {
            (Some(cert), Some(key)) if self.config.enabled => {
                format!("TLS enabled (cert: {cert}, key: {key})")
            }
            _ if self.config.enabled => "TLS enabled (certificate incomplete)".to_string(),
            _ => "TLS disabled".to_string(),
        }
    }
}
