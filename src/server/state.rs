use std::sync::Arc;
use tracing::info;

use crate::audit::AuditLogger;
use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::errors::ProxyError;
use crate::security::SecurityValidator;
use crate::signer::{RemoteSigner, SigningClient};
use crate::upstream::{HttpUpstream, UpstreamClient};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub security: SecurityValidator,
}

impl AppState {
    /// Connect to the signing service and the upstream node described by `config`
    pub async fn new(config: &Config) -> Result<Self, ProxyError> {
        let signer = RemoteSigner::connect(&config.signer).await?;
        let upstream = HttpUpstream::new(&config.upstream)?;

        Self::with_clients(config, Arc::new(signer), Arc::new(upstream))
    }

    /// Build the state around already-constructed clients
    pub fn with_clients(
        config: &Config,
        signer: Arc<dyn SigningClient>,
        upstream: Arc<dyn UpstreamClient>,
    ) -> Result<Self, ProxyError> {
        let security = config.security.validator()?;

        let mut dispatcher = Dispatcher::new(signer, upstream);
        if config.audit.enabled {
            let audit_logger = AuditLogger::new(&config.audit.log_path)?;
            info!("📝 Audit logging enabled: {}", config.audit.log_path);
            dispatcher = dispatcher.with_audit_logger(Arc::new(audit_logger));
        }

        Ok(Self {
            dispatcher: Arc::new(dispatcher),
            security,
        })
    }
}
