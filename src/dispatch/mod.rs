pub mod routes;


use serde_json::Value;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::audit::{AuditLogger, SigningAuditEntry};
use crate::constants::methods;
use crate::errors::ProxyError;
use crate::rpc::{RpcError, RpcReply, RpcRequest, RpcResponse};
use crate::signer::SigningClient;
use crate::upstream::UpstreamClient;

pub use routes::Handler;

/// Routes each JSON-RPC request to the signing service or the upstream node
///
/// Every outcome, including failures of either remote, becomes a JSON-RPC
/// reply; nothing escapes `handle_from`.
pub struct Dispatcher {
    signer: Arc<dyn SigningClient>,
    upstream: Arc<dyn UpstreamClient>,
    routes: HashMap<&'static str, Handler>,
    audit_logger: Option<Arc<AuditLogger>>,
}

#[cfg(test)]
impl Dispatcher {
    /// Whether `method` is answered by the signing service (exact, case-sensitive)
    pub fn intercepts(&self, method: &str) -> bool {
        self.routes.contains_key(method)
    }

    pub async fn handle(&self, request: &RpcRequest) -> RpcReply {
        self.handle_from(request, None).await
    }
}

impl Dispatcher {
    pub fn new(signer: Arc<dyn SigningClient>, upstream: Arc<dyn UpstreamClient>) -> Self {
        Self {
            signer,
            upstream,
            routes: routes::routing_table(),
            audit_logger: None,
        }
    }

    pub fn with_audit_logger(mut self, audit_logger: Arc<AuditLogger>) -> Self {
        self.audit_logger = Some(audit_logger);
        self
    }

    /// Answer `request`, recording `source_ip` in the audit log
    pub async fn handle_from(&self, request: &RpcRequest, source_ip: Option<IpAddr>) -> RpcReply {
        if request.is_notification() {
            info!("Notification {}", request.method);
        } else {
            info!("Request {} (id: {})", request.method, request.id());
        }

        let Some(handler) = self.routes.get(request.method.as_str()) else {
            return self.forward(request).await;
        };

        let start_time = Instant::now();
        let outcome = handler(self.signer.as_ref(), request).await;
        self.audit(request, source_ip, &outcome, start_time).await;

        match outcome {
            Ok(result) => RpcReply::Local(RpcResponse::success(request.id().to_owned(), result)),
            Err(e) => {
                error!("{} (id: {}) failed: {}", request.method, request.id(), e);
                RpcReply::Local(RpcResponse::failure(request.id().to_owned(), RpcError::from(&e)))
            }
        }
    }

    async fn forward(&self, request: &RpcRequest) -> RpcReply {
        match self.upstream.forward(request).await {
            Ok(body) => RpcReply::Forwarded(body),
            Err(e) => {
                error!(
                    "Forwarding {} (id: {}) failed: {}",
                    request.method, request.id(), e
                );
                RpcReply::Local(RpcResponse::failure(request.id().to_owned(), RpcError::from(&e)))
            }
        }
    }

    async fn audit(
        &self,
        request: &RpcRequest,
        source_ip: Option<IpAddr>,
        outcome: &Result<Value, ProxyError>,
        start_time: Instant,
    ) {
        let Some(logger) = &self.audit_logger else {
            return;
        };

        let mut entry = SigningAuditEntry::new(&request.method, request.id(), source_ip);
        match outcome {
            Ok(result) => {
                if request.method == methods::ETH_SEND_TRANSACTION {
                    if let Some(hash) = result.as_str() {
                        entry.set_tx_hash(hash);
                    }
                }
                entry.set_success();
            }
            Err(e) => entry.set_error(e.to_string()),
        }
        entry.update_duration(start_time);

        if let Err(e) = logger.log(&entry).await {
            warn!("Failed to write audit entry: {}", e);
        }
    }
}
