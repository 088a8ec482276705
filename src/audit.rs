use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::value::RawValue;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use crate::errors::ProxyError;

/// One line of the audit log, written for every intercepted signing call
#[derive(Debug, Serialize)]
pub struct SigningAuditEntry {
    timestamp: DateTime<Utc>,
    source_ip: Option<String>,
    method: String,
    request_id: Box<RawValue>,
    // Only set for eth_sendTransaction
    tx_hash: Option<String>,
    success: bool,
    error: Option<String>,
    duration_ms: u64,
}

impl SigningAuditEntry {
    pub fn new(method: &str, request_id: &RawValue, source_ip: Option<IpAddr>) -> Self {
        Self {
            timestamp: Utc::now(),
            source_ip: source_ip.map(|ip| ip.to_string()),
            method: method.to_string(),
            request_id: request_id.to_owned(),
            tx_hash: None,
            success: false,
            error: None,
            duration_ms: 0,
        }
    }

    pub fn set_tx_hash(&mut self, tx_hash: impl Into<String>) {
        self.tx_hash = Some(tx_hash.into());
    }

    pub fn set_success(&mut self) {
        self.success = true;
        self.error = None;
    }

    pub fn set_error(&mut self, error: String) {
        self.error = Some(error);
        self.success = false;
    }

    pub fn update_duration(&mut self, start_time: Instant) {
        self.duration_ms = start_time.elapsed().as_millis() as u64;
    }
}

/// Append-only JSON-lines audit file
pub struct AuditLogger {
    file: Arc<Mutex<File>>,
}

impl AuditLogger {
    pub fn new(log_path: &str) -> Result<Self, ProxyError> {
        let path = Path::new(log_path);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ProxyError::Internal(format!("Failed to create audit log directory: {e}"))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| ProxyError::Internal(format!("Failed to open audit log file: {e}")))?;

        Ok(Self {
            file: Arc::new(Mutex::new(file)),
        })
    }

    pub async fn log(&self, entry: &SigningAuditEntry) -> Result<(), ProxyError> {
        let json = serde_json::to_string(entry)?;

        let mut file = self.file.lock().await;
        writeln!(file, "{json}")
            .map_err(|e| ProxyError::Internal(format!("Failed to write audit log: {e}")))?;
        file.flush()
            .map_err(|e| ProxyError::Internal(format!("Failed to flush audit log: {e}")))?;

        Ok(())
    }
}
