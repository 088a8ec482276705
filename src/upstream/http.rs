use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::value::RawValue;
use tracing::debug;

use super::UpstreamClient;
use crate::config::{required, UpstreamConfig};
use crate::errors::ProxyError;
use crate::rpc::RpcRequest;

/// Upstream node reached over HTTP(S)
#[derive(Clone)]
pub struct HttpUpstream {
    client: Client,
    url: String,
}

impl HttpUpstream {
    pub fn new(config: &UpstreamConfig) -> Result<Self, ProxyError> {
        let url = required(&config.url, "upstream.url")?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProxyError::Config(format!("Failed to build upstream client: {e}")))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstream {
    async fn forward(&self, request: &RpcRequest) -> Result<Box<RawValue>, ProxyError> {
        debug!("Forwarding {} to upstream", request.method);

        // Node URLs often embed API keys, so they are stripped from errors
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(request.raw().get().to_string())
            .send()
            .await
            .map_err(|e| ProxyError::Upstream(format!("request failed: {}", e.without_url())))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ProxyError::Upstream(format!("response unreadable: {}", e.without_url())))?;

        serde_json::from_slice(&body).map_err(|e| {
            ProxyError::Upstream(format!(
                "non-JSON response (HTTP {}): {e}",
                status.as_u16()
            ))
        })
    }
}
