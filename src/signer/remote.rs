use std::time::Duration;

use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::types::{TransactionRequest, TypedData};
use super::SigningClient;
use crate::config::{required, SignerConfig};
use crate::errors::ProxyError;
use crate::utils::SecureString;

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Deserialize)]
struct AddressReply {
    address: Address,
}

#[derive(Deserialize)]
struct SignatureReply {
    signature: Bytes,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignedTransactionReply {
    signed_transaction: Bytes,
}

#[derive(Deserialize)]
struct SendReply {
    hash: B256,
}

/// HTTP client for the custodial signing service, bound to one key
///
/// Every operation is a `POST {base_url}/v1/organizations/{org}/keys/{key}/{op}`
/// authenticated with the API key pair.
#[derive(Clone)]
pub struct RemoteSigner {
    client: Client,
    endpoint: String,
    api_public_key: String,
    api_private_key: SecureString,
    address: Address,
}

impl RemoteSigner {
    /// Build the client and resolve the key's address once
    pub async fn connect(config: &SignerConfig) -> Result<Self, ProxyError> {
        let base_url = required(&config.base_url, "signer.base_url")?;
        let organization_id = required(&config.organization_id, "signer.organization_id")?;
        let key_id = required(&config.key_id, "signer.key_id")?;
        let api_public_key = required(&config.api_public_key, "signer.api_public_key")?;
        let api_private_key = required(&config.api_private_key, "signer.api_private_key")?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProxyError::Config(format!("Failed to build signing client: {e}")))?;

        let mut signer = Self {
            client,
            endpoint: format!(
                "{}/v1/organizations/{}/keys/{}",
                base_url.trim_end_matches('/'),
                organization_id,
                key_id
            ),
            api_public_key: api_public_key.to_string(),
            api_private_key: SecureString::from(api_private_key),
            address: Address::ZERO,
        };

        let reply: AddressReply = signer.call("address", &json!({})).await?;
        signer.address = reply.address;
        info!("Signing client bound to key {} ({})", key_id, signer.address);

        Ok(signer)
    }

    fn auth_headers(&self) -> Result<HeaderMap, ProxyError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(&self.api_public_key)
                .map_err(|e| ProxyError::Config(format!("Invalid API public key: {e}")))?,
        );

        let secret = self
            .api_private_key
            .as_str()
            .map_err(|e| ProxyError::Config(format!("Invalid API private key: {e}")))?;
        let mut bearer = HeaderValue::from_str(&format!("Bearer {secret}"))
            .map_err(|e| ProxyError::Config(format!("Invalid API private key: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        Ok(headers)
    }

    async fn call<B, R>(&self, operation: &str, body: &B) -> Result<R, ProxyError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}", self.endpoint, operation);
        debug!("Signing service call: {}", operation);

        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                ProxyError::Signing(format!("{operation} request failed: {}", e.without_url()))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            ProxyError::Signing(format!("{operation} response unreadable: {}", e.without_url()))
        })?;

        if !status.is_success() {
            return Err(ProxyError::Signing(rejection_message(operation, status, &text)));
        }

        serde_json::from_str(&text)
            .map_err(|e| ProxyError::Signing(format!("malformed {operation} response: {e}")))
    }
}

/// Human-readable reason for a non-2xx reply from the signing service
fn rejection_message(operation: &str, status: StatusCode, body: &str) -> String {
    let reason = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string());

    format!("{operation} rejected (HTTP {}): {reason}", status.as_u16())
}

#[async_trait]
impl SigningClient for RemoteSigner {
    async fn address(&self) -> Result<Address, ProxyError> {
        Ok(self.address)
    }

    async fn sign_message(&self, message: &str) -> Result<Bytes, ProxyError> {
        let reply: SignatureReply = self
            .call("sign_message", &json!({ "message": message }))
            .await?;
        Ok(reply.signature)
    }

    async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Bytes, ProxyError> {
        let reply: SignatureReply = self.call("sign_typed_data", typed_data).await?;
        Ok(reply.signature)
    }

    async fn sign_transaction(
        &self,
        transaction: &TransactionRequest,
    ) -> Result<Bytes, ProxyError> {
        let reply: SignedTransactionReply = self
            .call("sign_transaction", &json!({ "transaction": transaction }))
            .await?;
        Ok(reply.signed_transaction)
    }

    async fn send_transaction(
        &self,
        transaction: &TransactionRequest,
    ) -> Result<B256, ProxyError> {
        let reply: SendReply = self
            .call("send_transaction", &json!({ "transaction": transaction }))
            .await?;
        Ok(reply.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_prefers_message_field() {
        let msg = rejection_message(
            "send_transaction",
            StatusCode::FORBIDDEN,
            r#"{"message":"policy denied transfer"}"#,
        );
        assert_eq!(msg, "send_transaction rejected (HTTP 403): policy denied transfer");
    }

    #[test]
    fn test_rejection_falls_back_to_error_field() {
        let msg = rejection_message("address", StatusCode::UNAUTHORIZED, r#"{"error":"bad key"}"#);
        assert_eq!(msg, "address rejected (HTTP 401): bad key");
    }

    #[test]
    fn test_rejection_with_plain_body() {
        let msg = rejection_message("sign_message", StatusCode::BAD_GATEWAY, "upstream down\n");
        assert_eq!(msg, "sign_message rejected (HTTP 502): upstream down");
    }
}
