use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use serde_json::Value;

use crate::constants::{error_codes, JSONRPC_VERSION};
use crate::errors::ProxyError;

fn default_jsonrpc() -> String {
    JSONRPC_VERSION.to_string()
}

/// `null`, the id of replies that cannot be tied to a request
pub fn null_id() -> Box<RawValue> {
    RawValue::NULL.to_owned()
}

// Distinguishes `"id": null` from a missing id; plain `Option` folds both into `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Box<RawValue>>, D::Error>
where
    D: Deserializer<'de>,
{
    Box::<RawValue>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
struct Envelope {
    method: String,
    #[serde(default)]
    params: Value,
    #[serde(default, deserialize_with = "present")]
    id: Option<Box<RawValue>>,
}

#[derive(Deserialize)]
struct IdOnly {
    #[serde(default, deserialize_with = "present")]
    id: Option<Box<RawValue>>,
}

/// Inbound JSON-RPC request
///
/// The request text is kept as received: forwarding sends it byte-for-byte and
/// replies echo the id exactly as the client wrote it. `params` is a parsed
/// copy for the signing handlers.
#[derive(Debug, Clone)]
pub struct RpcRequest {
    pub method: String,
    pub params: Value,
    id: Option<Box<RawValue>>,
    raw: Box<RawValue>,
}

impl RpcRequest {
    /// Interpret one request object.
    ///
    /// On failure the returned response is an Invalid Request error carrying
    /// whatever `id` could be read from the text.
    pub fn from_raw(raw: Box<RawValue>) -> Result<Self, RpcResponse> {
        match serde_json::from_str::<Envelope>(raw.get()) {
            Ok(envelope) => Ok(Self {
                method: envelope.method,
                params: envelope.params,
                id: envelope.id,
                raw,
            }),
            Err(e) => {
                let id = serde_json::from_str::<IdOnly>(raw.get())
                    .ok()
                    .and_then(|found| found.id)
                    .unwrap_or_else(null_id);
                Err(RpcResponse::failure(
                    id,
                    RpcError::invalid_request(e.to_string()),
                ))
            }
        }
    }

    /// Request id as sent; `null` for notifications
    pub fn id(&self) -> &RawValue {
        self.id.as_deref().unwrap_or(RawValue::NULL)
    }

    /// A request without an `id` member (an explicit `null` id is not one)
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// The request exactly as received
    pub fn raw(&self) -> &RawValue {
        &self.raw
    }

    /// Positional parameter, or Invalid params when absent
    pub fn param(&self, index: usize) -> Result<&Value, ProxyError> {
        let params = self.params.as_array().ok_or_else(|| {
            ProxyError::InvalidParams("params must be a positional array".to_string())
        })?;

        params.get(index).ok_or_else(|| {
            ProxyError::InvalidParams(format!("missing parameter at position {index}"))
        })
    }
}

#[cfg(test)]
impl RpcRequest {
    pub fn new(method: &str, params: Value, id: Value) -> Self {
        let raw = serde_json::value::to_raw_value(&serde_json::json!({
            "jsonrpc": JSONRPC_VERSION,
            "method": method,
            "params": params,
            "id": id,
        }))
        .unwrap();
        Self::from_raw(raw).unwrap()
    }
}

impl PartialEq for RpcRequest {
    fn eq(&self, other: &Self) -> bool {
        self.raw.get() == other.raw.get()
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn parse_error() -> Self {
        Self {
            code: error_codes::PARSE_ERROR,
            message: "Parse error".to_string(),
            data: None,
        }
    }

    pub fn invalid_request(detail: impl Into<String>) -> Self {
        Self {
            code: error_codes::INVALID_REQUEST,
            message: "Invalid Request".to_string(),
            data: Some(Value::String(detail.into())),
        }
    }

    pub fn invalid_params(detail: impl Into<String>) -> Self {
        Self {
            code: error_codes::INVALID_PARAMS,
            message: "Invalid params".to_string(),
            data: Some(Value::String(detail.into())),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            code: error_codes::INTERNAL_ERROR,
            message: "Internal error".to_string(),
            data: Some(Value::String(detail.into())),
        }
    }
}

impl From<&ProxyError> for RpcError {
    fn from(err: &ProxyError) -> Self {
        match err {
            ProxyError::InvalidParams(detail) => RpcError::invalid_params(detail.as_str()),
            other => RpcError::internal(other.to_string()),
        }
    }
}

/// Either a result or an error, never both
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RpcPayload {
    Result(Value),
    Error(RpcError),
}

/// JSON-RPC response produced by the proxy itself
#[derive(Debug, Clone, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(flatten)]
    pub payload: RpcPayload,
    pub id: Box<RawValue>,
}

impl RpcResponse {
    pub fn success(id: Box<RawValue>, result: Value) -> Self {
        Self {
            jsonrpc: default_jsonrpc(),
            payload: RpcPayload::Result(result),
            id,
        }
    }

    pub fn failure(id: Box<RawValue>, error: RpcError) -> Self {
        Self {
            jsonrpc: default_jsonrpc(),
            payload: RpcPayload::Error(error),
            id,
        }
    }
}

#[cfg(test)]
impl RpcResponse {
    pub fn result(&self) -> Option<&Value> {
        match &self.payload {
            RpcPayload::Result(value) => Some(value),
            RpcPayload::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&RpcError> {
        match &self.payload {
            RpcPayload::Result(_) => None,
            RpcPayload::Error(error) => Some(error),
        }
    }
}

/// What the dispatcher hands back to the HTTP layer
///
/// Forwarded replies are the upstream's JSON body, untouched.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RpcReply {
    Local(RpcResponse),
    Forwarded(Box<RawValue>),
}

#[cfg(test)]
impl RpcReply {
    pub fn into_value(self) -> Value {
        serde_json::from_str(&serde_json::to_string(&self).unwrap()).unwrap()
    }
}
