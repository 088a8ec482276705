use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::EIP712_DOMAIN_TYPE;
use crate::errors::ProxyError;

/// Transaction object as passed to `eth_sendTransaction` / `eth_signTransaction`
///
/// Fields the proxy does not know about (`type`, `accessList`, ...) are kept
/// in `other` and handed to the signing service unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
    /// Newer name for `data`; folded into it by [`TransactionRequest::from_param`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Bytes>,
    #[serde(default, alias = "gasLimit", skip_serializing_if = "Option::is_none")]
    pub gas: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<U256>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl TransactionRequest {
    pub fn from_param(param: &Value) -> Result<Self, ProxyError> {
        if !param.is_object() {
            return Err(ProxyError::InvalidParams(
                "transaction must be a JSON object".to_string(),
            ));
        }

        let mut transaction: Self = serde_json::from_value(param.clone())
            .map_err(|e| ProxyError::InvalidParams(format!("Invalid transaction: {e}")))?;

        // Both may be present as long as they agree
        if let Some(input) = transaction.input.take() {
            if transaction.data.as_ref().is_some_and(|data| *data != input) {
                return Err(ProxyError::InvalidParams(
                    "both \"data\" and \"input\" are set but differ".to_string(),
                ));
            }
            transaction.data = Some(input);
        }

        Ok(transaction)
    }
}

/// EIP-712 payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedData {
    #[serde(default)]
    pub domain: Map<String, Value>,
    pub types: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_type: Option<String>,
    pub message: Map<String, Value>,
}

impl TypedData {
    /// Decode the typed-data parameter of `eth_signTypedData*`.
    ///
    /// Wallets send either a JSON-encoded string or the object itself.
    pub fn from_param(param: &Value) -> Result<Self, ProxyError> {
        let decoded: Result<Self, serde_json::Error> = match param {
            Value::String(raw) => serde_json::from_str(raw),
            Value::Object(_) => serde_json::from_value(param.clone()),
            _ => {
                return Err(ProxyError::InvalidParams(
                    "typed data must be a JSON string or object".to_string(),
                ))
            }
        };

        let mut typed_data =
            decoded.map_err(|e| ProxyError::InvalidParams(format!("Invalid typed data: {e}")))?;
        typed_data.types.remove(EIP712_DOMAIN_TYPE);
        Ok(typed_data)
    }
}
