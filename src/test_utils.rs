//! In-process doubles for the signing service and the upstream node.

use alloy_primitives::{address, Address, Bytes, B256};
use async_trait::async_trait;
use serde_json::json;
use serde_json::value::{to_raw_value, RawValue};
use std::sync::Mutex;

use crate::errors::ProxyError;
use crate::rpc::RpcRequest;
use crate::signer::{SigningClient, TransactionRequest, TypedData};
use crate::upstream::UpstreamClient;

pub const TEST_ADDRESS: Address = address!("8ba1f109551bd432803012645ac136ddd64dba72");

pub fn test_signature() -> Bytes {
    Bytes::from(vec![0x11; 65])
}

pub fn test_signed_transaction() -> Bytes {
    Bytes::from(vec![0x02, 0xf8, 0x6b, 0x01])
}

pub fn test_tx_hash() -> B256 {
    B256::repeat_byte(0xab)
}

/// A call the fake signer received
#[derive(Debug, Clone, PartialEq)]
pub enum SignerCall {
    Address,
    SignMessage(String),
    SignTypedData(TypedData),
    SignTransaction(TransactionRequest),
    SendTransaction(TransactionRequest),
}

pub struct FakeSigner {
    rejection: Option<String>,
    calls: Mutex<Vec<SignerCall>>,
}

impl FakeSigner {
    pub fn approving() -> Self {
        Self {
            rejection: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every signing operation fails with `reason`; the address stays available
    pub fn rejecting(reason: &str) -> Self {
        Self {
            rejection: Some(reason.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<SignerCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: SignerCall) -> Result<(), ProxyError> {
        self.calls.lock().unwrap().push(call);
        match &self.rejection {
            Some(reason) => Err(ProxyError::Signing(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SigningClient for FakeSigner {
    async fn address(&self) -> Result<Address, ProxyError> {
        self.calls.lock().unwrap().push(SignerCall::Address);
        Ok(TEST_ADDRESS)
    }

    async fn sign_message(&self, message: &str) -> Result<Bytes, ProxyError> {
        self.record(SignerCall::SignMessage(message.to_string()))?;
        Ok(test_signature())
    }

    async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Bytes, ProxyError> {
        self.record(SignerCall::SignTypedData(typed_data.clone()))?;
        Ok(test_signature())
    }

    async fn sign_transaction(
        &self,
        transaction: &TransactionRequest,
    ) -> Result<Bytes, ProxyError> {
        self.record(SignerCall::SignTransaction(transaction.clone()))?;
        Ok(test_signed_transaction())
    }

    async fn send_transaction(
        &self,
        transaction: &TransactionRequest,
    ) -> Result<B256, ProxyError> {
        self.record(SignerCall::SendTransaction(transaction.clone()))?;
        Ok(test_tx_hash())
    }
}

pub struct FakeUpstream {
    failure: Option<String>,
    forwarded: Mutex<Vec<RpcRequest>>,
}

impl FakeUpstream {
    /// Answers every request with `{"result": {"method", "params"}}` and the request id
    pub fn echoing() -> Self {
        Self {
            failure: None,
            forwarded: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            forwarded: Mutex::new(Vec::new()),
        }
    }

    pub fn forwarded(&self) -> Vec<RpcRequest> {
        self.forwarded.lock().unwrap().clone()
    }

    pub fn reply_for(request: &RpcRequest) -> Box<RawValue> {
        to_raw_value(&json!({
            "jsonrpc": "2.0",
            "result": {"method": request.method, "params": request.params},
            "id": request.id(),
        }))
        .unwrap()
    }
}

#[async_trait]
impl UpstreamClient for FakeUpstream {
    async fn forward(&self, request: &RpcRequest) -> Result<Box<RawValue>, ProxyError> {
        self.forwarded.lock().unwrap().push(request.clone());
        match &self.failure {
            Some(reason) => Err(ProxyError::Upstream(reason.clone())),
            None => Ok(Self::reply_for(request)),
        }
    }
}
