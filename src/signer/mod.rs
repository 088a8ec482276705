pub mod remote;
pub mod types;


use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;

use crate::errors::ProxyError;

// Re-export main types for easier access
pub use remote::RemoteSigner;
pub use types::{TransactionRequest, TypedData};

/// Capabilities of a custodial key held by a remote signing service
///
/// Implementations are shared across in-flight requests and must not keep
/// per-request state.
#[async_trait]
pub trait SigningClient: Send + Sync {
    /// Address of the custodial key
    async fn address(&self) -> Result<Address, ProxyError>;

    /// Sign an arbitrary message (plain text or 0x-prefixed hex)
    async fn sign_message(&self, message: &str) -> Result<Bytes, ProxyError>;

    /// Sign structured, domain-scoped data
    async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Bytes, ProxyError>;

    /// Sign a transaction and return the raw signed bytes
    async fn sign_transaction(
        &self,
        transaction: &TransactionRequest,
    ) -> Result<Bytes, ProxyError>;

    /// Sign and broadcast a transaction, returning its hash
    async fn send_transaction(&self, transaction: &TransactionRequest)
        -> Result<B256, ProxyError>;
}
