pub mod http;

use async_trait::async_trait;
use serde_json::value::RawValue;

use crate::errors::ProxyError;
use crate::rpc::RpcRequest;

pub use http::HttpUpstream;

/// Plain JSON-RPC call against the upstream Ethereum node
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Send `request` byte-for-byte and return the node's JSON body without inspecting it
    async fn forward(&self, request: &RpcRequest) -> Result<Box<RawValue>, ProxyError>;
}
