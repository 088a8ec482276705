use serde_json::{json, Value};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, info};

use crate::constants::methods;
use crate::errors::ProxyError;
use crate::rpc::RpcRequest;
use crate::signer::{SigningClient, TransactionRequest, TypedData};

pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<Value, ProxyError>> + Send + 'a>>;

/// An intercepted method, answered by the signing service
pub type Handler = for<'a> fn(&'a dyn SigningClient, &'a RpcRequest) -> HandlerFuture<'a>;

/// Method name → handler for every intercepted method
pub fn routing_table() -> HashMap<&'static str, Handler> {
    let mut routes: HashMap<&'static str, Handler> = HashMap::new();
    routes.insert(methods::ETH_ACCOUNTS, accounts);
    routes.insert(methods::ETH_SEND_TRANSACTION, send_transaction);
    routes.insert(methods::ETH_SIGN_TRANSACTION, sign_transaction);
    routes.insert(methods::ETH_SIGN, sign_message);
    routes.insert(methods::PERSONAL_SIGN, sign_message);
    routes.insert(methods::ETH_SIGN_TYPED_DATA, sign_typed_data);
    routes.insert(methods::ETH_SIGN_TYPED_DATA_V3, sign_typed_data);
    routes.insert(methods::ETH_SIGN_TYPED_DATA_V4, sign_typed_data);
    routes
}

fn accounts<'a>(signer: &'a dyn SigningClient, _request: &'a RpcRequest) -> HandlerFuture<'a> {
    Box::pin(async move {
        let address = signer.address().await?;
        Ok(json!([address]))
    })
}

fn send_transaction<'a>(signer: &'a dyn SigningClient, request: &'a RpcRequest) -> HandlerFuture<'a> {
    Box::pin(async move {
        let transaction = TransactionRequest::from_param(request.param(0)?)?;
        let hash = signer.send_transaction(&transaction).await?;
        info!("Transaction submitted: {} (id: {})", hash, request.id());
        Ok(json!(hash))
    })
}

fn sign_transaction<'a>(signer: &'a dyn SigningClient, request: &'a RpcRequest) -> HandlerFuture<'a> {
    Box::pin(async move {
        let transaction = TransactionRequest::from_param(request.param(0)?)?;
        let signed = signer.sign_transaction(&transaction).await?;
        Ok(json!(signed))
    })
}

/// `eth_sign` and `personal_sign` both sign the first positional parameter
fn sign_message<'a>(signer: &'a dyn SigningClient, request: &'a RpcRequest) -> HandlerFuture<'a> {
    Box::pin(async move {
        let message = request.param(0)?.as_str().ok_or_else(|| {
            ProxyError::InvalidParams("message must be a string".to_string())
        })?;
        debug!("Signing {}-byte message", message.len());

        let signature = signer.sign_message(message).await?;
        Ok(json!(signature))
    })
}

fn sign_typed_data<'a>(signer: &'a dyn SigningClient, request: &'a RpcRequest) -> HandlerFuture<'a> {
    Box::pin(async move {
        let typed_data = TypedData::from_param(request.param(1)?)?;
        debug!(
            "Signing typed data (primary type: {})",
            typed_data.primary_type.as_deref().unwrap_or("unspecified")
        );

        let signature = signer.sign_typed_data(&typed_data).await?;
        Ok(json!(signature))
    })
}
