use serde_json::value::RawValue;
use serde_json::{json, Value};

use super::types::{null_id, RpcError, RpcReply, RpcRequest, RpcResponse};
use crate::errors::ProxyError;

fn raw(text: &str) -> Box<RawValue> {
    RawValue::from_string(text.to_string()).unwrap()
}

fn parse(text: &str) -> Result<RpcRequest, RpcResponse> {
    RpcRequest::from_raw(raw(text))
}

#[test]
fn test_request_parses_standard_envelope() {
    let request =
        parse(r#"{"jsonrpc":"2.0","method":"eth_getBalance","params":["0xabc","latest"],"id":1}"#)
            .unwrap();

    assert_eq!(request.method, "eth_getBalance");
    assert_eq!(request.id().get(), "1");
    assert!(!request.is_notification());
    assert_eq!(request.param(1).unwrap(), &json!("latest"));
}

#[test]
fn test_request_keeps_original_text() {
    let text = r#"{"jsonrpc":"2.0","method":"eth_call","params":[{"value":123456789012345678901234567890}],"id":1,"x-trace":"abc"}"#;
    let request = parse(text).unwrap();
    assert_eq!(request.raw().get(), text);
}

#[test]
fn test_large_integer_id_is_kept_verbatim() {
    let request = parse(r#"{"method":"eth_chainId","id":123456789012345678901234567890}"#).unwrap();
    assert_eq!(request.id().get(), "123456789012345678901234567890");

    let response = RpcResponse::success(request.id().to_owned(), json!("0x1"));
    let text = serde_json::to_string(&response).unwrap();
    assert!(text.contains(r#""id":123456789012345678901234567890"#), "{text}");
}

#[test]
fn test_explicit_null_id_is_not_a_notification() {
    let request = parse(r#"{"jsonrpc":"2.0","method":"eth_chainId","id":null}"#).unwrap();
    assert_eq!(request.id().get(), "null");
    assert!(!request.is_notification());
}

#[test]
fn test_request_without_method_is_invalid() {
    let response = parse(r#"{"jsonrpc":"2.0","id":"abc"}"#).unwrap_err();

    assert_eq!(response.id.get(), r#""abc""#);
    assert_eq!(response.error().unwrap().code, -32600);
    assert!(response.result().is_none());
}

#[test]
fn test_non_object_request_has_null_id() {
    let response = parse("42").unwrap_err();
    assert_eq!(response.id.get(), "null");
    assert_eq!(response.error().unwrap().message, "Invalid Request");
}

#[test]
fn test_notification_has_null_reply_id() {
    let request = parse(r#"{"jsonrpc":"2.0","method":"eth_chainId"}"#).unwrap();
    assert!(request.is_notification());
    assert_eq!(request.id().get(), "null");
    assert_eq!(request.params, Value::Null);
}

#[test]
fn test_param_out_of_range() {
    let request = RpcRequest::new("eth_sign", json!([]), json!(7));
    let err = request.param(0).unwrap_err();
    assert!(matches!(err, ProxyError::InvalidParams(_)));
    assert!(err.to_string().contains("position 0"));
}

#[test]
fn test_param_requires_array() {
    let request = RpcRequest::new("eth_sign", json!({"message": "hi"}), json!(7));
    assert!(matches!(request.param(0), Err(ProxyError::InvalidParams(_))));
}

#[test]
fn test_success_response_shape() {
    let response = RpcResponse::success(raw("2"), json!("0xhash"));
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"jsonrpc": "2.0", "result": "0xhash", "id": 2})
    );
}

#[test]
fn test_error_response_shape() {
    let err = ProxyError::Signing("policy rejected".to_string());
    let response = RpcResponse::failure(raw("2"), RpcError::from(&err));
    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["error"]["code"], json!(-32603));
    assert_eq!(value["error"]["message"], json!("Internal error"));
    assert!(value["error"]["data"].as_str().unwrap().contains("policy rejected"));
    assert!(value.get("result").is_none());
    assert_eq!(value["id"], json!(2));
}

#[test]
fn test_parse_error_omits_data() {
    let response = RpcResponse::failure(null_id(), RpcError::parse_error());
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"jsonrpc": "2.0", "error": {"code": -32700, "message": "Parse error"}, "id": null})
    );
}

#[test]
fn test_forwarded_reply_is_untouched() {
    let upstream = r#"{"jsonrpc":"2.0","result":123456789012345678901234567890,"id":1,"extra":true}"#;
    let reply = RpcReply::Forwarded(raw(upstream));
    assert_eq!(serde_json::to_string(&reply).unwrap(), upstream);
}
