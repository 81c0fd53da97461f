//! HTTP transport tests against a mock REST API server

#![cfg(feature = "http")]

use mockito::{Matcher, Server};
use nearlend_sdk::{
    AccountId, BytecodeRef, CodeHash, ContractHandle, DeployOptions, Endpoint, ErrorKind,
    HttpTransport, InvocationClient, InvocationRequest, Transport,
};
use serde_json::json;

const DTOKEN_CODE: &[u8] = b"\0asm\x01\0\0\0dtoken";

fn dtoken() -> ContractHandle {
    ContractHandle::new("dtoken.nearlend.testnet").unwrap()
}

#[tokio::test]
async fn test_view_posts_request_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/view")
        .match_body(Matcher::PartialJson(json!({
            "contract": "dtoken.nearlend.testnet",
            "method": "get_total_supplies",
            "params": {}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("5")
        .expect(1)
        .create_async()
        .await;

    let client = InvocationClient::with_transport(HttpTransport::new(&server.url()));
    let request = InvocationRequest::new("get_total_supplies").unwrap();
    let result = client.view(&dtoken(), &request).await;

    assert_eq!(result.as_balance().unwrap(), 5);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_call_rejection_is_function_call_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/call")
        .match_body(Matcher::PartialJson(json!({
            "account_id": "root.testnet",
            "method": "set_total_supplies",
            "params": {"amount": 10}
        })))
        .with_status(400)
        .with_body(
            json!({
                "type": "FunctionCallError",
                "kind": {"ExecutionError": "Smart contract panicked: Method set_total_supplies is private"}
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = InvocationClient::with_transport(HttpTransport::new(&server.url()));
    let result = client
        .contract(&dtoken())
        .call_as(
            "set_total_supplies",
            json!({"amount": 10}),
            &AccountId::new("root.testnet").unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(result.error_kind(), Some(ErrorKind::FunctionCallError));
    assert!(result.detail().unwrap().contains("is private"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/call")
        .with_status(502)
        .with_body("Bad Gateway")
        .expect(1)
        .create_async()
        .await;

    let client = InvocationClient::with_transport(HttpTransport::new(&server.url()));
    let request = InvocationRequest::new("set_total_supplies")
        .unwrap()
        .arg("amount", 6);
    let result = client.call(&dtoken(), &request).await;

    assert_eq!(result.error_kind(), Some(ErrorKind::TransportError));
    assert_eq!(result.detail(), Some("HTTP 502: Bad Gateway"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Nothing listens on the discard port
    let client = InvocationClient::with_transport(HttpTransport::new("http://127.0.0.1:9"));
    let request = InvocationRequest::new("get_total_supplies").unwrap();
    let result = client.view(&dtoken(), &request).await;
    assert_eq!(result.error_kind(), Some(ErrorKind::TransportError));
}

#[tokio::test]
async fn test_raw_transport_keeps_non_json_body() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/code_hash")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let transport = HttpTransport::new(&server.url());
    let response = transport
        .request_json(Endpoint::CodeHash, json!({"account_id": "dtoken.nearlend.testnet"}))
        .await
        .unwrap();
    assert_eq!(response.status, 500);
    assert_eq!(response.body, json!("internal error"));
}

#[tokio::test]
async fn test_deploy_skips_identical_code() {
    let hash = CodeHash::of_code(DTOKEN_CODE);

    let mut server = Server::new_async().await;
    let code_hash = server
        .mock("POST", "/code_hash")
        .with_status(200)
        .with_body(json!({"code_hash": hash.to_hex()}).to_string())
        .expect(1)
        .create_async()
        .await;
    let deploy = server
        .mock("POST", "/deploy")
        .expect(0)
        .create_async()
        .await;

    let client = InvocationClient::with_transport(HttpTransport::new(&server.url()));
    let handle = client
        .deploy(&dtoken(), &BytecodeRef::bytes(DTOKEN_CODE), DeployOptions::default())
        .await
        .unwrap();

    assert_eq!(handle, dtoken());
    code_hash.assert_async().await;
    deploy.assert_async().await;
}

#[tokio::test]
async fn test_deploy_sends_base64_code() {
    let mut server = Server::new_async().await;
    let _code_hash = server
        .mock("POST", "/code_hash")
        .with_status(200)
        .with_body(json!({"code_hash": null}).to_string())
        .create_async()
        .await;
    let deploy = server
        .mock("POST", "/deploy")
        .match_body(Matcher::Json(json!({
            "account_id": "dtoken.nearlend.testnet",
            "code_base64": "AGFzbQ=="
        })))
        .with_status(200)
        .with_body(json!({"status": {"SuccessValue": ""}}).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = InvocationClient::with_transport(HttpTransport::new(&server.url()));
    client
        .deploy(&dtoken(), &BytecodeRef::bytes(&b"\0asm"[..]), DeployOptions::default())
        .await
        .unwrap();
    deploy.assert_async().await;
}
