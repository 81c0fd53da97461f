//! Client integration tests for nearlend-sdk
//!
//! Runs view/call/deploy against the in-memory sandbox runtime.

use std::sync::Arc;

use nearlend_sdk::sandbox::Fault;
use nearlend_sdk::{
    AccountId, BytecodeRef, CallerPolicy, ContractHandle, DeployOptions, Endpoint, ErrorKind,
    InvocationClient, InvocationRequest, InvocationResult, RawResponse, Sandbox, SdkError,
};
use serde_json::json;

const DTOKEN: &str = "dtoken.nearlend.testnet";
const ROOT: &str = "root.testnet";
const DTOKEN_CODE: &[u8] = b"\0asm\x01\0\0\0dtoken";

fn account(id: &str) -> AccountId {
    AccountId::new(id).unwrap()
}

/// Sandbox with the dtoken installed and total supplies at 5
fn setup() -> (Arc<Sandbox>, InvocationClient, ContractHandle) {
    let sandbox = Arc::new(Sandbox::new());
    sandbox.install(&account(DTOKEN), DTOKEN_CODE);
    sandbox.set_field(&account(DTOKEN), "total_supplies", 5);
    let client = InvocationClient::with_transport(sandbox.clone());
    let handle = ContractHandle::new(DTOKEN).unwrap();
    (sandbox, client, handle)
}

// ==================== View Tests ====================

#[tokio::test]
async fn test_view_returns_remote_value() {
    let (_sandbox, client, handle) = setup();
    let result = client
        .contract(&handle)
        .view("get_total_supplies", json!({}))
        .await
        .unwrap();
    assert_eq!(result, InvocationResult::success(json!(5)));
}

#[tokio::test]
async fn test_view_uninitialized_value_comes_from_contract() {
    let (_sandbox, client, handle) = setup();
    let result = client
        .contract(&handle)
        .view("get_total_borrows", json!({}))
        .await
        .unwrap();
    assert_eq!(result.as_balance().unwrap(), 0);
}

#[tokio::test]
async fn test_view_does_not_mutate() {
    let (sandbox, client, handle) = setup();
    let result = client
        .contract(&handle)
        .view("set_total_supplies", json!({"amount": 9}))
        .await
        .unwrap();
    assert_eq!(result.error_kind(), Some(ErrorKind::FunctionCallError));
    assert!(result.detail().unwrap().contains("ProhibitedInView"));
    assert_eq!(sandbox.field(&account(DTOKEN), "total_supplies"), Some(5));
}

#[tokio::test]
async fn test_view_unknown_method() {
    let (_sandbox, client, handle) = setup();
    let result = client
        .contract(&handle)
        .view("get_exchange_rate_v2x", json!({}))
        .await
        .unwrap();
    // Any get_ method reads a field
    assert!(result.is_success());

    let result = client.contract(&handle).view("borrow", json!({})).await.unwrap();
    assert_eq!(result.error_kind(), Some(ErrorKind::FunctionCallError));
    assert!(result.detail().unwrap().contains("MethodNotFound"));
}

#[tokio::test]
async fn test_view_carries_caller_only_when_supplied() {
    let (sandbox, client, handle) = setup();
    let contract = client.contract(&handle);
    contract.view("get_total_supplies", json!({})).await.unwrap();
    let result = contract
        .view_as("get_total_supplies", json!({}), &account(ROOT))
        .await
        .unwrap();
    assert_eq!(result.as_balance().unwrap(), 5);

    let requests = sandbox.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].body.get("account_id").is_none());
    assert_eq!(requests[1].body["account_id"], ROOT);
}

#[tokio::test]
async fn test_view_contract_without_code() {
    let (_sandbox, client, _handle) = setup();
    let empty = ContractHandle::new("empty.testnet").unwrap();
    let result = client.contract(&empty).view("get_total_supplies", json!({})).await.unwrap();
    assert_eq!(result.error_kind(), Some(ErrorKind::FunctionCallError));
    assert!(result.detail().unwrap().contains("CodeDoesNotExist"));
}

// ==================== Call Tests ====================

#[tokio::test]
async fn test_monotonic_mutation() {
    let (_sandbox, client, handle) = setup();
    let dtoken = client.contract(&handle);

    let before = dtoken
        .view("get_total_supplies", json!({}))
        .await
        .unwrap()
        .as_balance()
        .unwrap();
    let result = dtoken
        .call("set_total_supplies", json!({"amount": (before + 1).to_string()}))
        .await
        .unwrap();
    assert!(result.is_success(), "unexpected failure: {:?}", result);

    let after = dtoken
        .view("get_total_supplies", json!({}))
        .await
        .unwrap()
        .as_balance()
        .unwrap();
    assert!(before < after);
    assert_eq!(after, before + 1);
}

#[tokio::test]
async fn test_negative_amount_rejected_remotely() {
    let (sandbox, client, handle) = setup();
    let dtoken = client.contract(&handle);

    let result = dtoken
        .call_as("set_total_supplies", json!({"amount": -1}), &account(DTOKEN))
        .await
        .unwrap();
    assert_eq!(result.error_kind(), Some(ErrorKind::FunctionCallError));
    assert!(result.detail().unwrap().contains("Failed to deserialize"));

    // The request reached the remote side; nothing was validated locally
    assert_eq!(sandbox.request_count(Endpoint::Call), 1);

    let value = dtoken.view("get_total_supplies", json!({})).await.unwrap();
    assert_eq!(value.as_balance().unwrap(), 5);
}

#[tokio::test]
async fn test_private_method_rejects_other_caller() {
    let (sandbox, client, handle) = setup();
    let dtoken = client.contract(&handle);

    let result = dtoken
        .call_as("set_total_supplies", json!({"amount": 10}), &account(ROOT))
        .await
        .unwrap();
    assert_eq!(result.error_kind(), Some(ErrorKind::FunctionCallError));
    assert!(result.detail().unwrap().contains("is private"));
    assert_eq!(sandbox.field(&account(DTOKEN), "total_supplies"), Some(5));

    let result = dtoken
        .call_as("set_total_supplies", json!({"amount": 10}), &account(DTOKEN))
        .await
        .unwrap();
    assert!(result.is_success());
    assert_eq!(sandbox.field(&account(DTOKEN), "total_supplies"), Some(10));
}

#[tokio::test]
async fn test_default_caller_policy_account() {
    let (sandbox, client, handle) = setup();
    let client = client.with_caller_policy(CallerPolicy::Account(account(ROOT)));

    let result = client
        .contract(&handle)
        .call("set_total_supplies", json!({"amount": 6}))
        .await
        .unwrap();
    assert_eq!(result.error_kind(), Some(ErrorKind::FunctionCallError));
    assert_eq!(sandbox.requests()[0].body["account_id"], ROOT);
}

#[tokio::test]
async fn test_calls_are_issued_in_order() {
    let (sandbox, client, handle) = setup();
    let dtoken = client.contract(&handle);

    for amount in 1..=3u64 {
        dtoken
            .call("set_total_supplies", json!({ "amount": amount }))
            .await
            .unwrap();
    }

    let amounts: Vec<_> = sandbox
        .requests()
        .iter()
        .map(|r| r.body["params"]["amount"].as_u64().unwrap())
        .collect();
    assert_eq!(amounts, vec![1, 2, 3]);
    assert_eq!(sandbox.field(&account(DTOKEN), "total_supplies"), Some(3));
}

#[tokio::test]
async fn test_invalid_args_rejected_before_sending() {
    let (sandbox, client, handle) = setup();
    let err = client
        .contract(&handle)
        .call("set_total_supplies", json!(6))
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::InvalidArgs(_)));
    assert!(sandbox.requests().is_empty());
}

// ==================== Failure Classification ====================

#[tokio::test]
async fn test_timeout_is_transport_error_without_retry() {
    let (sandbox, client, handle) = setup();
    sandbox.inject_fault(Fault::Timeout);

    let request = InvocationRequest::new("set_total_supplies")
        .unwrap()
        .arg("amount", 6);
    let result = client.call(&handle, &request).await;

    assert_eq!(result.error_kind(), Some(ErrorKind::TransportError));
    assert!(result.detail().unwrap().contains("timed out"));
    assert_eq!(sandbox.request_count(Endpoint::Call), 1);
    assert_eq!(sandbox.field(&account(DTOKEN), "total_supplies"), Some(5));
}

#[tokio::test]
async fn test_server_error_is_transport_error() {
    let (sandbox, client, handle) = setup();
    sandbox.inject_fault(Fault::Respond(RawResponse::new(503, json!("Service Unavailable"))));

    let result = client
        .contract(&handle)
        .view("get_total_supplies", json!({}))
        .await
        .unwrap();
    assert_eq!(
        result,
        InvocationResult::failure(ErrorKind::TransportError, "HTTP 503: Service Unavailable")
    );
}

// ==================== Deployment Tests ====================

#[tokio::test]
async fn test_deploy_to_empty_account() {
    let (sandbox, client, _handle) = setup();
    let target = ContractHandle::new("ctrl.nearlend.testnet").unwrap();

    let deployed = client
        .deploy(&target, &BytecodeRef::bytes(DTOKEN_CODE), DeployOptions::default())
        .await
        .unwrap();
    assert_eq!(deployed, target);
    assert!(sandbox.code_hash(target.address()).is_some());
}

#[tokio::test]
async fn test_deploy_is_idempotent() {
    let (sandbox, client, handle) = setup();
    let code = BytecodeRef::bytes(DTOKEN_CODE);

    let first = client.deploy(&handle, &code, DeployOptions::default()).await.unwrap();
    let second = client.deploy(&handle, &code, DeployOptions::default()).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.address().as_str(), DTOKEN);
    assert_eq!(sandbox.request_count(Endpoint::Deploy), 0);
}

#[tokio::test]
async fn test_deploy_conflict_requires_force() {
    let (sandbox, client, handle) = setup();
    let upgraded = BytecodeRef::bytes(&b"\0asm\x01\0\0\0dtoken-v2"[..]);

    let err = client
        .deploy(&handle, &upgraded, DeployOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Deployment(_)));
    assert_eq!(sandbox.request_count(Endpoint::Deploy), 0);

    client.deploy(&handle, &upgraded, DeployOptions::force()).await.unwrap();
    assert_eq!(sandbox.request_count(Endpoint::Deploy), 1);
    // Contract state survives a code upgrade
    assert_eq!(sandbox.field(&account(DTOKEN), "total_supplies"), Some(5));
}

#[tokio::test]
async fn test_deploy_rejected_code() {
    let (_sandbox, client, _handle) = setup();
    let target = ContractHandle::new("fresh.testnet").unwrap();

    let err = client
        .deploy(&target, &BytecodeRef::bytes(&b"not wasm"[..]), DeployOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.taxonomy(), "DeploymentError");
    assert!(err.to_string().contains("PrepareError"));
}

#[tokio::test]
async fn test_deploy_unreachable_server() {
    let (sandbox, client, handle) = setup();
    sandbox.inject_fault(Fault::Timeout);

    let err = client
        .deploy(&handle, &BytecodeRef::bytes(DTOKEN_CODE), DeployOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Deployment(_)));
    assert!(err.to_string().contains("TransportError"));
}
