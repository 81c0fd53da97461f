//! End-to-end scenarios
//!
//! Each scenario runs against whatever a [`TestHarness`] is wired to, so the
//! same checks cover the sandbox and a live deployment. Scenarios report
//! unmet expectations as [`E2EError::Assertion`].

use nearlend_primitives::{AccountId, Balance};
use nearlend_sdk::{BytecodeRef, ContractHandle, DeployOptions, ErrorKind, InvocationResult};
use serde_json::{json, Value};

use crate::contracts::{getter, setter};
use crate::{E2EError, E2EResult, TestHarness};

/// JSON form of an amount: a number while it fits in `u64`
pub fn amount_arg(amount: Balance) -> Value {
    match u64::try_from(amount) {
        Ok(small) => json!(small),
        Err(_) => json!(amount.to_string()),
    }
}

/// Read `field`, set it to one more as the contract itself, read it again
///
/// Returns the values before and after.
pub async fn increment_field(
    harness: &TestHarness,
    contract: &ContractHandle,
    field: &str,
) -> E2EResult<(Balance, Balance)> {
    let before = harness.read_field(contract, field).await?;
    let next = before
        .checked_add(1)
        .ok_or_else(|| E2EError::Assertion(format!("{} is already at the maximum", field)))?;

    let result = harness
        .contract(contract)
        .call_as(&setter(field), json!({ "amount": amount_arg(next) }), contract.address())
        .await?;
    expect_success(&result, &setter(field))?;

    let after = harness.read_field(contract, field).await?;
    if after != next {
        return Err(E2EError::Assertion(format!(
            "{} went from {} to {}, expected {}",
            field, before, after, next
        )));
    }
    Ok((before, after))
}

/// Set `field` to `value` as the contract itself and read it back
pub async fn set_field(
    harness: &TestHarness,
    contract: &ContractHandle,
    field: &str,
    value: Balance,
) -> E2EResult<Balance> {
    let result = harness
        .contract(contract)
        .call_as(&setter(field), json!({ "amount": amount_arg(value) }), contract.address())
        .await?;
    expect_success(&result, &setter(field))?;
    harness.read_field(contract, field).await
}

/// Pass a negative amount to the setter of `field`
///
/// The contract must reject it with a `FunctionCallError` and keep the field
/// unchanged.
pub async fn negative_amount_rejected(
    harness: &TestHarness,
    contract: &ContractHandle,
    field: &str,
) -> E2EResult<InvocationResult> {
    let before = harness.read_field(contract, field).await?;
    let result = harness
        .contract(contract)
        .call_as(&setter(field), json!({ "amount": -1 }), contract.address())
        .await?;
    expect_kind(&result, ErrorKind::FunctionCallError, &setter(field))?;
    expect_unchanged(harness, contract, field, before).await?;
    Ok(result)
}

/// Call the private setter of `field` as `caller`
///
/// The contract must reject it with a `FunctionCallError` and keep the field
/// unchanged.
pub async fn private_setter_rejected(
    harness: &TestHarness,
    contract: &ContractHandle,
    field: &str,
    caller: &AccountId,
    amount: Balance,
) -> E2EResult<InvocationResult> {
    let before = harness.read_field(contract, field).await?;
    let result = harness
        .contract(contract)
        .call_as(&setter(field), json!({ "amount": amount_arg(amount) }), caller)
        .await?;
    expect_kind(&result, ErrorKind::FunctionCallError, &setter(field))?;
    expect_unchanged(harness, contract, field, before).await?;
    Ok(result)
}

/// Deploy `bytecode` twice; both deploys must land on the same address
pub async fn deploy_twice(
    harness: &TestHarness,
    target: &ContractHandle,
    bytecode: &BytecodeRef,
) -> E2EResult<ContractHandle> {
    let client = harness.client();
    let first = client.deploy(target, bytecode, DeployOptions::default()).await?;
    let second = client.deploy(target, bytecode, DeployOptions::default()).await?;
    if first != second {
        return Err(E2EError::Assertion(format!(
            "redeploy moved the contract from {} to {}",
            first, second
        )));
    }
    Ok(first)
}

fn expect_success(result: &InvocationResult, method: &str) -> E2EResult<()> {
    match result {
        InvocationResult::Success { .. } => Ok(()),
        InvocationResult::Failure { error_kind, detail } => Err(E2EError::Assertion(format!(
            "{} failed: {}: {}",
            method, error_kind, detail
        ))),
    }
}

fn expect_kind(result: &InvocationResult, expected: ErrorKind, method: &str) -> E2EResult<()> {
    if result.error_kind() == Some(expected) {
        return Ok(());
    }
    Err(E2EError::Assertion(format!(
        "{} should fail with {}, got {:?}",
        method, expected, result
    )))
}

async fn expect_unchanged(
    harness: &TestHarness,
    contract: &ContractHandle,
    field: &str,
    before: Balance,
) -> E2EResult<()> {
    let after = harness.read_field(contract, field).await?;
    if after != before {
        return Err(E2EError::Assertion(format!(
            "rejected {} changed {} from {} to {}",
            setter(field),
            getter(field),
            before,
            after
        )));
    }
    Ok(())
}
