//! Scenarios over a provisioned accounts directory

use std::fs;
use std::sync::Arc;

use nearlend_e2e::contracts::*;
use nearlend_e2e::scenarios::{increment_field, negative_amount_rejected, private_setter_rejected};
use nearlend_e2e::{E2EError, TestHarness};
use nearlend_sdk::{AccountId, FileRegistry, InvocationClient, Sandbox, SdkError};
use tempfile::TempDir;

/// Accounts directory as written by the provisioning scripts, plus a sandbox
/// with the dtoken deployed
fn setup() -> (TempDir, Arc<Sandbox>, TestHarness) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(ROOT), format!("{}\n", ROOT_ADDRESS)).unwrap();
    fs::write(dir.path().join(DTOKEN), format!("{}\n", DTOKEN_ADDRESS)).unwrap();

    let dtoken = AccountId::new(DTOKEN_ADDRESS).unwrap();
    let sandbox = Arc::new(Sandbox::new());
    sandbox.install(&dtoken, DTOKEN_CODE);

    let client = InvocationClient::with_transport(sandbox.clone());
    let harness = TestHarness::with_parts(FileRegistry::new(dir.path()), client);
    (dir, sandbox, harness)
}

#[tokio::test]
async fn test_dtoken_common_methods() {
    let (_dir, sandbox, harness) = setup();
    let dtoken = harness.handle(DTOKEN).unwrap();
    let root = harness.resolve(ROOT).unwrap();

    for field in [TOTAL_SUPPLIES, TOTAL_BORROWS] {
        let (before, after) = increment_field(&harness, &dtoken, field).await.unwrap();
        assert_eq!((before, after), (0, 1));
        negative_amount_rejected(&harness, &dtoken, field).await.unwrap();
        private_setter_rejected(&harness, &dtoken, field, &root, 10)
            .await
            .unwrap();
        assert_eq!(sandbox.field(dtoken.address(), field), Some(1));
    }
}

#[test]
fn test_missing_record() {
    let (_dir, _sandbox, harness) = setup();
    let err = harness.handle(CONTROLLER).unwrap_err();
    assert!(matches!(err, E2EError::Sdk(SdkError::NotFound(_))));
    assert!(harness.sandbox().is_none());
}
