//! Tests for AccountId validation
//!
//! Property tests over generated ids plus the edge cases the registry and the
//! contract handle rely on.

use nearlend_primitives::{AccountId, AccountIdError, CodeHash};
use proptest::prelude::*;

// =============================================================================
// Generated ids
// =============================================================================

/// Strategy producing ids that follow the naming grammar
fn valid_account_id() -> impl Strategy<Value = String> {
    let part = "[a-z0-9]{1,8}";
    let sep = prop_oneof![Just("."), Just("-"), Just("_")];
    (part, prop::collection::vec((sep, part), 0..4)).prop_filter_map(
        "length within bounds",
        |(head, rest)| {
            let mut id = head;
            for (sep, part) in rest {
                id.push_str(sep);
                id.push_str(&part);
            }
            (2..=64).contains(&id.len()).then_some(id)
        },
    )
}

mod properties {
    use super::*;

    proptest! {
        /// Property: every id produced by the grammar parses and displays unchanged
        #[test]
        fn prop_valid_ids_roundtrip_display(id in valid_account_id()) {
            let parsed = AccountId::new(id.clone()).unwrap();
            prop_assert_eq!(parsed.as_str(), id.as_str());
            prop_assert_eq!(parsed.to_string(), id);
        }

        /// Property: parsing is a pure function of the input
        #[test]
        fn prop_parse_deterministic(input in ".{0,70}") {
            let first = AccountId::new(input.clone());
            let second = AccountId::new(input);
            prop_assert_eq!(first, second);
        }

        /// Property: uppercase letters are never accepted
        #[test]
        fn prop_uppercase_rejected(id in valid_account_id(), upper in "[A-Z]") {
            let candidate = format!("{}{}", upper, id);
            prop_assert!(AccountId::new(candidate).is_err());
        }

        /// Property: a trailing separator is always rejected
        #[test]
        fn prop_trailing_separator_rejected(id in valid_account_id()) {
            let candidate = format!("{}.", id);
            let is_misplaced = matches!(
                AccountId::new(candidate),
                Err(AccountIdError::MisplacedSeparator { .. })
                    | Err(AccountIdError::InvalidLength { .. })
            );
            prop_assert!(is_misplaced);
        }

        /// Property: code hashing is deterministic
        #[test]
        fn prop_code_hash_deterministic(code in prop::collection::vec(any::<u8>(), 0..512)) {
            prop_assert_eq!(CodeHash::of_code(&code), CodeHash::of_code(&code));
        }
    }
}

// =============================================================================
// Fixed cases
// =============================================================================

#[test]
fn accounts_from_the_lending_deployment_parse() {
    for id in [
        "ctrl.nearlend.testnet",
        "wnear.nearlend.testnet",
        "dev-1639659058556-60126760016852",
        "root.test.near",
    ] {
        assert!(AccountId::new(id).is_ok(), "{} should be valid", id);
    }
}

#[test]
fn code_hash_distinguishes_code() {
    assert_ne!(CodeHash::of_code(b"v1"), CodeHash::of_code(b"v2"));
}
