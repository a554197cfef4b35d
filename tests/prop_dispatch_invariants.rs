// Copyright (c) 2026 AutoDNS
// Licensed under the Apache License, Version 2.0

#![forbid(unsafe_code)]

use proptest::prelude::*;

use autodns::core::dns::contract::AutoDns;
use autodns::core::dns::dispatch::{dispatch, Effect};
use autodns::core::types::{
    decode_operation, encode_operation, AccountId, Fund, Operation, RegisterSubdomain,
    TransferOwnership, UpdateRecord,
};

fn acct(b: u8) -> AccountId {
    AccountId::from_bytes([b; 32])
}

fn label() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,6}"
}

fn name() -> impl Strategy<Value = String> {
    proptest::collection::vec(label(), 1..4).prop_map(|labels| labels.join("."))
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        (label(), any::<[u8; 32]>()).prop_map(|(label, owner)| {
            Operation::RegisterSubdomain(RegisterSubdomain {
                label,
                owner: AccountId::from_bytes(owner),
            })
        }),
        (name(), any::<u64>(), proptest::collection::vec(any::<u8>(), 0..32)).prop_map(
            |(key, category, payload)| {
                Operation::UpdateRecord(UpdateRecord {
                    key,
                    category,
                    payload,
                })
            }
        ),
        any::<[u8; 32]>().prop_map(|owner| {
            Operation::TransferOwnership(TransferOwnership {
                new_owner: AccountId::from_bytes(owner),
            })
        }),
        Just(Operation::Terminate),
        any::<u64>().prop_map(|query_id| Operation::Fund(Fund { query_id })),
    ]
}

proptest! {
    #[test]
    fn any_valid_operation_roundtrips_through_the_wire(op in operation()) {
        let bytes = encode_operation(&op).expect("encode");
        prop_assert_eq!(decode_operation(&bytes).expect("decode"), op);
    }

    // The balance only ever moves on acceptance: rejected messages leave it
    // alone, accepted ones absorb exactly the attached value, and termination
    // pays everything out.
    #[test]
    fn balance_moves_only_on_accepted_messages(
        op in operation(),
        value in 0u128..1_000_000,
        initial in 0u128..1_000_000,
        sender_is_owner in any::<bool>(),
    ) {
        let mut contract =
            AutoDns::construct(acct(1), "alpha.ton".to_string(), initial).expect("construct");
        let sender = if sender_is_owner { acct(1) } else { acct(2) };
        let body = encode_operation(&op).expect("encode");

        match dispatch(&mut contract, &sender, value, &body, 5) {
            Ok(Effect::Terminated { to, amount }) => {
                prop_assert_eq!(to, acct(1));
                prop_assert_eq!(amount, initial + value);
                prop_assert_eq!(contract.balance(), 0);
            }
            Ok(_) => prop_assert_eq!(contract.balance(), initial + value),
            Err(_) => prop_assert_eq!(contract.balance(), initial),
        }
    }

    #[test]
    fn arbitrary_bytes_never_panic_the_dispatcher(
        body in proptest::collection::vec(any::<u8>(), 0..64),
        value in 0u128..1_000,
    ) {
        let mut contract =
            AutoDns::construct(acct(1), "alpha.ton".to_string(), 0).expect("construct");
        // Either outcome is fine; the engine just must stay consistent.
        let _ = dispatch(&mut contract, &acct(1), value, &body, 5);
        prop_assert!(contract.balance() == 0 || contract.balance() == value);
    }
}
