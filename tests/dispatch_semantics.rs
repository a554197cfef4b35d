#![forbid(unsafe_code)]

use autodns::core::dns::contract::{AutoDns, ContractError, Phase};
use autodns::core::dns::dispatch::{dispatch, Effect};
use autodns::core::types::{
    encode_operation, AccountId, Fund, Operation, RegisterSubdomain, TransferOwnership,
    UpdateRecord, OP_UPDATE_RECORD,
};

fn acct(b: u8) -> AccountId {
    AccountId::from_bytes([b; 32])
}

fn new_contract() -> AutoDns {
    AutoDns::construct(acct(1), "alpha.ton".to_string(), 0).expect("construct")
}

fn update_body(key: &str, category: u64, payload: &[u8]) -> Vec<u8> {
    encode_operation(&Operation::UpdateRecord(UpdateRecord {
        key: key.to_string(),
        category,
        payload: payload.to_vec(),
    }))
    .expect("encode")
}

#[test]
fn empty_body_is_a_plain_transfer_from_anyone() {
    let mut c = new_contract();
    let effect = dispatch(&mut c, &acct(42), 25, &[], 10).expect("transfer");
    assert_eq!(effect, Effect::Transfer);
    assert_eq!(c.balance(), 25);
    // Plain transfers are not privileged mutations.
    assert_eq!(c.last_update(), 0);
}

#[test]
fn fund_credits_and_echoes_query_id() {
    let mut c = new_contract();
    let body = encode_operation(&Operation::Fund(Fund { query_id: 777 })).expect("encode");
    let effect = dispatch(&mut c, &acct(42), 1_000, &body, 10).expect("fund");
    assert_eq!(effect, Effect::Funded { query_id: 777 });
    assert_eq!(c.balance(), 1_000);
}

#[test]
fn accepted_operation_credits_attached_value() {
    let mut c = new_contract();
    let body = update_body("api.alpha.ton", 1, b"addr");
    let effect = dispatch(&mut c, &acct(1), 5, &body, 10).expect("update");
    assert_eq!(
        effect,
        Effect::RecordSet {
            key: "api.alpha.ton".to_string()
        }
    );
    assert_eq!(c.balance(), 5);
    assert_eq!(c.last_update(), 10);
}

#[test]
fn rejected_message_never_credits() {
    let mut c = new_contract();
    let body = update_body("api.alpha.ton", 1, b"addr");

    let err = dispatch(&mut c, &acct(2), 5, &body, 10).unwrap_err();
    assert_eq!(err, ContractError::Unauthorized);
    assert_eq!(c.balance(), 0);
    assert!(c.records().is_empty());
}

#[test]
fn undecodable_body_is_malformed() {
    let mut c = new_contract();

    // Garbage, a truncated tag, an unknown tag, and trailing bytes.
    for body in [
        b"nonsense".to_vec(),
        vec![0x12],
        0xdead_beefu32.to_be_bytes().to_vec(),
        {
            let mut b = update_body("api.alpha.ton", 1, b"addr");
            b.push(0);
            b
        },
    ] {
        let err = dispatch(&mut c, &acct(1), 3, &body, 10).unwrap_err();
        assert_eq!(err, ContractError::Malformed);
    }
    assert_eq!(c.balance(), 0);
}

#[test]
fn tag_alone_is_an_incomplete_operation() {
    let mut c = new_contract();
    let body = OP_UPDATE_RECORD.to_be_bytes().to_vec();
    assert_eq!(
        dispatch(&mut c, &acct(1), 0, &body, 10).unwrap_err(),
        ContractError::Malformed
    );
}

#[test]
fn register_subdomain_routes_to_registry() {
    let mut c = new_contract();
    let body = encode_operation(&Operation::RegisterSubdomain(RegisterSubdomain {
        label: "mail".to_string(),
        owner: acct(9),
    }))
    .expect("encode");

    let effect = dispatch(&mut c, &acct(1), 0, &body, 10).expect("register");
    assert_eq!(
        effect,
        Effect::SubdomainRegistered {
            label: "mail".to_string()
        }
    );
    assert_eq!(c.subdomain_owner("mail"), Some(&acct(9)));
    assert_eq!(c.subdomain_owner("web"), None);
}

#[test]
fn transfer_ownership_effect_names_the_new_owner() {
    let mut c = new_contract();
    let body = encode_operation(&Operation::TransferOwnership(TransferOwnership {
        new_owner: acct(2),
    }))
    .expect("encode");

    let effect = dispatch(&mut c, &acct(1), 0, &body, 10).expect("transfer");
    assert_eq!(effect, Effect::OwnershipTransferred { new_owner: acct(2) });
    assert_eq!(c.owner(), acct(2));
}

#[test]
fn terminate_folds_attached_value_into_the_flush() {
    let mut c = new_contract();
    dispatch(&mut c, &acct(5), 40, &[], 10).expect("fund via transfer");

    let body = encode_operation(&Operation::Terminate).expect("encode");
    let effect = dispatch(&mut c, &acct(1), 2, &body, 20).expect("terminate");
    assert_eq!(
        effect,
        Effect::Terminated {
            to: acct(1),
            amount: 42
        }
    );
    assert_eq!(c.balance(), 0);
    assert_eq!(c.phase(), Phase::Terminated);
}

#[test]
fn terminated_contract_rejects_all_messages() {
    let mut c = new_contract();
    let body = encode_operation(&Operation::Terminate).expect("encode");
    dispatch(&mut c, &acct(1), 0, &body, 10).expect("terminate");

    // Plain transfer, funding, and owner operations all stop.
    for (sender, body) in [
        (acct(5), Vec::new()),
        (
            acct(5),
            encode_operation(&Operation::Fund(Fund { query_id: 1 })).expect("encode"),
        ),
        (acct(1), update_body("api.alpha.ton", 1, b"x")),
        (
            acct(1),
            encode_operation(&Operation::Terminate).expect("encode"),
        ),
    ] {
        let err = dispatch(&mut c, &sender, 9, &body, 20).unwrap_err();
        assert_eq!(err, ContractError::Stopped);
    }
    assert_eq!(c.balance(), 0);
}

#[test]
fn terminal_state_outranks_every_other_rejection() {
    let mut c = new_contract();
    let body = encode_operation(&Operation::Terminate).expect("encode");
    dispatch(&mut c, &acct(1), 0, &body, 10).expect("terminate");

    // Bad operand shape, a non-owner sender, and undecodable bytes would
    // each be rejected on their own; the terminal state stops them first.
    for (sender, body) in [
        (acct(1), update_body("", 1, b"x")),
        (acct(7), update_body("api.alpha.ton", 1, b"x")),
        (acct(1), b"junk".to_vec()),
    ] {
        assert_eq!(
            dispatch(&mut c, &sender, 0, &body, 20).unwrap_err(),
            ContractError::Stopped
        );
    }
}
