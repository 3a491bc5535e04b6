//! Byte-level checks against the verifier's ABI schema

use alloy_primitives::{hex, Bytes, U256};
use alloy_sol_types::{sol, SolValue};
use chama_krnl::internal::{
    encode::abi::{encode_kernel_responses, encode_params_text, params_text},
    kernels::table::{resolve, Action, KernelResponse},
    profile::RegistrationProfile,
};

sol! {
    struct KernelResponseSchema {
        uint256 kernelId;
        bytes result;
        string err;
    }
}

#[test]
fn single_row_table_encodes_bit_exact() {
    let table = vec![KernelResponse {
        kernel_id: 90,
        response_data: U256::from(75u64).abi_encode().into(),
        error_message: String::new(),
    }];

    // abiCoder.encode(['tuple(uint256,bytes,string)[]'], [[[90, <uint 75>, '']]])
    let expected = hex::decode(concat!(
        // offset to array
        "0000000000000000000000000000000000000000000000000000000000000020",
        // array length
        "0000000000000000000000000000000000000000000000000000000000000001",
        // offset to tuple 0
        "0000000000000000000000000000000000000000000000000000000000000020",
        // kernelId = 90
        "000000000000000000000000000000000000000000000000000000000000005a",
        // offset to result
        "0000000000000000000000000000000000000000000000000000000000000060",
        // offset to err
        "00000000000000000000000000000000000000000000000000000000000000a0",
        // result length = 32
        "0000000000000000000000000000000000000000000000000000000000000020",
        // result payload: uint256 75
        "000000000000000000000000000000000000000000000000000000000000004b",
        // err length = 0
        "0000000000000000000000000000000000000000000000000000000000000000",
    ))
    .unwrap();

    assert_eq!(encode_kernel_responses(&table).as_ref(), expected.as_slice());
}

#[test]
fn params_envelope_encodes_bit_exact() {
    // abiCoder.encode(['bytes'], [toUtf8Bytes('{"amount":100}')])
    let encoded = encode_params_text("{\"amount\":100}");

    let expected = hex::decode(concat!(
        "0000000000000000000000000000000000000000000000000000000000000020",
        "000000000000000000000000000000000000000000000000000000000000000e",
        "7b22616d6f756e74223a3130307d000000000000000000000000000000000000",
    ))
    .unwrap();

    assert_eq!(encoded.as_ref(), expected.as_slice());
}

#[test]
fn every_action_table_round_trips_for_both_profiles() {
    let actions = [
        Action::CreateChama,
        Action::JoinChama,
        Action::Contribute,
        Action::Payout,
        Action::Other,
    ];

    for profile in [RegistrationProfile::chama_v1(), RegistrationProfile::chama_v2()] {
        for action in actions {
            let table = resolve(action, &profile);
            let encoded = encode_kernel_responses(&table);

            let rows = Vec::<KernelResponseSchema>::abi_decode(&encoded, true).unwrap();
            let ids: Vec<u64> = rows.iter().map(|r| r.kernelId.to::<u64>()).collect();
            assert_eq!(ids, profile.kernel_ids);
        }
    }
}

#[test]
fn params_text_is_canonical_json() {
    let value = serde_json::json!({ "amount": 100, "memo": "monthly" });
    let text = params_text(&value).unwrap();

    let reparsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(reparsed, value);

    let envelope = encode_params_text(&text);
    let inner = Bytes::abi_decode(&envelope, true).unwrap();
    assert_eq!(inner.as_ref(), text.as_bytes());
}

#[test]
fn string_kernel_results_survive_the_nested_encoding() {
    let profile = RegistrationProfile::chama_v1();
    let table = resolve(Action::CreateChama, &profile);
    let encoded = encode_kernel_responses(&table);

    let rows = Vec::<KernelResponseSchema>::abi_decode(&encoded, true).unwrap();
    // Kernel 347 is the day-and-time kernel; its inner payload is a string
    let day = String::abi_decode(&rows[3].result, true).unwrap();
    assert_eq!(day, "Monday 14:30");
}
