//! ABI encodings for the three KrnlPayload fields. The byte layout is
//! dictated by the on-chain verifier; every encoder here must stay bit-exact
//! with the schema it parses.

use crate::internal::auth::sign::AuthTuple;
use crate::internal::kernels::table::KernelResponse;
use alloy_primitives::{Bytes, U256};
use alloy_sol_types::{sol, SolValue};
use serde::Serialize;

sol! {
    /// Kernel execution result as the verifier reads it:
    /// `tuple(uint256, bytes, string)`.
    struct KernelResponseWire {
        uint256 kernelId;
        bytes result;
        string err;
    }

    /// Authorization record as the verifier reads it:
    /// `(bytes, bytes32, bytes, uint256, bool)` in declaration order.
    struct AuthWire {
        bytes kernelResponseSignature;
        bytes32 kernelParamObjectDigest;
        bytes signatureToken;
        uint256 nonce;
        bool finalOpinion;
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Function params are not serializable: {0}")]
    Params(#[from] serde_json::Error),
}

/// Encodes a response table as a single dynamic array of
/// `(uint256, bytes, string)` tuples.
pub fn encode_kernel_responses(table: &[KernelResponse]) -> Bytes {
    let rows: Vec<KernelResponseWire> = table
        .iter()
        .map(|row| KernelResponseWire {
            kernelId: U256::from(row.kernel_id),
            result: row.response_data.clone(),
            err: row.error_message.clone(),
        })
        .collect();
    rows.abi_encode().into()
}

/// Canonical text form of the caller's function params. This is the inner
/// content of the `kernelParams` envelope and the `functionParams` field sent
/// to the kernel node, so both must come from the same serialization.
pub fn params_text<T: Serialize>(params: &T) -> Result<String, EncodeError> {
    Ok(serde_json::to_string(params)?)
}

/// Wraps the params text as one ABI `bytes` field. An empty structure still
/// produces a non-empty envelope (the text serialization of the empty
/// structure, not a zero-length byte string).
pub fn encode_params_text(text: &str) -> Bytes {
    Bytes::from(text.as_bytes().to_vec()).abi_encode().into()
}

/// Encodes the authorization record as a five-field parameter sequence, in
/// the exact field order of [`AuthWire`].
pub fn encode_auth(auth: &AuthTuple) -> Bytes {
    AuthWire {
        kernelResponseSignature: auth.kernel_response_signature.clone(),
        kernelParamObjectDigest: auth.kernel_param_object_digest,
        signatureToken: auth.signature_token.clone(),
        nonce: U256::from(auth.nonce),
        finalOpinion: auth.final_opinion,
    }
    .abi_encode_params()
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;

    #[test]
    fn kernel_responses_decode_back_in_order() {
        let table = vec![
            KernelResponse {
                kernel_id: 90,
                response_data: U256::from(75u64).abi_encode().into(),
                error_message: String::new(),
            },
            KernelResponse {
                kernel_id: 347,
                response_data: "Monday 14:30".to_string().abi_encode().into(),
                error_message: String::new(),
            },
        ];

        let encoded = encode_kernel_responses(&table);
        let decoded = Vec::<KernelResponseWire>::abi_decode(&encoded, true).unwrap();

        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].kernelId, U256::from(90u64));
        assert_eq!(decoded[1].kernelId, U256::from(347u64));
        assert_eq!(decoded[0].result, table[0].response_data);
        assert!(decoded[1].err.is_empty());
    }

    #[test]
    fn params_envelope_holds_json_text() {
        let text = params_text(&serde_json::json!({ "amount": 100 })).unwrap();
        let encoded = encode_params_text(&text);

        let inner = Bytes::abi_decode(&encoded, true).unwrap();
        assert_eq!(inner.as_ref(), text.as_bytes());
    }

    #[test]
    fn empty_params_still_produce_an_envelope() {
        let text = params_text(&serde_json::json!({})).unwrap();
        let encoded = encode_params_text(&text);

        assert!(!encoded.is_empty());
        let inner = Bytes::abi_decode(&encoded, true).unwrap();
        assert_eq!(inner.as_ref(), b"{}");
    }

    #[test]
    fn auth_encodes_as_field_sequence_not_wrapped_tuple() {
        let auth = AuthTuple {
            kernel_response_signature: Bytes::from(vec![0xAA; 65]),
            kernel_param_object_digest: b256!(
                "00000000000000000000000000000000000000000000000000000000000000ff"
            ),
            signature_token: Bytes::from(vec![0xBB; 65]),
            nonce: 1_700_000_000,
            final_opinion: true,
        };

        let encoded = encode_auth(&auth);
        // Head of a five-param sequence: offset to the first dynamic field is
        // 5 words, so the first word is 0xa0, not a 0x20 tuple wrapper.
        assert_eq!(encoded[31], 0xa0);

        let decoded = AuthWire::abi_decode_params(&encoded, true).unwrap();
        assert_eq!(decoded.kernelResponseSignature, auth.kernel_response_signature);
        assert_eq!(decoded.kernelParamObjectDigest, auth.kernel_param_object_digest);
        assert_eq!(decoded.signatureToken, auth.signature_token);
        assert_eq!(decoded.nonce, U256::from(auth.nonce));
        assert!(decoded.finalOpinion);
    }
}
