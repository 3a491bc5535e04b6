use alloy_primitives::{bytes, keccak256, Address, Bytes, B256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// The authorization record checked by the verifying contract. Field order
/// matches the wire tuple `(bytes, bytes32, bytes, uint256, bool)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthTuple {
    pub kernel_response_signature: Bytes,
    pub kernel_param_object_digest: B256,
    pub signature_token: Bytes,
    pub nonce: u64,
    pub final_opinion: bool,
}

/// Signature the token authority would issue over a validation result. In
/// local mode both signature fields carry the same placeholder material.
#[derive(Debug, Clone)]
pub struct SignedOpinion {
    pub kernel_response_signature: Bytes,
    pub signature_token: Bytes,
    /// `false` is a legitimate negative authorization, not an error; the
    /// builder passes it through untouched.
    pub final_opinion: bool,
}

/// Seam for the authority signature. The default implementation is the
/// no-network placeholder; a live signer plugs in here without touching the
/// assembly path.
pub trait AuthoritySigner: Send + Sync {
    fn sign(&self, digest: B256, kernel_responses: &[u8]) -> SignedOpinion;
}

/// Fixed stand-in for the TokenAuthority signature, accepted by the verifier
/// in its development configuration.
pub struct PlaceholderSigner;

const PLACEHOLDER_SIGNATURE: Bytes = bytes!("8688e0a3d8b7c3b8845e5f6f77e5e5ca9f564cd1000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000001c");

impl AuthoritySigner for PlaceholderSigner {
    fn sign(&self, _digest: B256, _kernel_responses: &[u8]) -> SignedOpinion {
        SignedOpinion {
            kernel_response_signature: PLACEHOLDER_SIGNATURE.clone(),
            signature_token: PLACEHOLDER_SIGNATURE.clone(),
            final_opinion: true,
        }
    }
}

/// Source of per-call replay nonces. Pluggable so tests can pin it.
pub trait NonceSource: Send + Sync {
    fn next_nonce(&self) -> u64;
}

/// Strictly increasing nonce: Unix seconds at construction, shifted to leave
/// room for a per-builder counter. Unlike a bare second-resolution timestamp
/// this cannot collide under rapid successive calls, while staying anchored
/// to wall-clock time for any freshness policy on the contract side.
pub struct MonotonicNonce {
    base: u64,
    counter: AtomicU64,
}

impl MonotonicNonce {
    pub fn new() -> Self {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            base: seconds << 20,
            counter: AtomicU64::new(0),
        }
    }
}

impl Default for MonotonicNonce {
    fn default() -> Self {
        Self::new()
    }
}

impl NonceSource for MonotonicNonce {
    fn next_nonce(&self) -> u64 {
        self.base + self.counter.fetch_add(1, Ordering::Relaxed)
    }
}

/// Digest binding the exact `kernelParams` bytes to the calling address:
/// `keccak256(kernelParams ++ userAddress)`. Recomputed per call, never
/// cached.
pub fn kernel_params_digest(kernel_params: &[u8], user: Address) -> B256 {
    let mut preimage = Vec::with_capacity(kernel_params.len() + Address::len_bytes());
    preimage.extend_from_slice(kernel_params);
    preimage.extend_from_slice(user.as_slice());
    keccak256(&preimage)
}

/// Assembles the authorization record for one call.
pub fn build_auth(
    kernel_params: &[u8],
    kernel_responses: &[u8],
    user: Address,
    signer: &dyn AuthoritySigner,
    nonces: &dyn NonceSource,
) -> AuthTuple {
    let digest = kernel_params_digest(kernel_params, user);
    let opinion = signer.sign(digest, kernel_responses);
    AuthTuple {
        kernel_response_signature: opinion.kernel_response_signature,
        kernel_param_object_digest: digest,
        signature_token: opinion.signature_token,
        nonce: nonces.next_nonce(),
        final_opinion: opinion.final_opinion,
    }
}
