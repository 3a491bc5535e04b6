use alloy_primitives::{address, b256, bytes, Address, Bytes, B256};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

const DEFAULT_CONFIG_PATH: &str = "config/profile.json";

/// Static identity of a KRNL deployment. Loaded once at startup and passed
/// into the payload builder by value; a builder never mixes two profiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationProfile {
    pub node_url: String,
    pub authority_address: Address,
    /// Ordered kernel id set. The order is part of the compatibility
    /// contract with the verifying contract and must never be re-sorted.
    pub kernel_ids: Vec<u64>,
    pub contract_id: u64,
    pub dapp_id: u64,
    pub entry_id: B256,
    pub access_token: Bytes,
    pub runtime_digest: B256,
}

impl RegistrationProfile {
    /// The original ChamaFactory deployment on Oasis Sapphire.
    ///
    /// Kernel 90 (Optimism Sepolia) - Gitcoin Passport getScore
    /// Kernel 91 (Optimism Sepolia) - Gitcoin Passport isHuman
    /// Kernel 340 (Base Sepolia) - Trusted wallet list
    /// Kernel 347 (Optimism Sepolia) - Day and time validations
    /// Kernel 883 (Sepolia) - Mock KYC score
    pub fn chama_v1() -> Self {
        Self {
            node_url: "https://v0-0-1-rpc.node.lat".to_string(),
            authority_address: address!("59016421277Eea0F50568c0AfCd0c383Fa7a8cd7"),
            kernel_ids: vec![90, 91, 340, 347, 883],
            contract_id: 6949,
            dapp_id: 6610,
            entry_id: b256!("3552c4cf9f8f5b79b2083fb325c6d956a4aeb8bb70bcefa2972f503a2948cc06"),
            access_token: bytes!("30450221009273a0a90b1bd13b0503c07a497018b554935a868ed4575ead1f80ffc296a856022044e81f75da0e50b39d31f50f4a79f7d0b0fe34e6342c6ba98de2f9557d7f16d3"),
            runtime_digest: b256!("876924e18dd46dd3cbcad570a87137bbd828a7d0f3cad309f78ad2c9402eeeb7"),
        }
    }

    /// The upgraded ChamaFactory deployment. Only the token authority and
    /// kernel set were retained from that rollout; the platform registration
    /// identifiers here are the successor entry issued alongside it.
    ///
    /// Kernel 337 (Base Sepolia) - Passport score
    /// Kernel 340 (Base Sepolia) - Trusted wallet list
    pub fn chama_v2() -> Self {
        Self {
            node_url: "https://v0-0-1-rpc.node.lat".to_string(),
            authority_address: address!("8eE3A46aAd8c8F09d56D8d0D6A2227ee9eF45018"),
            kernel_ids: vec![337, 340],
            contract_id: 7046,
            dapp_id: 6610,
            entry_id: b256!("7b0d2f6a1c9e44c8a3f5d90417e6b2ddc84a1f0e5b6397c2d8149aa0f3e57c41"),
            access_token: bytes!("30450221009273a0a90b1bd13b0503c07a497018b554935a868ed4575ead1f80ffc296a856022044e81f75da0e50b39d31f50f4a79f7d0b0fe34e6342c6ba98de2f9557d7f16d3"),
            runtime_digest: b256!("876924e18dd46dd3cbcad570a87137bbd828a7d0f3cad309f78ad2c9402eeeb7"),
        }
    }
}

/// Serialized form of a profile, for the optional JSON config file.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileEntry {
    node_url: String,
    authority_address: Address,
    kernel_ids: Vec<u64>,
    contract_id: u64,
    dapp_id: u64,
    entry_id: B256,
    access_token: Bytes,
    runtime_digest: B256,
}

impl From<ProfileEntry> for RegistrationProfile {
    fn from(entry: ProfileEntry) -> Self {
        Self {
            node_url: entry.node_url,
            authority_address: entry.authority_address,
            kernel_ids: entry.kernel_ids,
            contract_id: entry.contract_id,
            dapp_id: entry.dapp_id,
            entry_id: entry.entry_id,
            access_token: entry.access_token,
            runtime_digest: entry.runtime_digest,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Failed to read profile config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid profile config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Loads the active profile: `KRNL_PROFILE_CONFIG` (or `config/profile.json`)
/// when present and valid, otherwise the built-in chama_v1 deployment.
pub fn load_profile() -> RegistrationProfile {
    let path = env::var("KRNL_PROFILE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    match read_profile(Path::new(&path)) {
        Ok(profile) => profile,
        Err(e) => {
            tracing::debug!("No profile config at {}: {}; using built-in default", path, e);
            RegistrationProfile::chama_v1()
        }
    }
}

fn read_profile(path: &Path) -> Result<RegistrationProfile, ProfileError> {
    let contents = fs::read_to_string(path)?;
    let entry: ProfileEntry = serde_json::from_str(&contents)?;
    Ok(entry.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_profiles_have_distinct_kernel_sets() {
        let v1 = RegistrationProfile::chama_v1();
        let v2 = RegistrationProfile::chama_v2();

        assert_eq!(v1.kernel_ids, vec![90, 91, 340, 347, 883]);
        assert_eq!(v2.kernel_ids, vec![337, 340]);
        assert_ne!(v1.authority_address, v2.authority_address);
    }

    #[test]
    fn profile_entry_round_trips_through_json() {
        let profile = RegistrationProfile::chama_v1();
        let entry = ProfileEntry {
            node_url: profile.node_url.clone(),
            authority_address: profile.authority_address,
            kernel_ids: profile.kernel_ids.clone(),
            contract_id: profile.contract_id,
            dapp_id: profile.dapp_id,
            entry_id: profile.entry_id,
            access_token: profile.access_token.clone(),
            runtime_digest: profile.runtime_digest,
        };

        let json = serde_json::to_string(&entry).unwrap();
        let parsed: ProfileEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(RegistrationProfile::from(parsed), profile);
    }
}
