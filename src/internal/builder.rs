use crate::internal::auth::sign::{
    build_auth, AuthoritySigner, MonotonicNonce, NonceSource, PlaceholderSigner,
};
use crate::internal::encode::abi::{
    encode_auth, encode_kernel_responses, encode_params_text, params_text, EncodeError,
};
use crate::internal::kernels::table::{resolve, Action};
use crate::internal::node::client::{DisabledNode, KernelNode, NodeError};
use crate::internal::profile::RegistrationProfile;
use alloy_primitives::{Address, Bytes};
use serde::Serialize;

/// Whether payload construction first attempts the remote kernel node. The
/// shipped configuration is `Fallback`; `Live` is the intended evolution once
/// the node is reachable from deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeMode {
    Live,
    Fallback,
}

/// The three-field authorization object handed to the factory contract
/// alongside a privileged call. Built fresh per call; the nonce and digest
/// are call-specific, so a payload is never cached or reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KrnlPayload {
    pub auth: Bytes,
    pub kernel_responses: Bytes,
    pub kernel_params: Bytes,
}

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Builds KrnlPayloads for one deployment profile. Stateless across calls
/// apart from the immutable profile and the nonce counter; concurrent calls
/// share nothing else.
pub struct KrnlPayloadBuilder<N: KernelNode = DisabledNode> {
    profile: RegistrationProfile,
    mode: NodeMode,
    node: N,
    signer: Box<dyn AuthoritySigner>,
    nonces: Box<dyn NonceSource>,
}

impl KrnlPayloadBuilder<DisabledNode> {
    /// Local-only builder: every call resolves through the fallback path.
    pub fn new(profile: RegistrationProfile) -> Self {
        Self::with_node(profile, NodeMode::Fallback, DisabledNode)
    }
}

impl<N: KernelNode> KrnlPayloadBuilder<N> {
    pub fn with_node(profile: RegistrationProfile, mode: NodeMode, node: N) -> Self {
        Self {
            profile,
            mode,
            node,
            signer: Box::new(PlaceholderSigner),
            nonces: Box::new(MonotonicNonce::new()),
        }
    }

    pub fn with_signer(mut self, signer: Box<dyn AuthoritySigner>) -> Self {
        self.signer = signer;
        self
    }

    pub fn with_nonce_source(mut self, nonces: Box<dyn NonceSource>) -> Self {
        self.nonces = nonces;
        self
    }

    pub fn profile(&self) -> &RegistrationProfile {
        &self.profile
    }

    /// Builds the authorization payload for one privileged call. The only
    /// caller-visible failure is non-serializable `params`; node trouble is
    /// logged and recovered locally, and an unrecognized `action` resolves to
    /// the default response table.
    pub async fn build_payload<T: Serialize>(
        &self,
        action: &str,
        params: &T,
        user: Address,
    ) -> Result<KrnlPayload, PayloadError> {
        tracing::info!(action, %user, "Building KRNL payload");
        let text = params_text(params)?;

        if self.mode == NodeMode::Live {
            match self.build_live(action, &text, user).await {
                Ok(payload) => return Ok(payload),
                Err(e) => {
                    tracing::warn!(action, error = %e, "Kernel node path failed, using local simulation");
                }
            }
        }

        Ok(self.build_local(action, &text, user))
    }

    /// Live path: register, validate, sign, in order. Any failed step aborts
    /// the whole attempt; no partial reuse of earlier steps' results.
    async fn build_live(
        &self,
        action: &str,
        params_text: &str,
        user: Address,
    ) -> Result<KrnlPayload, NodeError> {
        self.node.register(&self.profile).await?;
        let validation = self
            .node
            .validate(&self.profile, action, params_text, user)
            .await?;
        let auth = self
            .node
            .sign(&self.profile, user, params_text, &validation)
            .await?;

        Ok(KrnlPayload {
            auth,
            kernel_responses: validation.kernel_responses,
            kernel_params: validation.kernel_params,
        })
    }

    /// Fallback path: simulated response table, local encoding, placeholder
    /// authority signature.
    fn build_local(&self, action: &str, params_text: &str, user: Address) -> KrnlPayload {
        let table = resolve(Action::from_wire(action), &self.profile);
        let kernel_responses = encode_kernel_responses(&table);
        let kernel_params = encode_params_text(params_text);

        let auth = build_auth(
            &kernel_params,
            &kernel_responses,
            user,
            self.signer.as_ref(),
            self.nonces.as_ref(),
        );

        KrnlPayload {
            auth: encode_auth(&auth),
            kernel_responses,
            kernel_params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[tokio::test]
    async fn fallback_builder_returns_all_three_fields() {
        let builder = KrnlPayloadBuilder::new(RegistrationProfile::chama_v1());
        let user = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

        let payload = builder
            .build_payload("createChama", &serde_json::json!({ "name": "savings" }), user)
            .await
            .unwrap();

        assert!(!payload.auth.is_empty());
        assert!(!payload.kernel_responses.is_empty());
        assert!(!payload.kernel_params.is_empty());
    }

    #[tokio::test]
    async fn live_mode_with_disabled_node_still_yields_payload() {
        let builder = KrnlPayloadBuilder::with_node(
            RegistrationProfile::chama_v1(),
            NodeMode::Live,
            DisabledNode,
        );
        let user = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

        let payload = builder
            .build_payload("contribute", &serde_json::json!({ "amount": 100 }), user)
            .await
            .unwrap();

        assert!(!payload.auth.is_empty());
    }
}
