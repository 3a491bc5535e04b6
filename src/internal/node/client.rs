//! Client for the remote KRNL node. This is the live-path strategy behind
//! [`KernelNode`]; the shipped configuration never reaches it (see
//! `builder::NodeMode`), but the three round trips are kept wired so
//! re-enabling real kernel validation is a flag change, not a rewrite.

use crate::internal::profile::RegistrationProfile;
use alloy_primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tokio::time::{timeout, Duration};

const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("Kernel node is disabled in this configuration")]
    Disabled,
    #[error("Kernel node communication error: {0}")]
    Communication(String),
    #[error("Kernel node responded with status {0}")]
    Status(u16),
    #[error("Kernel node step timed out after {0:?}")]
    Timeout(Duration),
}

/// Validation result returned by the node: both fields are already
/// ABI-encoded in the verifier's schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutput {
    pub kernel_responses: Bytes,
    pub kernel_params: Bytes,
}

/// The live-path strategy: register the deployment, request kernel
/// validation, request an authority signature. Each step depends on the
/// previous one and is awaited sequentially; callers treat any error as a
/// signal to fall back, never as a partial result.
pub trait KernelNode: Send + Sync {
    fn register(
        &self,
        profile: &RegistrationProfile,
    ) -> impl Future<Output = Result<(), NodeError>> + Send;

    fn validate(
        &self,
        profile: &RegistrationProfile,
        action: &str,
        params_text: &str,
        user: Address,
    ) -> impl Future<Output = Result<ValidationOutput, NodeError>> + Send;

    fn sign(
        &self,
        profile: &RegistrationProfile,
        user: Address,
        params_text: &str,
        validation: &ValidationOutput,
    ) -> impl Future<Output = Result<Bytes, NodeError>> + Send;
}

/// Stand-in node for the fallback-only configuration: every step reports
/// itself disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNode;

impl KernelNode for DisabledNode {
    async fn register(&self, _profile: &RegistrationProfile) -> Result<(), NodeError> {
        Err(NodeError::Disabled)
    }

    async fn validate(
        &self,
        _profile: &RegistrationProfile,
        _action: &str,
        _params_text: &str,
        _user: Address,
    ) -> Result<ValidationOutput, NodeError> {
        Err(NodeError::Disabled)
    }

    async fn sign(
        &self,
        _profile: &RegistrationProfile,
        _user: Address,
        _params_text: &str,
        _validation: &ValidationOutput,
    ) -> Result<Bytes, NodeError> {
        Err(NodeError::Disabled)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    entry_id: &'a B256,
    token_authority: &'a Address,
    runtime_digest: &'a B256,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateRequest<'a> {
    entry_id: &'a B256,
    action: &'a str,
    params: &'a str,
    user_address: Address,
    token_authority: &'a Address,
    kernel_ids: &'a [u64],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignRequest<'a> {
    entry_id: &'a B256,
    token_authority: &'a Address,
    user_address: Address,
    function_params: &'a str,
    kernel_responses: &'a Bytes,
    kernel_params: &'a Bytes,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    auth: Bytes,
}

/// HTTP implementation of [`KernelNode`] against the node's JSON API.
#[derive(Debug, Clone)]
pub struct HttpKernelNode {
    client: reqwest::Client,
    step_timeout: Duration,
}

impl HttpKernelNode {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_STEP_TIMEOUT)
    }

    pub fn with_timeout(step_timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            step_timeout,
        }
    }

    async fn post_json<B: Serialize>(
        &self,
        base_url: &str,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, NodeError> {
        let url = format!("{}/api/{}", base_url.trim_end_matches('/'), path);
        let response = timeout(self.step_timeout, self.client.post(url).json(body).send())
            .await
            .map_err(|_| NodeError::Timeout(self.step_timeout))?
            .map_err(|e| NodeError::Communication(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NodeError::Status(response.status().as_u16()));
        }
        Ok(response)
    }
}

impl Default for HttpKernelNode {
    fn default() -> Self {
        Self::new()
    }
}

impl KernelNode for HttpKernelNode {
    async fn register(&self, profile: &RegistrationProfile) -> Result<(), NodeError> {
        let body = RegisterRequest {
            entry_id: &profile.entry_id,
            token_authority: &profile.authority_address,
            runtime_digest: &profile.runtime_digest,
        };
        self.post_json(&profile.node_url, "register", &body).await?;
        tracing::debug!(entry_id = %profile.entry_id, "Registered dApp with kernel node");
        Ok(())
    }

    async fn validate(
        &self,
        profile: &RegistrationProfile,
        action: &str,
        params_text: &str,
        user: Address,
    ) -> Result<ValidationOutput, NodeError> {
        let body = ValidateRequest {
            entry_id: &profile.entry_id,
            action,
            params: params_text,
            user_address: user,
            token_authority: &profile.authority_address,
            kernel_ids: &profile.kernel_ids,
        };
        let response = self.post_json(&profile.node_url, "validate", &body).await?;
        response
            .json()
            .await
            .map_err(|e| NodeError::Communication(e.to_string()))
    }

    async fn sign(
        &self,
        profile: &RegistrationProfile,
        user: Address,
        params_text: &str,
        validation: &ValidationOutput,
    ) -> Result<Bytes, NodeError> {
        let body = SignRequest {
            entry_id: &profile.entry_id,
            token_authority: &profile.authority_address,
            user_address: user,
            function_params: params_text,
            kernel_responses: &validation.kernel_responses,
            kernel_params: &validation.kernel_params,
        };
        let response = self.post_json(&profile.node_url, "sign", &body).await?;
        let signed: SignResponse = response
            .json()
            .await
            .map_err(|e| NodeError::Communication(e.to_string()))?;
        Ok(signed.auth)
    }
}
