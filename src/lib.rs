// KRNL payload builder library entry point

pub mod internal {
    pub mod auth {
        pub mod sign;
    }
    pub mod encode {
        pub mod abi;
    }
    pub mod kernels {
        pub mod table;
    }
    pub mod node {
        pub mod client;
    }
    pub mod builder;
    pub mod profile;
}

// Re-export key types for external use
pub use internal::auth::sign::{
    build_auth, kernel_params_digest, AuthTuple, AuthoritySigner, MonotonicNonce, NonceSource,
    PlaceholderSigner, SignedOpinion,
};
pub use internal::builder::{KrnlPayload, KrnlPayloadBuilder, NodeMode, PayloadError};
pub use internal::encode::abi::{
    encode_auth, encode_kernel_responses, encode_params_text, params_text, EncodeError,
};
pub use internal::kernels::table::{resolve, Action, KernelResponse, ResponseTable};
pub use internal::node::client::{
    DisabledNode, HttpKernelNode, KernelNode, NodeError, ValidationOutput,
};
pub use internal::profile::{load_profile, ProfileError, RegistrationProfile};
