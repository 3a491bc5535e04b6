use crate::internal::profile::RegistrationProfile;
use alloy_primitives::{Bytes, U256};
use alloy_sol_types::SolValue;

/// Privileged actions gated by the ChamaFactory verifier. Unrecognized wire
/// names map to `Other` so new front-end actions still get a valid payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateChama,
    JoinChama,
    Contribute,
    Payout,
    Other,
}

impl Action {
    pub fn from_wire(action: &str) -> Self {
        match action {
            "createChama" => Action::CreateChama,
            "joinChama" => Action::JoinChama,
            "contribute" => Action::Contribute,
            "payout" => Action::Payout,
            _ => Action::Other,
        }
    }

    fn index(self) -> usize {
        match self {
            Action::CreateChama => 0,
            Action::JoinChama => 1,
            Action::Contribute => 2,
            Action::Payout => 3,
            Action::Other => 4,
        }
    }
}

/// One simulated kernel execution result. `response_data` is ABI-encoded per
/// the kernel's own fixed return type; `error_message` is empty on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelResponse {
    pub kernel_id: u64,
    pub response_data: Bytes,
    pub error_message: String,
}

/// Ordered per-action response list; row order follows the profile's
/// `kernel_ids` exactly.
pub type ResponseTable = Vec<KernelResponse>;

/// Simulated values for one kernel, indexed by
/// [create, join, contribute, payout, default]. The value type is fixed per
/// kernel id and never varies across actions.
enum Simulation {
    Score([u64; 5]),
    Flag([bool; 5]),
    Text([&'static str; 5]),
}

const SIMULATIONS: &[(u64, Simulation)] = &[
    // Gitcoin Passport getScore, threshold 50
    (90, Simulation::Score([75, 65, 60, 80, 70])),
    // Gitcoin Passport isHuman
    (91, Simulation::Flag([true, true, true, true, true])),
    // Passport score used by the upgraded deployment
    (337, Simulation::Score([72, 64, 61, 78, 68])),
    // Trusted wallet list
    (340, Simulation::Flag([true, true, true, true, true])),
    // Day and time validation
    (
        347,
        Simulation::Text([
            "Monday 14:30",
            "Tuesday 10:15",
            "Wednesday 16:45",
            "Thursday 09:30",
            "Friday 12:00",
        ]),
    ),
    // Mock KYC score, threshold 60
    (883, Simulation::Score([85, 70, 75, 90, 80])),
];

impl Simulation {
    fn encode(&self, action: Action) -> Bytes {
        let i = action.index();
        match self {
            Simulation::Score(values) => U256::from(values[i]).abi_encode().into(),
            Simulation::Flag(values) => values[i].abi_encode().into(),
            Simulation::Text(values) => values[i].to_string().abi_encode().into(),
        }
    }
}

/// Resolves the simulated response table for an action. Pure and
/// deterministic: the same action always yields the same table, one row per
/// kernel id in the profile's declared order. A kernel id the simulation
/// table does not know yields an empty-data row carrying an error message,
/// keeping the payload structurally complete.
pub fn resolve(action: Action, profile: &RegistrationProfile) -> ResponseTable {
    profile
        .kernel_ids
        .iter()
        .map(|&kernel_id| {
            match SIMULATIONS.iter().find(|(id, _)| *id == kernel_id) {
                Some((_, sim)) => KernelResponse {
                    kernel_id,
                    response_data: sim.encode(action),
                    error_message: String::new(),
                },
                None => KernelResponse {
                    kernel_id,
                    response_data: Bytes::new(),
                    error_message: format!("no simulation for kernel {}", kernel_id),
                },
            }
        })
        .collect()
}
