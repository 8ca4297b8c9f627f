use soroban_sdk::{contracttype, Address, BytesN};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    // Singleton engine configuration (instance storage).
    Admin,
    ProposalCount,
    NextDisbursementId,
    MaxDisbursements,
    DisbursementFee,
    EscrowContract,
    OracleContract,
    TrackerContract,
    // Entity records (persistent storage).
    Proposal(u64),
    Milestone(u64, u64),
    Disbursement(u64),
}

/// A funding request with a total pledge, broken into milestones.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Proposal {
    pub total_funds: i128,
    /// Monotonically non-decreasing; grows by one milestone amount per
    /// successful disbursement.
    pub disbursed_funds: i128,
    /// Number of milestones the recipient intends to register. Informational;
    /// never reconciled against the milestones actually added.
    pub milestone_count: u32,
    pub recipient: Address,
    pub status: bool,
    pub timestamp: u64,
    pub penalty_rate: u32,
    pub interest_rate: u32,
    pub grace_period: u32,
}

/// A weighted, independently verifiable unit of work tied to a partial fund
/// amount. Keyed by (proposal id, milestone id).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Milestone {
    pub weight: u32,
    pub amount: i128,
    pub completed: bool,
    pub verified: bool,
    pub timestamp: u64,
    pub proof_hash: BytesN<32>,
}

/// Immutable receipt of one successful fund release.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Disbursement {
    pub proposal_id: u64,
    pub milestone_id: u64,
    pub amount: i128,
    pub recipient: Address,
    pub timestamp: u64,
    pub status: bool,
}
