use soroban_sdk::contracterror;

/// Error codes carried on the wire by every failing operation. The numbering
/// (with gaps) matches the deployed protocol so external observers see
/// identical codes.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum EngineError {
    NotAuthorized = 100,
    InvalidProposalId = 101,
    InvalidMilestoneId = 102,
    InvalidAmount = 103,
    InvalidWeight = 104,
    InvalidRecipient = 105,
    ProposalNotFound = 106,
    MilestoneNotFound = 107,
    MilestoneAlreadyCompleted = 108,
    InsufficientEscrow = 109,
    VerificationFailed = 110,
    InvalidBatchSize = 112,
    EscrowNotSet = 115,
    OracleNotSet = 116,
    MaxDisbursementsExceeded = 119,
    InvalidPenalty = 120,
    InvalidInterest = 121,
    InvalidGracePeriod = 122,
}
