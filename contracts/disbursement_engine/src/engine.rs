use soroban_sdk::{
    contract, contractimpl, panic_with_error, symbol_short, Address, BytesN, Env, Vec,
};

use crate::errors::EngineError;
use crate::gateways::{EscrowClient, OracleClient};
use crate::types::{DataKey, Disbursement, Milestone, Proposal};

const DEFAULT_MAX_DISBURSEMENTS: u64 = 5000;
const DEFAULT_DISBURSEMENT_FEE: i128 = 500;

const MAX_PENALTY_RATE: u32 = 50;
const MAX_INTEREST_RATE: u32 = 15;
const MAX_GRACE_PERIOD: u32 = 60;
const MAX_WEIGHT: u32 = 100;
const MAX_BATCH_SIZE: u32 = 10;

#[contract]
pub struct DisbursementEngine;

#[contractimpl]
impl DisbursementEngine {
    /// The deploying transaction fixes the admin principal for the lifetime
    /// of the instance.
    pub fn __constructor(env: Env, admin: Address) {
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::ProposalCount, &0u64);
        env.storage().instance().set(&DataKey::NextDisbursementId, &0u64);
        env.storage()
            .instance()
            .set(&DataKey::MaxDisbursements, &DEFAULT_MAX_DISBURSEMENTS);
        env.storage()
            .instance()
            .set(&DataKey::DisbursementFee, &DEFAULT_DISBURSEMENT_FEE);
    }

    pub fn set_escrow_contract(env: Env, caller: Address, contract: Address) -> bool {
        Self::require_admin(&env, &caller);
        env.storage().instance().set(&DataKey::EscrowContract, &contract);
        true
    }

    pub fn set_oracle_contract(env: Env, caller: Address, contract: Address) -> bool {
        Self::require_admin(&env, &caller);
        env.storage().instance().set(&DataKey::OracleContract, &contract);
        true
    }

    pub fn set_tracker_contract(env: Env, caller: Address, contract: Address) -> bool {
        Self::require_admin(&env, &caller);
        env.storage().instance().set(&DataKey::TrackerContract, &contract);
        true
    }

    pub fn set_max_disbursements(env: Env, caller: Address, new_max: u64) -> bool {
        Self::require_admin(&env, &caller);
        if new_max == 0 {
            panic_with_error!(&env, EngineError::InvalidAmount);
        }
        env.storage().instance().set(&DataKey::MaxDisbursements, &new_max);
        true
    }

    pub fn set_disbursement_fee(env: Env, caller: Address, new_fee: i128) -> bool {
        Self::require_admin(&env, &caller);
        if new_fee < 0 {
            panic_with_error!(&env, EngineError::InvalidAmount);
        }
        env.storage().instance().set(&DataKey::DisbursementFee, &new_fee);
        true
    }

    /// Register a funding proposal on behalf of `recipient`. Returns the new
    /// proposal id; ids are issued sequentially starting at 1.
    pub fn register_proposal(
        env: Env,
        caller: Address,
        total_funds: i128,
        milestone_count: u32,
        recipient: Address,
        penalty_rate: u32,
        interest_rate: u32,
        grace_period: u32,
    ) -> u64 {
        caller.require_auth();

        let count: u64 = env.storage().instance().get(&DataKey::ProposalCount).unwrap();
        let next_id = count + 1;
        let max: u64 = env.storage().instance().get(&DataKey::MaxDisbursements).unwrap();
        if next_id >= max {
            panic_with_error!(&env, EngineError::MaxDisbursementsExceeded);
        }
        if total_funds <= 0 {
            panic_with_error!(&env, EngineError::InvalidAmount);
        }
        if recipient == caller {
            panic_with_error!(&env, EngineError::InvalidRecipient);
        }
        if penalty_rate > MAX_PENALTY_RATE {
            panic_with_error!(&env, EngineError::InvalidPenalty);
        }
        if interest_rate > MAX_INTEREST_RATE {
            panic_with_error!(&env, EngineError::InvalidInterest);
        }
        if grace_period > MAX_GRACE_PERIOD {
            panic_with_error!(&env, EngineError::InvalidGracePeriod);
        }

        let proposal = Proposal {
            total_funds,
            disbursed_funds: 0,
            milestone_count,
            recipient: recipient.clone(),
            status: true,
            timestamp: env.ledger().timestamp(),
            penalty_rate,
            interest_rate,
            grace_period,
        };
        env.storage().persistent().set(&DataKey::Proposal(next_id), &proposal);
        env.storage().instance().set(&DataKey::ProposalCount, &next_id);

        env.events().publish(
            (symbol_short!("propose"), next_id),
            (recipient, total_funds),
        );

        next_id
    }

    /// Attach a milestone to a proposal. Only the proposal's recorded
    /// recipient may do this; the authorization check takes priority over
    /// id-format validation.
    pub fn add_milestone(
        env: Env,
        caller: Address,
        proposal_id: u64,
        milestone_id: u64,
        weight: u32,
        amount: i128,
        proof_hash: BytesN<32>,
    ) -> bool {
        caller.require_auth();

        let proposal: Proposal =
            match env.storage().persistent().get(&DataKey::Proposal(proposal_id)) {
                Some(p) => p,
                None => panic_with_error!(&env, EngineError::ProposalNotFound),
            };
        if caller != proposal.recipient {
            panic_with_error!(&env, EngineError::NotAuthorized);
        }
        if proposal_id == 0 {
            panic_with_error!(&env, EngineError::InvalidProposalId);
        }
        if milestone_id == 0 {
            panic_with_error!(&env, EngineError::InvalidMilestoneId);
        }
        if weight == 0 || weight > MAX_WEIGHT {
            panic_with_error!(&env, EngineError::InvalidWeight);
        }
        if amount <= 0 {
            panic_with_error!(&env, EngineError::InvalidAmount);
        }

        let key = DataKey::Milestone(proposal_id, milestone_id);
        if env.storage().persistent().has(&key) {
            // Duplicate registration reports the completed-milestone code,
            // matching the deployed protocol.
            panic_with_error!(&env, EngineError::MilestoneAlreadyCompleted);
        }

        let milestone = Milestone {
            weight,
            amount,
            completed: false,
            verified: false,
            timestamp: env.ledger().timestamp(),
            proof_hash,
        };
        env.storage().persistent().set(&key, &milestone);

        env.events().publish(
            (symbol_short!("mileston"), proposal_id, milestone_id),
            (weight, amount),
        );

        true
    }

    /// Ask the configured oracle whether the milestone's stored proof is
    /// valid, and mark the milestone verified if so. A fully-completed
    /// milestone short-circuits before the oracle is consulted.
    pub fn verify_milestone(env: Env, proposal_id: u64, milestone_id: u64) -> bool {
        if !env.storage().persistent().has(&DataKey::Proposal(proposal_id)) {
            panic_with_error!(&env, EngineError::ProposalNotFound);
        }
        let key = DataKey::Milestone(proposal_id, milestone_id);
        let mut milestone: Milestone = match env.storage().persistent().get(&key) {
            Some(m) => m,
            None => panic_with_error!(&env, EngineError::MilestoneNotFound),
        };
        if milestone.completed {
            panic_with_error!(&env, EngineError::MilestoneAlreadyCompleted);
        }
        let oracle: Address = match env.storage().instance().get(&DataKey::OracleContract) {
            Some(a) => a,
            None => panic_with_error!(&env, EngineError::OracleNotSet),
        };

        if !OracleClient::new(&env, &oracle).verify_proof(&milestone.proof_hash) {
            panic_with_error!(&env, EngineError::VerificationFailed);
        }

        milestone.verified = true;
        milestone.timestamp = env.ledger().timestamp();
        env.storage().persistent().set(&key, &milestone);

        env.events()
            .publish((symbol_short!("verify"), proposal_id, milestone_id), ());

        true
    }

    /// Release one verified milestone's funds. Returns the disbursement id;
    /// ids are consumed sequentially starting at 0 and never reused.
    pub fn disburse_funds(env: Env, caller: Address, proposal_id: u64, milestone_id: u64) -> u64 {
        caller.require_auth();
        Self::disburse_one(&env, &caller, proposal_id, milestone_id)
    }

    /// Disburse up to ten milestones of one proposal, in the given order.
    /// The first failing milestone aborts the batch with its error; there is
    /// no compensating rollback of milestones already processed.
    pub fn batch_disburse(
        env: Env,
        caller: Address,
        proposal_id: u64,
        milestone_ids: Vec<u64>,
    ) -> u32 {
        caller.require_auth();

        let size = milestone_ids.len();
        if size == 0 || size > MAX_BATCH_SIZE {
            panic_with_error!(&env, EngineError::InvalidBatchSize);
        }

        let mut count = 0u32;
        for milestone_id in milestone_ids.iter() {
            Self::disburse_one(&env, &caller, proposal_id, milestone_id);
            count += 1;
        }
        count
    }

    pub fn get_proposal(env: Env, proposal_id: u64) -> Option<Proposal> {
        env.storage().persistent().get(&DataKey::Proposal(proposal_id))
    }

    pub fn get_milestone(env: Env, proposal_id: u64, milestone_id: u64) -> Option<Milestone> {
        env.storage()
            .persistent()
            .get(&DataKey::Milestone(proposal_id, milestone_id))
    }

    pub fn get_disbursement(env: Env, disbursement_id: u64) -> Option<Disbursement> {
        env.storage()
            .persistent()
            .get(&DataKey::Disbursement(disbursement_id))
    }

    pub fn get_admin(env: Env) -> Address {
        env.storage().instance().get(&DataKey::Admin).unwrap()
    }

    pub fn get_proposal_count(env: Env) -> u64 {
        env.storage().instance().get(&DataKey::ProposalCount).unwrap()
    }

    pub fn get_next_disbursement_id(env: Env) -> u64 {
        env.storage().instance().get(&DataKey::NextDisbursementId).unwrap()
    }

    pub fn get_max_disbursements(env: Env) -> u64 {
        env.storage().instance().get(&DataKey::MaxDisbursements).unwrap()
    }

    pub fn get_disbursement_fee(env: Env) -> i128 {
        env.storage().instance().get(&DataKey::DisbursementFee).unwrap()
    }

    pub fn get_escrow_contract(env: Env) -> Option<Address> {
        env.storage().instance().get(&DataKey::EscrowContract)
    }

    pub fn get_oracle_contract(env: Env) -> Option<Address> {
        env.storage().instance().get(&DataKey::OracleContract)
    }

    pub fn get_tracker_contract(env: Env) -> Option<Address> {
        env.storage().instance().get(&DataKey::TrackerContract)
    }

    fn require_admin(env: &Env, caller: &Address) {
        caller.require_auth();
        let admin: Address = env.storage().instance().get(&DataKey::Admin).unwrap();
        if caller != &admin {
            panic_with_error!(env, EngineError::NotAuthorized);
        }
    }

    fn disburse_one(env: &Env, caller: &Address, proposal_id: u64, milestone_id: u64) -> u64 {
        let mut proposal: Proposal =
            match env.storage().persistent().get(&DataKey::Proposal(proposal_id)) {
                Some(p) => p,
                None => panic_with_error!(env, EngineError::ProposalNotFound),
            };
        let key = DataKey::Milestone(proposal_id, milestone_id);
        let mut milestone: Milestone = match env.storage().persistent().get(&key) {
            Some(m) => m,
            None => panic_with_error!(env, EngineError::MilestoneNotFound),
        };
        if !milestone.verified {
            panic_with_error!(env, EngineError::VerificationFailed);
        }
        if milestone.completed {
            panic_with_error!(env, EngineError::MilestoneAlreadyCompleted);
        }
        let escrow: Address = match env.storage().instance().get(&DataKey::EscrowContract) {
            Some(a) => a,
            None => panic_with_error!(env, EngineError::EscrowNotSet),
        };

        let balance = EscrowClient::new(env, &escrow).get_balance(&proposal_id);
        if balance < milestone.amount {
            panic_with_error!(env, EngineError::InsufficientEscrow);
        }

        let disbursement_id: u64 =
            env.storage().instance().get(&DataKey::NextDisbursementId).unwrap();
        let amount = milestone.amount;
        let fee: i128 = env.storage().instance().get(&DataKey::DisbursementFee).unwrap();
        let admin: Address = env.storage().instance().get(&DataKey::Admin).unwrap();

        // Record the fee transfer for the downstream accounting sink; the
        // engine does not confirm settlement.
        env.events()
            .publish((symbol_short!("fee"),), (fee, caller.clone(), admin));

        milestone.completed = true;
        milestone.timestamp = env.ledger().timestamp();
        env.storage().persistent().set(&key, &milestone);

        // disbursed_funds is not capped against total_funds; only the escrow
        // balance bounds a single release.
        proposal.disbursed_funds += amount;
        env.storage().persistent().set(&DataKey::Proposal(proposal_id), &proposal);

        let disbursement = Disbursement {
            proposal_id,
            milestone_id,
            amount,
            recipient: proposal.recipient.clone(),
            timestamp: env.ledger().timestamp(),
            status: true,
        };
        env.storage()
            .persistent()
            .set(&DataKey::Disbursement(disbursement_id), &disbursement);
        env.storage()
            .instance()
            .set(&DataKey::NextDisbursementId, &(disbursement_id + 1));

        env.events().publish(
            (symbol_short!("disburse"), proposal_id, milestone_id),
            (disbursement_id, amount, proposal.recipient),
        );

        disbursement_id
    }
}
