use soroban_sdk::{contractclient, BytesN, Env};

/// External verification oracle. `verify_proof` is a point query keyed by
/// proof content; the engine treats it as idempotent and side-effect-free.
#[contractclient(name = "OracleClient")]
pub trait OracleGateway {
    fn verify_proof(env: Env, proof_hash: BytesN<32>) -> bool;
}

/// External escrow holding pledged funds. `get_balance` reports the amount
/// currently available for a proposal.
#[contractclient(name = "EscrowClient")]
pub trait EscrowGateway {
    fn get_balance(env: Env, proposal_id: u64) -> i128;
}
