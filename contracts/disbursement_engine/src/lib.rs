#![no_std]

mod engine;
mod errors;
mod gateways;
mod types;


pub use engine::{DisbursementEngine, DisbursementEngineClient};
pub use errors::EngineError;
pub use gateways::{EscrowClient, EscrowGateway, OracleClient, OracleGateway};
pub use types::{DataKey, Disbursement, Milestone, Proposal};
