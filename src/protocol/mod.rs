//! The three transaction phases.
//!
//! The handshake is linear, with no branching or retries: a Data transaction
//! is built from fresh randomness, a Request transaction from the Data
//! payload, and an Answer transaction from the Request payload plus the Data
//! transaction's retained private state. Each phase is a pure function of
//! the previous phase's public payload and the acting party's own secrets.

/// Response phase: the prover's Answer transaction.
pub mod answer;
/// Setup phase: the prover's Data transaction.
pub mod data;
/// Challenge phase: the verifier's Request transaction.
pub mod request;

pub use answer::AnswerTransaction;
pub use data::{CommitmentRound, DataTransaction};
pub use request::{Challenge, RequestTransaction};
