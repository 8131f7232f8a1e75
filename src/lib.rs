//! Three-phase zero-knowledge identity handshake over Diffie-Hellman
//! safe-prime groups.
//!
//! A *prover* publishes a Data transaction binding a hashed identity to a
//! blinded secret, a *verifier* answers with a Request transaction carrying a
//! K-bit challenge, and the prover closes the exchange with an Answer
//! transaction that, per round, either opens a commitment or reveals a masked
//! combination of its secret material. Knowledge of the identity digest is
//! demonstrated without ever sending the blinding exponent in the clear.
//!
//! The arithmetic that ties the phases together is deliberately *unreduced*:
//! the blinded secret is `g^r + H` over plain integers, and the challenge
//! phase relies on the digest terms cancelling exactly. All of it therefore
//! runs on arbitrary-precision integers, never reduced modulo the group
//! modulus.
//!
//! # Example
//!
//! ```rust
//! use zk_identity::{DataTransaction, RequestTransaction, SecureRng};
//!
//! let mut rng = SecureRng::new();
//!
//! // Prover: fresh 64-bit group (test size), 4 rounds, identity digest "1a2b".
//! let data = DataTransaction::build(64, 4, "1a2b", "txn-1", &mut rng).unwrap();
//!
//! // Verifier: consume the public payload, issue the challenge.
//! let request = RequestTransaction::build(&data.payload(), "1a2b", "txn-1", &mut rng).unwrap();
//!
//! // Prover: per round, open the commitment or reveal the masked sum.
//! let answer = data.answer(&request.payload()).unwrap();
//! assert_eq!(answer.responses().len(), 4);
//! ```

/// Cryptographic primitives: hex codec, safe-prime groups, DH key pairs.
pub mod crypto;
/// Error types for the handshake.
pub mod error;
/// The three transaction phases: Data, Request, Answer.
pub mod protocol;
/// Request/reply server over TCP.
pub mod server;
/// Asymmetric transport-key capability (PEM key pairs, OAEP encryption).
pub mod transport_key;
/// Transport-boundary message types and field extraction.
pub mod wire;

pub use crypto::codec;
pub use crypto::group::GroupParams;
pub use crypto::keypair::DhKeyPair;
pub use crypto::rng::SecureRng;
pub use error::Error;
pub use protocol::{AnswerTransaction, Challenge, CommitmentRound, DataTransaction, RequestTransaction};

/// Convenience alias for results produced by this crate.
pub type Result<T> = core::result::Result<T, Error>;
