/// Canonical hex codec for wire big integers.
pub mod codec;
/// Safe-prime group generation and validation.
pub mod group;
/// DH key-pair generation and shared-secret agreement.
pub mod keypair;
/// Cryptographically secure random number generation.
pub mod rng;

pub use group::GroupParams;
pub use keypair::DhKeyPair;
pub use rng::SecureRng;
