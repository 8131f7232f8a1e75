//! DH key-pair generation and shared-secret agreement.

use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand::{CryptoRng, RngCore};

/// A Diffie-Hellman key pair within a group.
///
/// Each protocol role (primary, blinding, every commitment round, the
/// verifier's ephemeral) gets its own independently generated pair; reusing
/// one across roles is a protocol violation.
#[derive(Clone, Debug)]
pub struct DhKeyPair {
    private: BigUint,
    public: BigUint,
}

impl DhKeyPair {
    /// The private exponent `x`. Never serialized by the key pair itself;
    /// the payload layer decides which exponents leave the process.
    pub fn private(&self) -> &BigUint {
        &self.private
    }

    /// The public value `g^x mod p`.
    pub fn public(&self) -> &BigUint {
        &self.public
    }
}

/// Generates a fresh key pair in the group `(modulus, generator)`.
///
/// The private exponent is drawn uniformly across the full width of the
/// modulus, not reduced into the order-`q` subgroup; the agreement only ever
/// exponentiates with it, so the wider domain is sound and matches the
/// encoding-width contract of the underlying DH primitive.
pub fn generate<R>(modulus: &BigUint, generator: &BigUint, rng: &mut R) -> DhKeyPair
where
    R: RngCore + CryptoRng,
{
    let private = rng.gen_biguint_range(&BigUint::one(), modulus);
    let public = generator.modpow(&private, modulus);
    DhKeyPair { private, public }
}

/// Computes the shared value `their_public^my_private mod p`.
///
/// Symmetric by construction: both parties, each exponentiating the other's
/// public value with their own private exponent, obtain the same result. The
/// protocol's consistency depends on that identity, not merely benefits from
/// it.
pub fn agree(modulus: &BigUint, my_private: &BigUint, their_public: &BigUint) -> BigUint {
    their_public.modpow(my_private, modulus)
}
