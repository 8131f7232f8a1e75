//! Challenge phase: the verifier's Request transaction.

use std::fmt;

use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use rand::{CryptoRng, Rng, RngCore};

use crate::crypto::codec;
use crate::crypto::keypair::{self, DhKeyPair};
use crate::wire::{DataPayload, RequestPayload};
use crate::{Error, Result};

/// An ordered sequence of challenge bits, one per commitment round.
///
/// Each bit is a separate draw from the secure random source — never a
/// single multi-bit sample — and no balance between zeros and ones is
/// required.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Challenge {
    bits: Vec<bool>,
}

impl Challenge {
    /// Draws a fresh challenge of `rounds` independent bits.
    pub fn draw<R>(rounds: usize, rng: &mut R) -> Self
    where
        R: RngCore + CryptoRng,
    {
        let bits = (0..rounds).map(|_| rng.gen()).collect();
        Self { bits }
    }

    /// Parses the wire form: a string of `0`/`1` characters.
    pub fn parse(text: &str) -> Result<Self> {
        let bits = text
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(Error::TypeMismatch("req")),
            })
            .collect::<Result<Vec<bool>>>()?;
        Ok(Self { bits })
    }

    /// The bits in round order.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Number of rounds this challenge covers.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True for a zero-round challenge.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.bits {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// The verifier's Request transaction: an ephemeral key pair, the masked
/// proof derived from the Data payload, and the K-bit challenge.
#[derive(Clone, Debug)]
pub struct RequestTransaction {
    ephemeral: DhKeyPair,
    shared: BigUint,
    masked_proof: BigInt,
    challenge: Challenge,
    token: String,
}

impl RequestTransaction {
    /// Builds a Request transaction from a Data transaction's payload.
    ///
    /// Only the public subset of the payload is read (`G`, `g`, `g_a`,
    /// `secret`, `K`). The subgroup order is not needed here; the group is
    /// taken as-is from the wire.
    ///
    /// The masked proof is `modexp(g, shared, G) * (secret − H')` where
    /// `shared = g_a^b mod G` and `H'` is the supplied digest. Subtraction
    /// and multiplication stay in plain (signed, arbitrary-precision)
    /// integers: when `H'` equals the digest folded in at setup, the two
    /// cancel exactly and the product is `modexp(g, shared, G) * g^r`.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedHex`] for undecodable fields and
    /// [`Error::GroupValidationFailed`] for a degenerate (zero) modulus.
    pub fn build<R>(
        data: &DataPayload,
        hashed_identity: &str,
        token: impl Into<String>,
        rng: &mut R,
    ) -> Result<Self>
    where
        R: RngCore + CryptoRng,
    {
        let modulus = codec::decode(&data.modulus)?;
        if modulus.is_zero() {
            return Err(Error::GroupValidationFailed);
        }
        let generator = codec::decode(&data.g)?;
        let primary_public = codec::decode(&data.g_a)?;
        let secret = codec::decode(&data.secret)?;
        let digest = codec::decode(hashed_identity)?;

        let ephemeral = keypair::generate(&modulus, &generator, rng);
        let shared = keypair::agree(&modulus, ephemeral.private(), &primary_public);

        let mask = generator.modpow(&shared, &modulus);
        let masked_proof = BigInt::from(mask) * (BigInt::from(secret) - BigInt::from(digest));

        let challenge = Challenge::draw(data.rounds as usize, rng);

        Ok(Self {
            ephemeral,
            shared,
            masked_proof,
            challenge,
            token: token.into(),
        })
    }

    /// The ephemeral key pair `(b, g^b)`.
    pub fn ephemeral(&self) -> &DhKeyPair {
        &self.ephemeral
    }

    /// The DH shared value `g^{ab} mod p`.
    pub fn shared(&self) -> &BigUint {
        &self.shared
    }

    /// The masked proof value.
    pub fn masked_proof(&self) -> &BigInt {
        &self.masked_proof
    }

    /// The challenge issued to the prover.
    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }

    /// The correlation token this transaction echoes.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Serializes the payload, ephemeral private exponent included (the
    /// deployment's observed behavior; see [`RequestPayload`]).
    pub fn payload(&self) -> RequestPayload {
        RequestPayload {
            g_b: codec::encode(self.ephemeral.public()),
            g_g_ab_p_r: codec::encode_signed(&self.masked_proof),
            req: self.challenge.to_string(),
            b: codec::encode(self.ephemeral.private()),
            token: self.token.clone(),
        }
    }
}
