//! Setup phase: the prover's Data transaction.

use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};

use crate::crypto::codec;
use crate::crypto::group::GroupParams;
use crate::crypto::keypair::{self, DhKeyPair};
use crate::protocol::answer::AnswerTransaction;
use crate::protocol::request::Challenge;
use crate::transport_key;
use crate::wire::{DataPayload, RequestPayload};
use crate::{Error, Result};

/// Miller-Rabin certainty applied to freshly generated groups.
const VALIDATION_CERTAINTY: usize = 3;

/// Size of the transport key pair attached by keyed serialization.
const TRANSPORT_KEY_BITS: usize = 2048;

/// One commitment round: an independent key pair whose private side is later
/// revealed or masked depending on the verifier's challenge bit.
#[derive(Clone, Debug)]
pub struct CommitmentRound {
    pair: DhKeyPair,
}

impl CommitmentRound {
    fn fresh<R>(group: &GroupParams, rng: &mut R) -> Self
    where
        R: RngCore + CryptoRng,
    {
        Self {
            pair: keypair::generate(group.modulus(), group.generator(), rng),
        }
    }

    /// The round random `r_i`.
    pub fn random(&self) -> &BigUint {
        self.pair.private()
    }

    /// The round public `g^{r_i} mod p`.
    pub fn public(&self) -> &BigUint {
        self.pair.public()
    }
}

/// The prover's Data transaction: a fresh group, a primary key pair, a
/// blinded secret tied to a hashed identity, and K commitment rounds.
///
/// Everything here is fixed at construction time. The private exponents
/// (`a`, `r`, the round randoms) exist only as long as this value is held;
/// drop it once the Answer phase has been served.
#[derive(Clone, Debug)]
pub struct DataTransaction {
    group: GroupParams,
    primary: DhKeyPair,
    blinding: DhKeyPair,
    rounds: Vec<CommitmentRound>,
    secret: BigUint,
    token: String,
}

impl DataTransaction {
    /// Builds a Data transaction.
    ///
    /// Generates and validates a safe-prime group of `bit_size` bits, draws
    /// the primary and blinding key pairs and `rounds` commitment rounds,
    /// and folds the identity digest into the blinded secret:
    /// `secret = g^r + H` with *plain* integer addition. The sum is never
    /// reduced modulo `p`; the challenge phase's cancellation depends on
    /// that.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedHex`] if `hashed_identity` is not hex text,
    /// [`Error::InvalidSize`] for an undersized group request, and
    /// [`Error::GroupValidationFailed`] if the fresh group fails its
    /// validity check (fatal; no retry is attempted).
    pub fn build<R>(
        bit_size: u64,
        rounds: usize,
        hashed_identity: &str,
        token: impl Into<String>,
        rng: &mut R,
    ) -> Result<Self>
    where
        R: RngCore + CryptoRng,
    {
        let digest = codec::decode(hashed_identity)?;

        let group = GroupParams::generate(bit_size, rng)?;
        if !group.validate(VALIDATION_CERTAINTY, rng) {
            return Err(Error::GroupValidationFailed);
        }

        let primary = keypair::generate(group.modulus(), group.generator(), rng);
        let blinding = keypair::generate(group.modulus(), group.generator(), rng);
        let secret = blinding.public() + &digest;

        let rounds = (0..rounds)
            .map(|_| CommitmentRound::fresh(&group, rng))
            .collect();

        Ok(Self {
            group,
            primary,
            blinding,
            rounds,
            secret,
            token: token.into(),
        })
    }

    /// The group this transaction generated and owns.
    pub fn group(&self) -> &GroupParams {
        &self.group
    }

    /// The primary key pair `(a, g^a)`.
    pub fn primary(&self) -> &DhKeyPair {
        &self.primary
    }

    /// The blinding key pair `(r, g^r)`.
    pub fn blinding(&self) -> &DhKeyPair {
        &self.blinding
    }

    /// The commitment rounds, in challenge order.
    pub fn rounds(&self) -> &[CommitmentRound] {
        &self.rounds
    }

    /// The blinded secret `g^r + H`.
    pub fn secret(&self) -> &BigUint {
        &self.secret
    }

    /// The correlation token this transaction echoes.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Serializes the payload in the deployment's full field set.
    pub fn payload(&self) -> DataPayload {
        DataPayload {
            modulus: codec::encode(self.group.modulus()),
            g: codec::encode(self.group.generator()),
            r: codec::encode(self.blinding.private()),
            g_r: codec::encode(self.blinding.public()),
            a: codec::encode(self.primary.private()),
            g_a: codec::encode(self.primary.public()),
            secret: codec::encode(&self.secret),
            g_r_i: self
                .rounds
                .iter()
                .map(|round| codec::encode(round.public()))
                .collect(),
            r_i: self
                .rounds
                .iter()
                .map(|round| codec::encode(round.random()))
                .collect(),
            rounds: self.rounds.len() as u64,
            token: self.token.clone(),
            pub_key: None,
            prv_key: None,
        }
    }

    /// Serializes the payload with a freshly generated transport key pair
    /// attached as `pub_key`/`prv_key`.
    ///
    /// The keys secure transport of sensitive payload fields out of band;
    /// nothing in the handshake itself consumes them.
    pub fn payload_with_keys<R>(&self, rng: &mut R) -> Result<DataPayload>
    where
        R: RngCore + CryptoRng,
    {
        let keys = transport_key::generate(TRANSPORT_KEY_BITS, rng)?;
        let mut payload = self.payload();
        payload.pub_key = Some(keys.public_pem);
        payload.prv_key = Some(keys.private_pem);
        Ok(payload)
    }

    /// Builds the Answer transaction for a challenge aimed at this Data
    /// transaction, using the retained private state.
    pub fn answer(&self, request: &RequestPayload) -> Result<AnswerTransaction> {
        let ephemeral_public = codec::decode(&request.g_b)?;
        let challenge = Challenge::parse(&request.req)?;
        let round_privates: Vec<BigUint> = self
            .rounds
            .iter()
            .map(|round| round.random().clone())
            .collect();

        AnswerTransaction::build(
            self.group.modulus(),
            &ephemeral_public,
            &challenge,
            self.primary.private(),
            self.blinding.private(),
            &round_privates,
            request.token.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::rng::SecureRng;

    #[test]
    fn secret_is_unreduced_sum_of_blinding_public_and_digest() {
        let mut rng = SecureRng::new();
        let txn = DataTransaction::build(64, 3, "1a2b", "t", &mut rng).unwrap();

        let digest = BigUint::from(0x1a2bu32);
        assert_eq!(txn.secret(), &(txn.blinding().public() + &digest));
    }

    #[test]
    fn payload_mirrors_internal_state() {
        let mut rng = SecureRng::new();
        let txn = DataTransaction::build(64, 4, "FF", "token-9", &mut rng).unwrap();
        let payload = txn.payload();

        assert_eq!(payload.rounds, 4);
        assert_eq!(payload.g_r_i.len(), 4);
        assert_eq!(payload.r_i.len(), 4);
        assert_eq!(payload.token, "token-9");
        assert!(payload.pub_key.is_none());
        assert!(payload.prv_key.is_none());

        assert_eq!(
            codec::decode(&payload.modulus).unwrap(),
            *txn.group().modulus()
        );
        for (hex, round) in payload.r_i.iter().zip(txn.rounds()) {
            assert_eq!(&codec::decode(hex).unwrap(), round.random());
        }
    }

    #[test]
    fn independent_builds_draw_fresh_values() {
        let mut rng = SecureRng::new();
        let first = DataTransaction::build(64, 2, "1a2b", "t", &mut rng).unwrap();
        let second = DataTransaction::build(64, 2, "1a2b", "t", &mut rng).unwrap();

        // Same shape, fresh randomness throughout.
        assert_eq!(first.rounds().len(), second.rounds().len());
        assert_ne!(first.group().modulus(), second.group().modulus());
        assert_ne!(first.secret(), second.secret());
    }

    #[test]
    fn rejects_bad_identity_hex() {
        let mut rng = SecureRng::new();
        assert!(matches!(
            DataTransaction::build(64, 2, "not-hex", "t", &mut rng),
            Err(Error::MalformedHex(_))
        ));
    }
}
