//! Response phase: the prover's Answer transaction.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::crypto::codec;
use crate::protocol::request::Challenge;
use crate::wire::AnswerPayload;
use crate::{Error, Result};

/// The prover's Answer transaction: one response value per challenge round,
/// positionally aligned with the challenge bits and the original
/// commitments.
///
/// For challenge bit `0` the round's commitment is opened (`r_i` verbatim);
/// for bit `1` the response is `r_i + r + shared` with plain, unreduced
/// integer addition, where `shared` is recomputed on the prover's side from
/// the verifier's ephemeral public value.
#[derive(Clone, Debug)]
pub struct AnswerTransaction {
    responses: Vec<BigUint>,
    token: String,
}

impl AnswerTransaction {
    /// Builds an Answer transaction.
    ///
    /// # Errors
    ///
    /// [`Error::GroupValidationFailed`] for a degenerate (zero) modulus, and
    /// [`Error::TypeMismatch`] when the challenge length and the number of
    /// retained round privates disagree.
    pub fn build(
        modulus: &BigUint,
        ephemeral_public: &BigUint,
        challenge: &Challenge,
        primary_private: &BigUint,
        blinding_private: &BigUint,
        round_privates: &[BigUint],
        token: impl Into<String>,
    ) -> Result<Self> {
        if modulus.is_zero() {
            return Err(Error::GroupValidationFailed);
        }
        if challenge.len() != round_privates.len() {
            return Err(Error::TypeMismatch("req"));
        }

        // Equal to the verifier's agreement value by DH symmetry.
        let shared = ephemeral_public.modpow(primary_private, modulus);

        let responses = challenge
            .bits()
            .iter()
            .zip(round_privates)
            .map(|(&bit, round_private)| {
                if bit {
                    round_private + blinding_private + &shared
                } else {
                    round_private.clone()
                }
            })
            .collect();

        Ok(Self {
            responses,
            token: token.into(),
        })
    }

    /// The response values in round order.
    pub fn responses(&self) -> &[BigUint] {
        &self.responses
    }

    /// The correlation token this transaction echoes.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Serializes the payload.
    pub fn payload(&self) -> AnswerPayload {
        AnswerPayload {
            response: self.responses.iter().map(codec::encode).collect(),
            token: self.token.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::rng::SecureRng;
    use crate::protocol::data::DataTransaction;
    use crate::protocol::request::RequestTransaction;

    #[test]
    fn responses_open_or_mask_per_challenge_bit() {
        let mut rng = SecureRng::new();
        let data = DataTransaction::build(64, 8, "1a2b", "t", &mut rng).unwrap();
        let request = RequestTransaction::build(&data.payload(), "1a2b", "t", &mut rng).unwrap();

        let answer = data.answer(&request.payload()).unwrap();
        assert_eq!(answer.responses().len(), 8);

        let shared = request
            .ephemeral()
            .public()
            .modpow(data.primary().private(), data.group().modulus());
        for ((response, &bit), round) in answer
            .responses()
            .iter()
            .zip(request.challenge().bits())
            .zip(data.rounds())
        {
            if bit {
                assert_eq!(response, &(round.random() + data.blinding().private() + &shared));
            } else {
                assert_eq!(response, round.random());
            }
        }
    }

    #[test]
    fn rejects_challenge_of_wrong_length() {
        let mut rng = SecureRng::new();
        let data = DataTransaction::build(64, 3, "AA", "t", &mut rng).unwrap();
        let request = RequestTransaction::build(&data.payload(), "AA", "t", &mut rng).unwrap();

        let mut payload = request.payload();
        payload.req.push('0');
        assert!(matches!(
            data.answer(&payload),
            Err(Error::TypeMismatch("req"))
        ));
    }

    #[test]
    fn token_comes_from_the_request() {
        let mut rng = SecureRng::new();
        let data = DataTransaction::build(64, 2, "AA", "data-token", &mut rng).unwrap();
        let request =
            RequestTransaction::build(&data.payload(), "AA", "request-token", &mut rng).unwrap();

        let answer = data.answer(&request.payload()).unwrap();
        assert_eq!(answer.token(), "request-token");
    }
}
