//! Per-message dispatch from wire commands to phase constructors.

use rand::{CryptoRng, RngCore};
use tracing::{debug, info};

use crate::crypto::codec;
use crate::protocol::{AnswerTransaction, Challenge, DataTransaction, RequestTransaction};
use crate::server::config::ServerConfig;
use crate::wire::{BuildAnswer, Command, Message};
use crate::Result;

/// Stateless per-message handler.
///
/// Each inbound message is parsed, dispatched on its `type` tag, built by
/// the matching phase constructor, and serialized back. Nothing is shared
/// between messages except the configured defaults and the random source;
/// a failed construction produces an error, never a partial payload.
#[derive(Clone, Debug)]
pub struct HandshakeService {
    config: ServerConfig,
}

impl HandshakeService {
    /// Creates a service with the given defaults.
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Handles one serialized request, returning the serialized reply.
    pub fn handle<R>(&self, text: &str, rng: &mut R) -> Result<String>
    where
        R: RngCore + CryptoRng,
    {
        let reply = match Command::from_json(text)? {
            Command::BuildData(params) => {
                let bit_size = params.bit_size.unwrap_or(self.config.group_bits);
                let rounds = params.rounds.unwrap_or(self.config.rounds as u64) as usize;
                info!(
                    bit_size,
                    rounds,
                    with_keys = params.with_keys,
                    "building data transaction"
                );

                let txn = DataTransaction::build(
                    bit_size,
                    rounds,
                    &params.hashed_identity,
                    params.token,
                    rng,
                )?;
                let payload = if params.with_keys {
                    txn.payload_with_keys(rng)?
                } else {
                    txn.payload()
                };
                Message::Data(payload)
            }
            Command::BuildRequest(params) => {
                info!(rounds = params.data.rounds, "building request transaction");
                let txn = RequestTransaction::build(
                    &params.data,
                    &params.hashed_identity,
                    params.token,
                    rng,
                )?;
                Message::Request(txn.payload())
            }
            Command::BuildAnswer(params) => {
                info!(rounds = params.r_i.len(), "building answer transaction");
                Message::Answer(build_answer(&params)?.payload())
            }
        };

        debug!(kind = reply.kind(), "reply ready");
        reply.to_json()
    }
}

fn build_answer(params: &BuildAnswer) -> Result<AnswerTransaction> {
    let modulus = codec::decode(&params.modulus)?;
    let ephemeral_public = codec::decode(&params.g_b)?;
    let challenge = Challenge::parse(&params.req)?;
    let primary_private = codec::decode(&params.a)?;
    let blinding_private = codec::decode(&params.r)?;
    let round_privates = params
        .r_i
        .iter()
        .map(|hex| codec::decode(hex))
        .collect::<Result<Vec<_>>>()?;

    AnswerTransaction::build(
        &modulus,
        &ephemeral_public,
        &challenge,
        &primary_private,
        &blinding_private,
        &round_privates,
        params.token.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::rng::SecureRng;
    use crate::wire::{BuildData, BuildRequest};

    fn test_service() -> HandshakeService {
        HandshakeService::new(ServerConfig {
            group_bits: 64,
            rounds: 4,
            ..ServerConfig::default()
        })
    }

    #[test]
    fn full_three_phase_dispatch() {
        let service = test_service();
        let mut rng = SecureRng::new();

        let data_request = Command::BuildData(BuildData {
            bit_size: None,
            rounds: None,
            hashed_identity: "1a2b".to_string(),
            token: "corr-1".to_string(),
            with_keys: false,
        })
        .to_json()
        .unwrap();
        let data_reply = service.handle(&data_request, &mut rng).unwrap();
        let data = match Message::from_json(&data_reply).unwrap() {
            Message::Data(payload) => payload,
            other => panic!("wrong reply: {other:?}"),
        };
        assert_eq!(data.rounds, 4);
        assert_eq!(data.token, "corr-1");

        let request_request = Command::BuildRequest(BuildRequest {
            data: data.clone(),
            hashed_identity: "1a2b".to_string(),
            token: "corr-2".to_string(),
        })
        .to_json()
        .unwrap();
        let request_reply = service.handle(&request_request, &mut rng).unwrap();
        let request = match Message::from_json(&request_reply).unwrap() {
            Message::Request(payload) => payload,
            other => panic!("wrong reply: {other:?}"),
        };
        assert_eq!(request.req.len(), 4);
        assert_eq!(request.token, "corr-2");

        let answer_request = Command::BuildAnswer(BuildAnswer {
            modulus: data.modulus.clone(),
            g: data.g.clone(),
            g_b: request.g_b.clone(),
            req: request.req.clone(),
            a: data.a.clone(),
            r: data.r.clone(),
            r_i: data.r_i.clone(),
            token: "corr-3".to_string(),
        })
        .to_json()
        .unwrap();
        let answer_reply = service.handle(&answer_request, &mut rng).unwrap();
        let answer = match Message::from_json(&answer_reply).unwrap() {
            Message::Answer(payload) => payload,
            other => panic!("wrong reply: {other:?}"),
        };
        assert_eq!(answer.response.len(), 4);
        assert_eq!(answer.token, "corr-3");
    }

    #[test]
    fn malformed_request_is_an_error_not_a_payload() {
        let service = test_service();
        let mut rng = SecureRng::new();
        assert!(service.handle(r#"{"type": 0}"#, &mut rng).is_err());
    }
}
