//! End-to-end behavior of the three-phase handshake, checked from the wire
//! forms alone wherever possible.

use num_bigint::BigInt;
use zk_identity::{codec, DataTransaction, GroupParams, RequestTransaction, SecureRng};

#[test]
fn end_to_end_small_group() {
    let mut rng = SecureRng::new();

    let data = DataTransaction::build(64, 4, "1a2b", "txn", &mut rng).unwrap();
    let data_payload = data.payload();

    let request = RequestTransaction::build(&data_payload, "1a2b", "txn", &mut rng).unwrap();
    let request_payload = request.payload();

    let answer = data.answer(&request_payload).unwrap();
    let answer_payload = answer.payload();
    assert_eq!(answer_payload.response.len(), 4);

    // Recompute the shared value from the wire alone: the Data payload
    // carries `a`, the Request payload carries `g_b`.
    let modulus = codec::decode(&data_payload.modulus).unwrap();
    let a = codec::decode(&data_payload.a).unwrap();
    let g_b = codec::decode(&request_payload.g_b).unwrap();
    let shared = g_b.modpow(&a, &modulus);

    let r = codec::decode(&data_payload.r).unwrap();
    for (i, bit) in request_payload.req.chars().enumerate() {
        let response = codec::decode(&answer_payload.response[i]).unwrap();
        let round_private = codec::decode(&data_payload.r_i[i]).unwrap();
        match bit {
            '0' => assert_eq!(response, round_private),
            '1' => assert_eq!(&response - &shared - &r, round_private),
            other => panic!("unexpected challenge character {other}"),
        }
    }
}

#[test]
fn masked_proof_checks_out_against_wire_fields() {
    let mut rng = SecureRng::new();

    let data = DataTransaction::build(64, 4, "1a2b", "txn", &mut rng).unwrap();
    let data_payload = data.payload();
    let request = RequestTransaction::build(&data_payload, "1a2b", "txn", &mut rng).unwrap();
    let request_payload = request.payload();

    // The Request payload discloses `b`; a wire observer can therefore
    // reproduce the agreement and confirm the digest terms cancelled.
    let modulus = codec::decode(&data_payload.modulus).unwrap();
    let generator = codec::decode(&data_payload.g).unwrap();
    let g_a = codec::decode(&data_payload.g_a).unwrap();
    let b = codec::decode(&request_payload.b).unwrap();
    let shared = g_a.modpow(&b, &modulus);

    let g_r = codec::decode(&data_payload.g_r).unwrap();
    let mask = generator.modpow(&shared, &modulus);
    let expected = BigInt::from(mask) * BigInt::from(g_r);

    assert_eq!(
        codec::decode_signed(&request_payload.g_g_ab_p_r).unwrap(),
        expected
    );
}

#[test]
fn payload_group_satisfies_safe_prime_invariants() {
    let mut rng = SecureRng::new();

    let data = DataTransaction::build(64, 2, "FF", "t", &mut rng).unwrap();
    let payload = data.payload();

    let modulus = codec::decode(&payload.modulus).unwrap();
    let generator = codec::decode(&payload.g).unwrap();
    let order = (&modulus - 1u32) / 2u32;

    let group = GroupParams::from_parts(modulus, order, generator);
    assert!(group.validate(20, &mut rng));
}

#[test]
fn token_is_echoed_by_every_phase() {
    let mut rng = SecureRng::new();

    let data = DataTransaction::build(64, 3, "AB", "corr-7", &mut rng).unwrap();
    assert_eq!(data.payload().token, "corr-7");

    let request = RequestTransaction::build(&data.payload(), "AB", "corr-8", &mut rng).unwrap();
    assert_eq!(request.payload().token, "corr-8");

    let answer = data.answer(&request.payload()).unwrap();
    assert_eq!(answer.payload().token, "corr-8");
}

#[test]
fn fresh_randomness_on_identical_inputs() {
    let mut rng = SecureRng::new();

    let first = DataTransaction::build(64, 4, "1a2b", "t", &mut rng).unwrap();
    let second = DataTransaction::build(64, 4, "1a2b", "t", &mut rng).unwrap();

    let first_payload = first.payload();
    let second_payload = second.payload();

    assert_ne!(first_payload.modulus, second_payload.modulus);
    assert_ne!(first_payload.secret, second_payload.secret);

    // Identical structure regardless.
    assert_eq!(first_payload.rounds, second_payload.rounds);
    assert_eq!(first_payload.g_r_i.len(), second_payload.g_r_i.len());
}
