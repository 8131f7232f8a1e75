//! Transport-boundary message types.
//!
//! Every exchange is a single string-keyed object tagged by an integer
//! `type` field: `0` builds a Data transaction, `1` a Request transaction,
//! `2` an Answer transaction. Inbound requests parse into a [`Command`],
//! outbound replies serialize from a [`Message`] carrying the corresponding
//! phase payload. All big-integer fields travel in canonical codec form, and
//! `token` is an opaque correlation string echoed back unchanged by every
//! phase.

pub mod fields;

use serde::ser::Error as _;
use serde::Serialize;
use serde_json::Value;

use crate::{Error, Result};

/// Integer tag selecting the Data phase.
pub const DATA_TAG: u64 = 0;
/// Integer tag selecting the Request phase.
pub const REQUEST_TAG: u64 = 1;
/// Integer tag selecting the Answer phase.
pub const ANSWER_TAG: u64 = 2;

/// Serialized Data-transaction payload.
///
/// Carries the full field set the reference deployment emits, private
/// exponents included; the challenge phase reads only the public subset
/// (`G`, `g`, `g_a`, `secret`, `K`).
#[derive(Clone, Debug, Serialize)]
pub struct DataPayload {
    /// Group modulus `p`.
    #[serde(rename = "G")]
    pub modulus: String,
    /// Subgroup generator.
    pub g: String,
    /// Blinding private exponent.
    pub r: String,
    /// Blinding public value `g^r mod p`.
    pub g_r: String,
    /// Primary private exponent.
    pub a: String,
    /// Primary public value `g^a mod p`.
    pub g_a: String,
    /// Blinded secret `g^r + H`, unreduced.
    pub secret: String,
    /// Commitment publics, one per round.
    pub g_r_i: Vec<String>,
    /// Commitment privates, positionally aligned with `g_r_i`.
    pub r_i: Vec<String>,
    /// Round count.
    #[serde(rename = "K")]
    pub rounds: u64,
    /// Opaque correlation token.
    pub token: String,
    /// Transport public key (PEM), present only for keyed serialization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pub_key: Option<String>,
    /// Transport private key (PEM), present only for keyed serialization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prv_key: Option<String>,
}

impl DataPayload {
    pub(crate) fn from_value(value: &Value) -> Result<Self> {
        let rounds = fields::u64_field(value, "K")?;
        let g_r_i = fields::str_list_field(value, "g_r_i")?;
        if g_r_i.len() as u64 != rounds {
            return Err(Error::TypeMismatch("g_r_i"));
        }
        let r_i = fields::str_list_field(value, "r_i")?;
        if r_i.len() as u64 != rounds {
            return Err(Error::TypeMismatch("r_i"));
        }

        Ok(Self {
            modulus: fields::str_field(value, "G")?.to_string(),
            g: fields::str_field(value, "g")?.to_string(),
            r: fields::str_field(value, "r")?.to_string(),
            g_r: fields::str_field(value, "g_r")?.to_string(),
            a: fields::str_field(value, "a")?.to_string(),
            g_a: fields::str_field(value, "g_a")?.to_string(),
            secret: fields::str_field(value, "secret")?.to_string(),
            g_r_i,
            r_i,
            rounds,
            token: fields::str_field(value, "token")?.to_string(),
            pub_key: fields::opt_str_field(value, "pub_key")?,
            prv_key: fields::opt_str_field(value, "prv_key")?,
        })
    }
}

/// Serialized Request-transaction payload.
///
/// `b` is the verifier's ephemeral *private* exponent, emitted alongside the
/// public `g_b` exactly as the reference deployment does. The disclosure
/// defeats the secrecy of generating `b` as a private key; downstream
/// consumers nonetheless depend on receiving it, so the field stays.
#[derive(Clone, Debug, Serialize)]
pub struct RequestPayload {
    /// Ephemeral public value `g^b mod p`.
    pub g_b: String,
    /// Masked proof `modexp(g, shared, G) * (secret - H')`, signed hex.
    pub g_g_ab_p_r: String,
    /// Challenge bits as a string of `0`/`1` characters, one per round.
    pub req: String,
    /// Ephemeral private exponent (disclosed; see type docs).
    pub b: String,
    /// Opaque correlation token.
    pub token: String,
}

impl RequestPayload {
    pub(crate) fn from_value(value: &Value) -> Result<Self> {
        Ok(Self {
            g_b: fields::str_field(value, "g_b")?.to_string(),
            g_g_ab_p_r: fields::str_field(value, "g_g_ab_p_r")?.to_string(),
            req: fields::str_field(value, "req")?.to_string(),
            b: fields::str_field(value, "b")?.to_string(),
            token: fields::str_field(value, "token")?.to_string(),
        })
    }
}

/// Serialized Answer-transaction payload.
#[derive(Clone, Debug, Serialize)]
pub struct AnswerPayload {
    /// Per-round responses, positionally aligned with the challenge bits.
    pub response: Vec<String>,
    /// Opaque correlation token.
    pub token: String,
}

impl AnswerPayload {
    pub(crate) fn from_value(value: &Value) -> Result<Self> {
        Ok(Self {
            response: fields::str_list_field(value, "response")?,
            token: fields::str_field(value, "token")?.to_string(),
        })
    }
}

/// Outbound reply: one phase payload, tagged with that phase's integer.
#[derive(Clone, Debug)]
pub enum Message {
    /// Data-transaction payload (tag 0).
    Data(DataPayload),
    /// Request-transaction payload (tag 1).
    Request(RequestPayload),
    /// Answer-transaction payload (tag 2).
    Answer(AnswerPayload),
}

impl Message {
    /// The integer tag this message carries on the wire.
    pub fn kind(&self) -> u64 {
        match self {
            Message::Data(_) => DATA_TAG,
            Message::Request(_) => REQUEST_TAG,
            Message::Answer(_) => ANSWER_TAG,
        }
    }

    /// Serializes the message with its `type` tag injected.
    pub fn to_json(&self) -> Result<String> {
        match self {
            Message::Data(payload) => tagged(payload, DATA_TAG),
            Message::Request(payload) => tagged(payload, REQUEST_TAG),
            Message::Answer(payload) => tagged(payload, ANSWER_TAG),
        }
    }

    /// Parses a message, dispatching on the `type` tag.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        match fields::u64_field(&value, "type")? {
            DATA_TAG => Ok(Message::Data(DataPayload::from_value(&value)?)),
            REQUEST_TAG => Ok(Message::Request(RequestPayload::from_value(&value)?)),
            ANSWER_TAG => Ok(Message::Answer(AnswerPayload::from_value(&value)?)),
            _ => Err(Error::TypeMismatch("type")),
        }
    }
}

/// Parameters for building a Data transaction (tag 0).
///
/// `bit_size` and `rounds` fall back to the server's configured defaults
/// when absent.
#[derive(Clone, Debug, Serialize)]
pub struct BuildData {
    /// Safe-prime group size in bits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_size: Option<u64>,
    /// Commitment round count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rounds: Option<u64>,
    /// Identity digest as hex text.
    pub hashed_identity: String,
    /// Opaque correlation token.
    pub token: String,
    /// Attach a freshly generated transport key pair to the payload.
    pub with_keys: bool,
}

impl BuildData {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(Self {
            bit_size: fields::opt_u64_field(value, "bit_size")?,
            rounds: fields::opt_u64_field(value, "rounds")?,
            hashed_identity: fields::str_field(value, "hashed_identity")?.to_string(),
            token: fields::str_field(value, "token")?.to_string(),
            with_keys: fields::bool_field_or(value, "with_keys", false)?,
        })
    }
}

/// Parameters for building a Request transaction (tag 1).
#[derive(Clone, Debug, Serialize)]
pub struct BuildRequest {
    /// The Data payload being challenged.
    pub data: DataPayload,
    /// Identity digest the requester is asking about, as hex text.
    pub hashed_identity: String,
    /// Opaque correlation token.
    pub token: String,
}

impl BuildRequest {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(Self {
            data: DataPayload::from_value(fields::object_field(value, "data")?)?,
            hashed_identity: fields::str_field(value, "hashed_identity")?.to_string(),
            token: fields::str_field(value, "token")?.to_string(),
        })
    }
}

/// Parameters for building an Answer transaction (tag 2).
///
/// Carries the prover's retained secrets for the referenced Data
/// transaction, plus the challenge being answered.
#[derive(Clone, Debug, Serialize)]
pub struct BuildAnswer {
    /// Group modulus `p`.
    #[serde(rename = "G")]
    pub modulus: String,
    /// Subgroup generator.
    pub g: String,
    /// The verifier's ephemeral public value.
    pub g_b: String,
    /// Challenge bits from the Request payload.
    pub req: String,
    /// Primary private exponent.
    pub a: String,
    /// Blinding private exponent.
    pub r: String,
    /// Commitment privates, one per round.
    pub r_i: Vec<String>,
    /// Opaque correlation token.
    pub token: String,
}

impl BuildAnswer {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(Self {
            modulus: fields::str_field(value, "G")?.to_string(),
            g: fields::str_field(value, "g")?.to_string(),
            g_b: fields::str_field(value, "g_b")?.to_string(),
            req: fields::str_field(value, "req")?.to_string(),
            a: fields::str_field(value, "a")?.to_string(),
            r: fields::str_field(value, "r")?.to_string(),
            r_i: fields::str_list_field(value, "r_i")?,
            token: fields::str_field(value, "token")?.to_string(),
        })
    }
}

/// Inbound request, dispatched on the integer `type` field.
#[derive(Clone, Debug)]
pub enum Command {
    /// Build a Data transaction (tag 0).
    BuildData(BuildData),
    /// Build a Request transaction (tag 1).
    BuildRequest(BuildRequest),
    /// Build an Answer transaction (tag 2).
    BuildAnswer(BuildAnswer),
}

impl Command {
    /// Serializes the command with its `type` tag injected.
    pub fn to_json(&self) -> Result<String> {
        match self {
            Command::BuildData(params) => tagged(params, DATA_TAG),
            Command::BuildRequest(params) => tagged(params, REQUEST_TAG),
            Command::BuildAnswer(params) => tagged(params, ANSWER_TAG),
        }
    }

    /// Parses a command, dispatching on the `type` tag.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        match fields::u64_field(&value, "type")? {
            DATA_TAG => Ok(Command::BuildData(BuildData::from_value(&value)?)),
            REQUEST_TAG => Ok(Command::BuildRequest(BuildRequest::from_value(&value)?)),
            ANSWER_TAG => Ok(Command::BuildAnswer(BuildAnswer::from_value(&value)?)),
            _ => Err(Error::TypeMismatch("type")),
        }
    }
}

/// Serializes an error into the reply object used when a phase fails.
///
/// A failed phase construction never emits a payload; the peer receives this
/// single-field object instead.
pub fn error_reply(error: &Error) -> String {
    serde_json::json!({ "error": error.to_string() }).to_string()
}

fn tagged<T: Serialize>(payload: &T, tag: u64) -> Result<String> {
    let mut value = serde_json::to_value(payload)?;
    let map = value
        .as_object_mut()
        .ok_or_else(|| Error::Encoding(serde_json::Error::custom("payload is not an object")))?;
    map.insert("type".to_string(), Value::from(tag));
    serde_json::to_string(&value).map_err(Error::from)
}
