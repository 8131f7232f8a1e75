//! Error types for the identity handshake.

/// Main error type for the library.
///
/// Every phase constructor either completes entirely or reports exactly one
/// of these; there is no partial state to recover and no built-in retry.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Requested group size is below the smallest width for which the
    /// safe-prime construction is meaningful.
    #[error("invalid group size: {0} bits (minimum 6)")]
    InvalidSize(u64),

    /// A generated or received group failed the primality/subgroup checks.
    #[error("group validation failed")]
    GroupValidationFailed,

    /// A wire value is not a valid hexadecimal integer.
    #[error("malformed hex value: {0:?}")]
    MalformedHex(String),

    /// A required payload field is absent.
    #[error("missing payload field `{0}`")]
    MissingField(&'static str),

    /// A payload field is present but has the wrong type or shape.
    #[error("payload field `{0}` has the wrong type or shape")]
    TypeMismatch(&'static str),

    /// The asymmetric transport-key primitive reported a failure.
    #[error("transport key failure: {0}")]
    TransportKey(String),

    /// A message could not be encoded to or parsed from its wire form.
    #[error("message encoding: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The peer answered with an error reply instead of a payload.
    #[error("peer reported failure: {0}")]
    Peer(String),

    /// Socket-level failure in the request/reply exchange.
    #[error("transport i/o: {0}")]
    Io(#[from] std::io::Error),
}
