use thiserror::Error;

/// Input errors raised by the codec, derivation and encoding functions.
///
/// Every variant is a caller mistake rather than a transient fault, so none of
/// them is retried internally. Lineage verification never produces this type;
/// see [`crate::LineageRejection`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IdentityError {
    #[error("invalid length for {what}: expected {expected} bytes, found {found}")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("malformed hex for {what}: {source}")]
    InvalidHex {
        what: &'static str,
        #[source]
        source: hex::FromHexError,
    },

    #[error("invalid epoch label {label:?}: {reason}")]
    InvalidEpochLabel { label: String, reason: &'static str },

    #[error("invalid bech32 human-readable prefix {0:?}")]
    InvalidHrp(String),

    #[error("bech32 payload must not be empty")]
    EmptyPayload,
}

/// Result type for identity operations.
pub type Result<T> = std::result::Result<T, IdentityError>;
