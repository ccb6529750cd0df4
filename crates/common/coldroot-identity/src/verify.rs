//! Lineage verification against a caller-chosen root.
//!
//! The root the event names for itself is never trusted on its own: the
//! `root` tag must equal the root public key supplied by the caller.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. `kind` is exactly 30001
//! 2. `pubkey` is present and is hex
//! 3. `root` and `sig` tags are present (`epoch` is informational)
//! 4. `root` equals the claimed root, ignoring ASCII case
//! 5. `root` (32 bytes), `pubkey` (32 bytes) and `sig` (64 bytes) decode
//! 6. `sig` is a strict Ed25519 signature by `root` over the raw `pubkey` bytes

use crate::codec;
use crate::keypair::PUBLIC_KEY_LENGTH;
use crate::lineage::{LineageEvent, LineageTags, LINEAGE_KIND};
use ed25519_dalek::{Signature, VerifyingKey, SIGNATURE_LENGTH};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// First check a lineage event failed.
///
/// Diagnostics only. The trust decision is [`verify_lineage`]'s boolean.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LineageRejection {
    #[error("event kind {0:?} is not 30001")]
    WrongKind(Option<u64>),

    #[error("event pubkey is missing")]
    MissingPubkey,

    #[error("event pubkey is not a hex string")]
    MalformedPubkey,

    #[error("event has no root tag")]
    MissingRootTag,

    #[error("event has no sig tag")]
    MissingSigTag,

    #[error("root tag {found} does not match expected root {claimed}")]
    RootMismatch { claimed: String, found: String },

    #[error("{field} does not decode to {expected} bytes")]
    MalformedField { field: &'static str, expected: usize },

    #[error("root tag is not a valid Ed25519 public key")]
    InvalidRootKey,

    #[error("signature does not verify against the root key")]
    BadSignature,
}

/// Verify `event` against `claimed_root_hex`. Never panics on malformed input.
pub fn verify_lineage(claimed_root_hex: &str, event: &LineageEvent) -> bool {
    log_outcome(check_lineage(claimed_root_hex, event))
}

/// [`verify_lineage`] for an untyped JSON document.
///
/// Fields of the wrong JSON type invalidate the event rather than erroring.
pub fn verify_lineage_value(claimed_root_hex: &str, event: &Value) -> bool {
    log_outcome(check_lineage_value(claimed_root_hex, event))
}

/// Run the verification sequence and report the first failed check.
pub fn check_lineage(claimed_root_hex: &str, event: &LineageEvent) -> Result<(), LineageRejection> {
    check(
        claimed_root_hex,
        Some(u64::from(event.kind)),
        Some(event.pubkey.as_str()),
        event.lineage_tags(),
    )
}

/// [`check_lineage`] for an untyped JSON document.
pub fn check_lineage_value(claimed_root_hex: &str, event: &Value) -> Result<(), LineageRejection> {
    check(
        claimed_root_hex,
        event.get("kind").and_then(Value::as_u64),
        event.get("pubkey").and_then(Value::as_str),
        LineageTags::from_value(event),
    )
}

fn check(
    claimed_root_hex: &str,
    kind: Option<u64>,
    pubkey: Option<&str>,
    tags: LineageTags<'_>,
) -> Result<(), LineageRejection> {
    if kind != Some(u64::from(LINEAGE_KIND)) {
        return Err(LineageRejection::WrongKind(kind));
    }

    let pubkey = pubkey.ok_or(LineageRejection::MissingPubkey)?;
    if !codec::is_hex(pubkey) {
        return Err(LineageRejection::MalformedPubkey);
    }

    let root_hex = tags
        .root
        .filter(|s| !s.is_empty())
        .ok_or(LineageRejection::MissingRootTag)?;
    let sig_hex = tags
        .sig
        .filter(|s| !s.is_empty())
        .ok_or(LineageRejection::MissingSigTag)?;

    if !root_hex.eq_ignore_ascii_case(claimed_root_hex) {
        return Err(LineageRejection::RootMismatch {
            claimed: claimed_root_hex.to_string(),
            found: root_hex.to_string(),
        });
    }

    let root: [u8; PUBLIC_KEY_LENGTH] = decode("root", root_hex)?;
    let epoch_public_key: [u8; PUBLIC_KEY_LENGTH] = decode("pubkey", pubkey)?;
    let sig: [u8; SIGNATURE_LENGTH] = decode("sig", sig_hex)?;

    let root_key = VerifyingKey::from_bytes(&root).map_err(|_| LineageRejection::InvalidRootKey)?;
    root_key
        .verify_strict(&epoch_public_key, &Signature::from_bytes(&sig))
        .map_err(|_| LineageRejection::BadSignature)
}

fn decode<const N: usize>(field: &'static str, hex: &str) -> Result<[u8; N], LineageRejection> {
    codec::decode_fixed(field, hex).map_err(|_| LineageRejection::MalformedField { field, expected: N })
}

fn log_outcome(outcome: Result<(), LineageRejection>) -> bool {
    match outcome {
        Ok(()) => true,
        Err(reason) => {
            debug!(%reason, "lineage event rejected");
            false
        }
    }
}
