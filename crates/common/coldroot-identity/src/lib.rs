//! Cold root identity – epoch key derivation and lineage attestation.
//!
//! - A 32-byte offline root seed derives one Ed25519 keypair per epoch label
//!   via HKDF-SHA256 (`salt = "nostr-cold-root"`, `info = "epoch:" || label`).
//! - The root signs each epoch public key in a kind-30001 lineage event.
//! - Verification is anchored to a root public key chosen by the caller.
//! - `npub` / `nsec` bech32 strings are display-only.
//! - Zero `unsafe`; `#![forbid(unsafe_code)]`.

#![forbid(unsafe_code)]

mod bech32;
mod codec;
mod derivation;
mod epoch;
mod error;
mod keypair;
mod lineage;
mod vectors;
mod verify;
#[cfg(test)]
mod proptests;

pub use codec::{decode_fixed, encode_hex};
pub use derivation::{
    derive_epoch_keypair, derive_epoch_seed, generate_root_seed, generate_root_seed_with,
    seed_to_keypair, EPOCH_INFO_PREFIX, HKDF_SALT,
};
pub use epoch::{deterministic_created_at, QuarterLabel};
pub use error::{IdentityError, Result};
pub use keypair::{Keypair, RootSeed, Signature, PUBLIC_KEY_LENGTH, SEED_LENGTH};
pub use lineage::{
    build_lineage_event, build_lineage_event_with_clock, Clock, FixedClock, LineageEvent,
    LineageTags, SystemClock, EPOCH_TAG, LINEAGE_KIND, ROOT_TAG, SIG_TAG,
};
pub use vectors::{EpochVector, RootVector, VectorMismatch, VectorSet};
pub use verify::{check_lineage, check_lineage_value, verify_lineage, verify_lineage_value, LineageRejection};

/// Bech32 display encoding (`npub` / `nsec`).
pub mod text {
    pub use crate::bech32::{encode, npub, nsec, NPUB_HRP, NSEC_HRP};
}
