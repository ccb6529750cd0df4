//! Deterministic epoch key derivation from a root seed.
//!
//! The epoch seed is HKDF-SHA256 (RFC 5869) over the root seed with
//!
//! - salt: `b"nostr-cold-root"`
//! - info: `b"epoch:" || utf8(label)`
//! - output: 32 bytes
//!
//! Any change to these parameters yields a different, incompatible identity
//! chain.

use crate::codec;
use crate::error::Result;
use crate::keypair::{Keypair, RootSeed, SEED_LENGTH};
use hkdf::Hkdf;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use sha2::Sha256;
use tracing::debug;
use zeroize::Zeroize;

/// HKDF salt shared by every epoch derivation.
pub const HKDF_SALT: &[u8] = b"nostr-cold-root";

/// Prefix of the HKDF info string; the epoch label follows it.
pub const EPOCH_INFO_PREFIX: &[u8] = b"epoch:";

/// Generate a fresh root seed from the operating system CSPRNG.
pub fn generate_root_seed() -> RootSeed {
    generate_root_seed_with(&mut OsRng)
}

/// Generate a root seed from a caller-supplied CSPRNG.
pub fn generate_root_seed_with<R: CryptoRng + RngCore>(rng: &mut R) -> RootSeed {
    let mut bytes = [0u8; SEED_LENGTH];
    rng.fill_bytes(&mut bytes);
    RootSeed::from(bytes)
}

/// Derive the 32-byte epoch seed for `label`.
///
/// Fails only when `root_seed` is not exactly 32 bytes.
pub fn derive_epoch_seed(root_seed: &[u8], label: &str) -> Result<[u8; SEED_LENGTH]> {
    let ikm: [u8; SEED_LENGTH] = codec::to_array("root seed", root_seed)?;
    Ok(hkdf_epoch(&ikm, label))
}

fn hkdf_epoch(ikm: &[u8; SEED_LENGTH], label: &str) -> [u8; SEED_LENGTH] {
    let hk = Hkdf::<Sha256>::new(Some(HKDF_SALT), ikm);
    let mut okm = [0u8; SEED_LENGTH];
    hk.expand_multi_info(&[EPOCH_INFO_PREFIX, label.as_bytes()], &mut okm)
        .expect("32 bytes is within the HKDF-SHA256 output limit");

    debug!(label, "derived epoch seed");
    okm
}

/// Expand a 32-byte seed into an Ed25519 keypair.
pub fn seed_to_keypair(seed: &[u8]) -> Result<Keypair> {
    let seed: [u8; SEED_LENGTH] = codec::to_array("seed", seed)?;
    Ok(Keypair::from_seed(&seed))
}

/// `seed_to_keypair(derive_epoch_seed(root_seed, label))`.
pub fn derive_epoch_keypair(root_seed: &[u8], label: &str) -> Result<Keypair> {
    let seed = derive_epoch_seed(root_seed, label)?;
    seed_to_keypair(&seed)
}

impl RootSeed {
    /// Derive the keypair for epoch `label` from this root.
    pub fn derive_epoch(&self, label: &str) -> Keypair {
        let mut seed = hkdf_epoch(self.as_bytes(), label);
        let keypair = Keypair::from_seed(&seed);
        seed.zeroize();
        keypair
    }
}
