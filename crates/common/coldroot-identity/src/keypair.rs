use crate::bech32;
use crate::codec;
use crate::error::Result;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length in bytes of every seed handled by this crate.
pub const SEED_LENGTH: usize = 32;

/// Length in bytes of an Ed25519 public key.
pub const PUBLIC_KEY_LENGTH: usize = ed25519_dalek::PUBLIC_KEY_LENGTH;

pub type Signature = ed25519_dalek::Signature;

/// The 32-byte root secret. Never leaves offline storage.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RootSeed([u8; SEED_LENGTH]);

impl RootSeed {
    /// Wrap raw bytes, rejecting anything that is not exactly 32 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        codec::to_array("root seed", bytes).map(Self)
    }

    /// Parse the 64-character hex form.
    pub fn from_hex(input: &str) -> Result<Self> {
        codec::decode_fixed("root seed", input).map(Self)
    }

    /// Lowercase hex form, suitable for writing down on paper.
    pub fn to_hex(&self) -> String {
        codec::encode_hex(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LENGTH] {
        &self.0
    }

    /// The root keypair; the seed is used directly as Ed25519 seed material.
    pub fn keypair(&self) -> Keypair {
        Keypair::from_seed(&self.0)
    }
}

impl From<[u8; SEED_LENGTH]> for RootSeed {
    fn from(bytes: [u8; SEED_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for RootSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RootSeed([redacted])")
    }
}

/// Ed25519 keypair that owns its 32-byte seed.
///
/// The seed is zeroized on drop. The public key is always the Ed25519
/// expansion of the seed; there is no way to build one with a mismatched pair.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Keypair {
    seed: [u8; SEED_LENGTH],
    #[zeroize(skip)]
    public: VerifyingKey,
}

impl Keypair {
    /// Expand a seed into a keypair.
    pub fn from_seed(seed: &[u8; SEED_LENGTH]) -> Self {
        let public = SigningKey::from_bytes(seed).verifying_key();
        Self { seed: *seed, public }
    }

    /// Expand a hex-encoded 32-byte seed into a keypair.
    pub fn from_seed_hex(input: &str) -> Result<Self> {
        let seed: [u8; SEED_LENGTH] = codec::decode_fixed("seed", input)?;
        Ok(Self::from_seed(&seed))
    }

    /// The secret seed.
    pub fn seed(&self) -> &[u8; SEED_LENGTH] {
        &self.seed
    }

    pub fn seed_hex(&self) -> String {
        codec::encode_hex(self.seed)
    }

    pub fn public_key(&self) -> &VerifyingKey {
        &self.public
    }

    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.public.to_bytes()
    }

    pub fn public_key_hex(&self) -> String {
        codec::encode_hex(self.public.as_bytes())
    }

    /// Sign arbitrary bytes, returning an Ed25519 signature.
    pub fn sign(&self, msg: &[u8]) -> Signature {
        SigningKey::from_bytes(&self.seed).sign(msg)
    }

    /// Verify a signature against `msg` using strict verification.
    pub fn verify(&self, msg: &[u8], sig: &Signature) -> bool {
        self.public.verify_strict(msg, sig).is_ok()
    }

    /// Display form of the public key (`npub1...`).
    pub fn npub(&self) -> String {
        bech32::npub(self.public.as_bytes())
    }

    /// Display form of the secret seed (`nsec1...`).
    pub fn nsec(&self) -> String {
        bech32::nsec(&self.seed)
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("seed", &"[redacted]")
            .field("public", &self.public_key_hex())
            .finish()
    }
}
