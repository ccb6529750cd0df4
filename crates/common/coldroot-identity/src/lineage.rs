//! Lineage events: a root's signed statement that an epoch key speaks for it.

use crate::codec;
use crate::keypair::{Keypair, PUBLIC_KEY_LENGTH};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event kind identifying a lineage event.
pub const LINEAGE_KIND: u32 = 30001;

pub const ROOT_TAG: &str = "root";
pub const SIG_TAG: &str = "sig";
pub const EPOCH_TAG: &str = "epoch";

/// Source of `created_at` when the caller does not pin one.
pub trait Clock {
    /// Current Unix time in whole seconds.
    fn now_unix(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_unix(&self) -> i64 {
        self.0
    }
}

/// Attestation binding an epoch public key to a root identity.
///
/// Serializes as
/// `{"kind","pubkey","created_at","tags":[["root",..],["sig",..],["epoch",..]],"content":""}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageEvent {
    pub kind: u32,
    /// Hex epoch public key; the subject of the event.
    pub pubkey: String,
    pub created_at: i64,
    pub tags: Vec<Vec<String>>,
    pub content: String,
}

impl LineageEvent {
    /// The `root`, `sig` and `epoch` tag values.
    pub fn lineage_tags(&self) -> LineageTags<'_> {
        LineageTags::from_pairs(self.tags.iter().filter_map(|tag| match tag.as_slice() {
            [name, value, ..] => Some((name.as_str(), value.as_str())),
            _ => None,
        }))
    }

    /// The root public key the event claims for itself. Not a trust anchor.
    pub fn root_tag(&self) -> Option<&str> {
        self.lineage_tags().root
    }

    pub fn epoch_label(&self) -> Option<&str> {
        self.lineage_tags().epoch
    }
}

/// Values of the lineage tags found in an event.
///
/// Tags shorter than two elements, or whose first two elements are not
/// strings, are ignored. A repeated tag name keeps its last value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineageTags<'a> {
    pub root: Option<&'a str>,
    pub sig: Option<&'a str>,
    pub epoch: Option<&'a str>,
}

impl<'a> LineageTags<'a> {
    fn from_pairs(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> Self {
        let mut tags = Self::default();
        for (name, value) in pairs {
            match name {
                ROOT_TAG => tags.root = Some(value),
                SIG_TAG => tags.sig = Some(value),
                EPOCH_TAG => tags.epoch = Some(value),
                _ => {}
            }
        }
        tags
    }

    /// Extract tags from an untyped event document.
    pub fn from_value(event: &'a Value) -> Self {
        let pairs = event
            .get("tags")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|tag| {
                let tag = tag.as_array()?;
                match tag.as_slice() {
                    [name, value, ..] => Some((name.as_str()?, value.as_str()?)),
                    _ => None,
                }
            });
        Self::from_pairs(pairs)
    }
}

/// Build a lineage event signed by `root`.
///
/// The signed message is exactly the 32 raw bytes of `epoch_public_key`.
/// When `created_at` is `None` the current wall-clock time is used.
pub fn build_lineage_event(
    root: &Keypair,
    epoch_public_key: &[u8; PUBLIC_KEY_LENGTH],
    label: &str,
    kind: u32,
    created_at: Option<i64>,
) -> LineageEvent {
    build_lineage_event_with_clock(root, epoch_public_key, label, kind, created_at, &SystemClock)
}

/// [`build_lineage_event`] reading time from `clock` when `created_at` is `None`.
pub fn build_lineage_event_with_clock(
    root: &Keypair,
    epoch_public_key: &[u8; PUBLIC_KEY_LENGTH],
    label: &str,
    kind: u32,
    created_at: Option<i64>,
    clock: &impl Clock,
) -> LineageEvent {
    let sig = root.sign(epoch_public_key);

    LineageEvent {
        kind,
        pubkey: codec::encode_hex(epoch_public_key),
        created_at: created_at.unwrap_or_else(|| clock.now_unix()),
        tags: vec![
            vec![ROOT_TAG.to_string(), root.public_key_hex()],
            vec![SIG_TAG.to_string(), codec::encode_hex(sig.to_bytes())],
            vec![EPOCH_TAG.to_string(), label.to_string()],
        ],
        content: String::new(),
    }
}
