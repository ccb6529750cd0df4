//! Cross-implementation reference vectors.
//!
//! A vector set pins a root seed and a list of quarter labels to the exact
//! epoch keys and lineage events every implementation must reproduce. This
//! module only models and computes the data; reading and writing the file is
//! left to the caller.

use crate::codec;
use crate::epoch::deterministic_created_at;
use crate::error::{IdentityError, Result};
use crate::keypair::RootSeed;
use crate::lineage::{build_lineage_event, LineageEvent, LINEAGE_KIND};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level vector file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorSet {
    pub spec_version: String,
    pub language: String,
    pub description: String,
    pub root: RootVector,
    pub epochs: Vec<EpochVector>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootVector {
    pub id: String,
    pub seed_hex: String,
    #[serde(default)]
    pub sk_hex: Option<String>,
    #[serde(default)]
    pub pk_hex: Option<String>,
    #[serde(default)]
    pub nsec: Option<String>,
    #[serde(default)]
    pub npub: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochVector {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub sk_hex: Option<String>,
    #[serde(default)]
    pub pk_hex: Option<String>,
    #[serde(default)]
    pub npub: Option<String>,
    #[serde(default)]
    pub lineage_event: Option<LineageEvent>,
}

/// A field whose recorded value differs from the recomputed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorMismatch {
    /// `root` or the epoch vector id.
    pub entry: String,
    pub field: &'static str,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for VectorMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}: recorded {} but computed {}",
            self.entry, self.field, self.expected, self.actual
        )
    }
}

impl VectorSet {
    /// Recompute every derived field from `root.seed_hex` and the epoch labels.
    ///
    /// Lineage events use the deterministic quarter timestamp, so every epoch
    /// label must be `YYYY-Qn`. Events are rewritten through [`LineageEvent`],
    /// so fields it does not model (such as `"id": null`) are dropped.
    pub fn populate(&mut self) -> Result<()> {
        let computed = self.compute()?;
        self.root = computed.root;
        self.epochs = computed.epochs;
        Ok(())
    }

    /// Recompute the set and list every recorded value that differs.
    ///
    /// A normative field (`sk_hex`, `pk_hex`, `lineage_event`) recorded as
    /// `null` is reported as a mismatch. The display-only `npub` and `nsec`
    /// are compared only when the file pins a value.
    pub fn verify(&self) -> Result<Vec<VectorMismatch>> {
        let computed = self.compute()?;
        let mut out = Vec::new();

        compare(&mut out, "root", "sk_hex", &self.root.sk_hex, &computed.root.sk_hex);
        compare(&mut out, "root", "pk_hex", &self.root.pk_hex, &computed.root.pk_hex);
        compare_pinned(&mut out, "root", "nsec", &self.root.nsec, &computed.root.nsec);
        compare_pinned(&mut out, "root", "npub", &self.root.npub, &computed.root.npub);

        for (recorded, fresh) in self.epochs.iter().zip(&computed.epochs) {
            let id = recorded.id.as_str();
            compare(&mut out, id, "sk_hex", &recorded.sk_hex, &fresh.sk_hex);
            compare(&mut out, id, "pk_hex", &recorded.pk_hex, &fresh.pk_hex);
            compare_pinned(&mut out, id, "npub", &recorded.npub, &fresh.npub);

            let render = |e: &Option<LineageEvent>| {
                e.as_ref()
                    .map(|e| serde_json::to_string(e).unwrap_or_default())
            };
            compare(
                &mut out,
                id,
                "lineage_event",
                &render(&recorded.lineage_event),
                &render(&fresh.lineage_event),
            );
        }
        Ok(out)
    }

    fn compute(&self) -> Result<VectorSet> {
        let seed = RootSeed::from_hex(&self.root.seed_hex)?;
        let root = seed.keypair();

        let epochs = self
            .epochs
            .iter()
            .map(|epoch| {
                let created_at = deterministic_created_at(&epoch.label)?;
                let keypair = seed.derive_epoch(&epoch.label);
                let event = build_lineage_event(
                    &root,
                    &keypair.public_key_bytes(),
                    &epoch.label,
                    LINEAGE_KIND,
                    Some(created_at),
                );
                Ok(EpochVector {
                    id: epoch.id.clone(),
                    label: epoch.label.clone(),
                    sk_hex: Some(keypair.seed_hex()),
                    pk_hex: Some(keypair.public_key_hex()),
                    npub: Some(keypair.npub()),
                    lineage_event: Some(event),
                })
            })
            .collect::<std::result::Result<Vec<_>, IdentityError>>()?;

        Ok(VectorSet {
            spec_version: self.spec_version.clone(),
            language: self.language.clone(),
            description: self.description.clone(),
            root: RootVector {
                id: self.root.id.clone(),
                seed_hex: self.root.seed_hex.clone(),
                sk_hex: Some(codec::encode_hex(seed.as_bytes())),
                pk_hex: Some(root.public_key_hex()),
                nsec: Some(root.nsec()),
                npub: Some(root.npub()),
            },
            epochs,
        })
    }
}

fn compare(
    out: &mut Vec<VectorMismatch>,
    entry: &str,
    field: &'static str,
    recorded: &Option<String>,
    computed: &Option<String>,
) {
    if recorded != computed {
        let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "null".to_string());
        out.push(VectorMismatch {
            entry: entry.to_string(),
            field,
            expected: show(recorded),
            actual: show(computed),
        });
    }
}

/// [`compare`] for display fields, where `null` means "not pinned".
fn compare_pinned(
    out: &mut Vec<VectorMismatch>,
    entry: &str,
    field: &'static str,
    recorded: &Option<String>,
    computed: &Option<String>,
) {
    if recorded.is_some() {
        compare(out, entry, field, recorded, computed);
    }
}
