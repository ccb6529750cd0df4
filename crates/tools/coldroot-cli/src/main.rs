use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use coldroot_identity::{
    build_lineage_event, check_lineage_value, deterministic_created_at, generate_root_seed,
    RootSeed, VectorSet, LINEAGE_KIND, ROOT_TAG,
};
use colored::Colorize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, EnvFilter};

mod config;

use config::CliConfig;

/// Cold root identity / epoch key CLI
///
/// Root operations must run offline.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// Optional TOML configuration file
    #[clap(long, short, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to execute
    #[clap(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Generate a new cold root seed
    Init,

    /// Derive an epoch key and lineage event from a cold root seed
    DeriveEpoch {
        /// 32-byte root seed in hex (64 chars). RUN OFFLINE.
        #[clap(long)]
        root_seed_hex: String,

        /// Epoch label, e.g. 2025-Q1
        #[clap(long)]
        label: String,

        /// Event kind for the lineage event (default: 30001)
        #[clap(long)]
        kind: Option<u32>,

        /// Explicit created_at in Unix seconds
        #[clap(long, conflicts_with = "deterministic")]
        created_at: Option<i64>,

        /// Use the start of the label's quarter as created_at (label must be YYYY-Qn)
        #[clap(long)]
        deterministic: bool,
    },

    /// Verify a lineage event JSON file
    VerifyLineage {
        /// Path to the lineage event JSON
        event_file: PathBuf,

        /// Root pubkey hex to verify against; without it the event's own root tag is used
        #[clap(long)]
        root_pubkey_hex: Option<String>,
    },

    /// Check a reference vector file, or rewrite it with --write
    Vectors {
        /// Vector file (defaults to `vectors_path` from the config)
        file: Option<PathBuf>,

        /// Recompute every derived field and write the file back
        #[clap(long)]
        write: bool,
    },
}

fn init_tracing(config: &CliConfig) {
    let log_level_str = config.log_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level_str))
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Generate and print a new root seed
fn init_root() -> Result<()> {
    let seed = generate_root_seed();
    let root = seed.keypair();
    info!(root = %root.public_key_hex(), "generated root seed");

    println!("{}", "=== Cold Root Seed (STORE OFFLINE, NEVER ONLINE) ===".red().bold());
    println!("{}", seed.to_hex());
    println!();
    println!("Root public key (for reference only, can be shared):");
    println!("{}", root.public_key_hex());
    println!();
    println!("Root npub (optional, do not use for posting):");
    println!("{}", root.npub());
    println!();
    println!("Write the seed hex down on paper and delete this output if saved.");
    Ok(())
}

/// Derive an epoch keypair and print it with its lineage event
fn derive_epoch(
    root_seed_hex: &str,
    label: &str,
    kind: u32,
    created_at: Option<i64>,
    deterministic: bool,
) -> Result<()> {
    let seed = RootSeed::from_hex(root_seed_hex.trim()).context("Invalid --root-seed-hex")?;
    let root = seed.keypair();
    let epoch = seed.derive_epoch(label);

    let created_at = if deterministic {
        Some(deterministic_created_at(label).context("--deterministic needs a YYYY-Qn label")?)
    } else {
        created_at
    };
    let event = build_lineage_event(&root, &epoch.public_key_bytes(), label, kind, created_at);
    info!(label, kind, epoch = %epoch.public_key_hex(), "derived epoch key");

    println!("{}", "=== Derived Epoch Key ===".blue().bold());
    println!("Label: {}", label);
    println!("Epoch pubkey (hex): {}", epoch.public_key_hex());
    println!("Epoch npub: {}", epoch.npub());
    println!();
    println!("{}", "Epoch nsec (IMPORT THIS INTO YOUR CLIENT):".yellow());
    println!("{}", epoch.nsec());
    println!();
    println!("{}", "=== Lineage Event JSON (publish from the epoch key) ===".blue().bold());
    println!("{}", serde_json::to_string_pretty(&event)?);
    Ok(())
}

/// Choose the root to verify against.
///
/// Returns the root hex and whether it came from the event itself. A root
/// taken from the event only proves the event is self-consistent. With
/// repeated `root` tags the first one is trusted, so an event whose tags
/// disagree fails the root check.
fn resolve_root(explicit: Option<&str>, event: &Value) -> Result<(String, bool)> {
    if let Some(root) = explicit {
        return Ok((root.trim().to_string(), false));
    }
    first_root_tag(event)
        .map(|root| (root.to_string(), true))
        .ok_or_else(|| anyhow!("Could not determine root pubkey (no --root-pubkey-hex and no root tag)."))
}

fn first_root_tag(event: &Value) -> Option<&str> {
    event
        .get("tags")?
        .as_array()?
        .iter()
        .find_map(|tag| match tag.as_array()?.as_slice() {
            [name, value, ..] if name.as_str() == Some(ROOT_TAG) => value.as_str(),
            _ => None,
        })
}

/// Verify a lineage event file; returns whether it is valid
fn verify_lineage_file(event_file: &Path, root_pubkey_hex: Option<&str>) -> Result<bool> {
    let json_str = fs::read_to_string(event_file)
        .with_context(|| format!("Failed to read lineage event file '{}'", event_file.display()))?;
    let event: Value = serde_json::from_str(&json_str)
        .with_context(|| format!("Failed to parse lineage event JSON in '{}'", event_file.display()))?;

    let (root, self_asserted) = resolve_root(root_pubkey_hex, &event)?;
    if self_asserted {
        warn!(root = %root, "no --root-pubkey-hex given; trusting the root named by the event itself");
    }

    match check_lineage_value(&root, &event) {
        Ok(()) => {
            println!("{}", "VALID lineage event.".green().bold());
            println!("Root pubkey:  {}", root);
            println!(
                "Epoch pubkey: {}",
                event.get("pubkey").and_then(Value::as_str).unwrap_or_default()
            );
            Ok(true)
        }
        Err(reason) => {
            eprintln!("{}", "INVALID lineage event.".red().bold());
            eprintln!("Reason: {}", reason);
            Ok(false)
        }
    }
}

/// Check or rewrite a vector file; returns whether it is consistent
fn run_vectors(path: &Path, write: bool) -> Result<bool> {
    let json_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read vector file '{}'", path.display()))?;
    let mut vectors: VectorSet = serde_json::from_str(&json_str)
        .with_context(|| format!("Failed to parse vector file '{}'", path.display()))?;

    if write {
        vectors
            .populate()
            .with_context(|| format!("Failed to compute vectors for '{}'", path.display()))?;
        let mut out = serde_json::to_string_pretty(&vectors)?;
        out.push('\n');
        fs::write(path, out).with_context(|| format!("Failed to write vector file '{}'", path.display()))?;
        println!("Updated vectors written to {}", path.display());
        return Ok(true);
    }

    let mismatches = vectors
        .verify()
        .with_context(|| format!("Failed to compute vectors for '{}'", path.display()))?;
    if mismatches.is_empty() {
        println!(
            "{} {} epoch vector(s) in {}",
            "OK".green().bold(),
            vectors.epochs.len(),
            path.display()
        );
        return Ok(true);
    }
    for mismatch in &mismatches {
        eprintln!("{} {}", "MISMATCH".red().bold(), mismatch);
    }
    Ok(false)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;
    init_tracing(&config);

    let ok = match &cli.command {
        Commands::Init => {
            init_root()?;
            true
        }
        Commands::DeriveEpoch {
            root_seed_hex,
            label,
            kind,
            created_at,
            deterministic,
        } => {
            let kind = kind.or(config.default_kind).unwrap_or(LINEAGE_KIND);
            derive_epoch(root_seed_hex, label, kind, *created_at, *deterministic)?;
            true
        }
        Commands::VerifyLineage {
            event_file,
            root_pubkey_hex,
        } => verify_lineage_file(event_file, root_pubkey_hex.as_deref())?,
        Commands::Vectors { file, write } => {
            let path = file
                .clone()
                .or_else(|| config.vectors_path.clone())
                .ok_or_else(|| anyhow!("No vector file given and no vectors_path in the config"))?;
            run_vectors(&path, *write)?
        }
    };

    if !ok {
        process::exit(1);
    }
    Ok(())
}
