//! # Generate Subcommand
//!
//! Writes a deterministic mock dataset to disk, or to stdout when `--out`
//! is omitted.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use evd_mock::MockConfig;

/// Arguments for `evd generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Number of records.
    #[arg(long, default_value_t = evd_mock::DEFAULT_COUNT)]
    pub count: usize,

    /// RNG seed. The same seed always yields the same dataset.
    #[arg(long, default_value_t = evd_mock::DEFAULT_SEED)]
    pub seed: u64,

    /// Output file. Prints JSON to stdout if omitted.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

pub fn run_generate(args: &GenerateArgs) -> Result<u8> {
    let config = MockConfig {
        count: args.count,
        seed: args.seed,
        ..MockConfig::default()
    };
    let items = evd_mock::generate(&config);
    tracing::info!(count = items.len(), seed = args.seed, "mock dataset generated");

    match &args.out {
        Some(path) => {
            crate::save_dataset(path, &items)?;
            println!("Wrote {} records to {}", items.len(), path.display());
        }
        None => {
            let json =
                serde_json::to_string_pretty(&items).context("failed to serialize dataset")?;
            println!("{json}");
        }
    }
    Ok(0)
}
