use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use whitelist_cli::output::ProofTable;
use whitelist_cli::write_file_atomic;

use crate::InputArgs;

#[derive(Parser, Debug)]
#[command(name = "table")]
#[command(about = "Precompute proofs for every whitelisted address", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    input: InputArgs,

    /// Output JSON file for the proof table
    #[arg(short, long)]
    output: PathBuf,
}

pub fn run(cli: Cli) -> Result<()> {
    let (participants, tree) = cli.input.load_tree()?;

    let table = ProofTable::new(&tree, &participants).context("Failed to build proof table")?;
    if table.entries.len() < participants.len() {
        info!(
            "{} duplicate addresses share the proof of their first occurrence",
            participants.len() - table.entries.len()
        );
    }

    info!("Writing proof table to {:?}...", cli.output);
    let json = serde_json::to_string_pretty(&table).context("Failed to serialize proof table")?;
    write_file_atomic(&cli.output, &json).context("Failed to write proof table")?;

    println!("Merkle root: {}", table.merkle_root);
    println!("Proofs written: {}", table.entries.len());
    Ok(())
}
