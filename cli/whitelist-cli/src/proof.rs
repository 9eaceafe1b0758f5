use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use whitelist_cli::output::ClaimOutput;
use whitelist_cli::{parse_address, write_file_atomic};

use crate::InputArgs;

#[derive(Parser, Debug)]
#[command(name = "proof")]
#[command(about = "Generate the whitelist membership proof for an address", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    input: InputArgs,

    /// Whitelisted address (hex, with or without 0x prefix)
    #[arg(short, long)]
    address: String,

    /// Output JSON file; printed to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(cli: Cli) -> Result<()> {
    let address = parse_address(&cli.address).context("Invalid address")?;
    let (_, tree) = cli.input.load_tree()?;

    let claim = ClaimOutput::new(&tree, &address).context("Address is not whitelisted")?;
    let json = serde_json::to_string_pretty(&claim).context("Failed to serialize JSON")?;

    match cli.output {
        Some(path) => {
            info!("Writing claim JSON to {:?}", path);
            write_file_atomic(&path, &json).context("Failed to write claim file")?;
            info!(
                leaf_index = claim.leaf_index,
                proof_len = claim.merkle_proof.len(),
                "Claim generated"
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
