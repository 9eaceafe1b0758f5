#![forbid(unsafe_code)]
#![allow(unreachable_pub)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use whitelist_cli::logging::{self, LogLevel};
use whitelist_cli::{MerkleTree, ParticipantSet, DEFAULT_WHITELIST_PATH};

mod proof;
mod root;
mod table;
mod verify;

#[derive(Parser, Debug)]
#[command(name = "whitelist")]
#[command(about = "Whitelist sale Merkle commitment tools", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging and tree rendering
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the tree and print its root
    Root(root::Cli),
    /// Generate the membership proof for one address
    Proof(proof::Cli),
    /// Precompute proofs for every whitelisted address
    Table(table::Cli),
    /// Check a membership proof against a root
    Verify(verify::Cli),
}

/// Location of the whitelist JSON file.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// JSON array of whitelisted addresses
    #[arg(short, long, env = "WHITELIST_PATH", default_value = DEFAULT_WHITELIST_PATH)]
    pub input: PathBuf,
}

impl InputArgs {
    /// Reads the whitelist and commits to it.
    pub fn load_tree(&self) -> anyhow::Result<(ParticipantSet, MerkleTree)> {
        debug!("Reading whitelist from {:?}", self.input);
        let participants =
            ParticipantSet::load(&self.input).context("Failed to load whitelist")?;
        info!("{} addresses in whitelist", participants.len());

        let tree = MerkleTree::from_participants(&participants);
        debug!(
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            "Built Merkle tree"
        );
        Ok((participants, tree))
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    logging::try_init(LogLevel::from_verbose(cli.verbose))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let accepted = match cli.command {
        Commands::Root(args) => root::run(args, cli.verbose).map(|()| true)?,
        Commands::Proof(args) => proof::run(args).map(|()| true)?,
        Commands::Table(args) => table::run(args).map(|()| true)?,
        Commands::Verify(args) => verify::run(&args)?,
    };

    Ok(if accepted {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
