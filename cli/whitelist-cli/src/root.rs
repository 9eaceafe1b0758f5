use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

use whitelist_cli::output::RootOutput;
use whitelist_cli::{write_file_atomic, MerkleTree, ParticipantSet};

use crate::InputArgs;

#[derive(Parser, Debug)]
#[command(name = "root")]
#[command(about = "Build the whitelist Merkle tree and print its root", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    input: InputArgs,

    /// Output file for the hex root
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the root as JSON instead of text
    #[arg(long)]
    json: bool,
}

/// Proves and verifies the first whitelisted address, so a broken tree is
/// caught before its root is published.
fn self_check(participants: &ParticipantSet, tree: &MerkleTree) -> Result<()> {
    let Some(first) = participants.iter().next() else {
        debug!("Whitelist is empty, skipping self-check");
        return Ok(());
    };

    let proof = tree
        .proof_for_address(first)
        .context("Failed to prove first whitelisted address")?;
    let leaf = whitelist_cli::address_leaf(first);
    if !proof.verify(&tree.root(), &leaf) {
        anyhow::bail!("Self-check failed: proof for the first address does not verify");
    }
    debug!(proof_len = proof.len(), "Self-check passed");
    Ok(())
}

#[cfg(test)]
impl Cli {
    pub fn input_path(&self) -> &std::path::Path {
        &self.input.input
    }
}

pub fn run(cli: Cli, verbose: bool) -> Result<()> {
    let (participants, tree) = cli.input.load_tree()?;
    self_check(&participants, &tree)?;

    if verbose {
        println!("Whitelist Merkle Tree\n{}", tree);
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&RootOutput::new(&tree))
            .context("Failed to serialize root")?;
        println!("{}", json);
    } else {
        println!("Root hash bytes: {:?}", tree.root());
        println!("Root hash hex: {}", tree.root_hex());
    }

    if let Some(path) = cli.output {
        info!("Writing Merkle root to {:?}", path);
        write_file_atomic(&path, &format!("{}\n", tree.root_hex()))
            .context("Failed to write root file")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use whitelist_cli::parse_address;

    const WHITELIST: &str = r#"[
        "0x1111111111111111111111111111111111111111",
        "0x2222222222222222222222222222222222222222",
        "0x3333333333333333333333333333333333333333"
    ]"#;

    #[test]
    fn test_run_writes_hex_root() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("whitelist.json");
        let output = dir.path().join("root.txt");
        std::fs::write(&input, WHITELIST).unwrap();

        let cli = Cli::try_parse_from([
            "root",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .unwrap();
        run(cli, false).unwrap();

        let participants = ParticipantSet::load(&input).unwrap();
        let expected = MerkleTree::from_participants(&participants).root_hex();
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            format!("{}\n", expected)
        );
    }

    #[test]
    fn test_run_missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("missing.json");
        let cli = Cli::try_parse_from(["root", "--input", input.to_str().unwrap()]).unwrap();
        assert!(run(cli, false).is_err());
    }

    #[test]
    fn test_self_check_passes_for_matching_tree() {
        let participants = ParticipantSet::from_addresses(vec![[1u8; 20], [2u8; 20]]);
        let tree = MerkleTree::from_participants(&participants);
        self_check(&participants, &tree).unwrap();
    }

    #[test]
    fn test_self_check_skips_empty_whitelist() {
        let participants = ParticipantSet::default();
        self_check(&participants, &MerkleTree::from_participants(&participants)).unwrap();
    }

    #[test]
    fn test_self_check_fails_when_first_address_is_not_committed() {
        let participants = ParticipantSet::from_addresses(vec![
            parse_address("0x1111111111111111111111111111111111111111").unwrap(),
        ]);
        let other = MerkleTree::from_participants(&ParticipantSet::from_addresses(vec![
            [2u8; 20], [3u8; 20],
        ]));
        assert!(self_check(&participants, &other).is_err());
    }
}
