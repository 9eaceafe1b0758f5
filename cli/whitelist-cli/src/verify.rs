use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

use whitelist_cli::output::ClaimOutput;
use whitelist_cli::{address_leaf, hex_encode, parse_address, parse_hash, verify_hex};

#[derive(Parser, Debug)]
#[command(name = "verify")]
#[command(about = "Check a whitelist membership proof against a Merkle root", long_about = None)]
pub struct Cli {
    /// Claim JSON produced by the `proof` command
    #[arg(short, long, conflicts_with_all = ["root", "address", "proof"])]
    claim: Option<PathBuf>,

    /// Merkle root (hex format)
    #[arg(short, long, required_unless_present = "claim")]
    root: Option<String>,

    /// Claiming address (hex format)
    #[arg(short, long, required_unless_present = "claim")]
    address: Option<String>,

    /// Proof node (hex format), repeated bottom-up
    #[arg(short, long)]
    proof: Vec<String>,
}

/// Returns whether the proof is accepted.
pub fn run(cli: &Cli) -> Result<bool> {
    let (root, address, proof) = match &cli.claim {
        Some(path) => {
            debug!("Reading claim from {:?}", path);
            let content = fs::read_to_string(path).context("Failed to read claim file")?;
            let claim: ClaimOutput =
                serde_json::from_str(&content).context("Failed to parse claim JSON")?;
            (claim.merkle_root, claim.address, claim.merkle_proof)
        }
        None => (
            cli.root.clone().context("Missing --root")?,
            cli.address.clone().context("Missing --address")?,
            cli.proof.clone(),
        ),
    };

    let root = parse_hash(&root).context("Invalid Merkle root")?;
    let address = parse_address(&address).context("Invalid address")?;
    let accepted =
        verify_hex(&root, &address_leaf(&address), &proof).context("Malformed proof")?;

    if accepted {
        println!("valid");
    } else {
        warn!("Proof does not reconstruct root {}", hex_encode(root));
        println!("invalid");
    }
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use whitelist_cli::{MerkleTree, ParticipantSet, WhitelistError};

    const A: &str = "0x1111111111111111111111111111111111111111";
    const B: &str = "0x2222222222222222222222222222222222222222";
    const C: &str = "0x3333333333333333333333333333333333333333";

    fn tree() -> MerkleTree {
        let addresses = [A, B, C].map(|a| parse_address(a).unwrap());
        MerkleTree::from_participants(&ParticipantSet::from_addresses(addresses.to_vec()))
    }

    fn flags_cli(root: &str, address: &str, proof: &[String]) -> Cli {
        let mut args = vec!["verify", "--root", root, "--address", address];
        for entry in proof {
            args.push("--proof");
            args.push(entry);
        }
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_run_on_claim_file() {
        let tree = tree();
        let claim = ClaimOutput::new(&tree, &parse_address(B).unwrap()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("claim.json");
        fs::write(&path, serde_json::to_string_pretty(&claim).unwrap()).unwrap();

        let cli = Cli::try_parse_from(["verify", "--claim", path.to_str().unwrap()]).unwrap();
        assert!(run(&cli).unwrap());
    }

    #[test]
    fn test_run_on_flags() {
        let tree = tree();
        let proof = tree
            .proof_for_address(&parse_address(C).unwrap())
            .unwrap()
            .to_hex();
        let cli = flags_cli(&tree.root_hex(), C, &proof);
        assert!(run(&cli).unwrap());
    }

    #[test]
    fn test_run_rejects_tampered_proof() {
        let tree = tree();
        let mut siblings = tree
            .proof_for_address(&parse_address(B).unwrap())
            .unwrap()
            .siblings;
        siblings[0][31] ^= 0x01;
        let proof: Vec<String> = siblings.iter().map(hex_encode).collect();

        let cli = flags_cli(&tree.root_hex(), B, &proof);
        assert!(!run(&cli).unwrap());
    }

    #[test]
    fn test_run_rejects_other_address() {
        let tree = tree();
        let proof = tree
            .proof_for_address(&parse_address(B).unwrap())
            .unwrap()
            .to_hex();
        let cli = flags_cli(&tree.root_hex(), A, &proof);
        assert!(!run(&cli).unwrap());
    }

    #[test]
    fn test_run_odd_length_entry_is_malformed() {
        let tree = tree();
        let cli = flags_cli(&tree.root_hex(), A, &["0xabc".to_string()]);
        let err = run(&cli).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WhitelistError>(),
            Some(WhitelistError::MalformedProof { index: 0, .. })
        ));
    }

    #[test]
    fn test_claim_conflicts_with_flags() {
        let root = format!("0x{}", "00".repeat(32));
        for extra in [["--root", root.as_str()], ["--address", A], ["--proof", "0x00"]] {
            let mut args = vec!["verify", "--claim", "claim.json"];
            args.extend(extra);
            let err = Cli::try_parse_from(args).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
        }
    }

    #[test]
    fn test_flags_required_without_claim() {
        let err = Cli::try_parse_from(["verify", "--address", A]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
