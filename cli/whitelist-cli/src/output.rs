//! JSON documents handed to the contract administration and claim tooling.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::common::hex_encode;
use crate::error::Result;
use crate::merkle::{address_leaf, Address, MerkleTree};
use crate::participants::ParticipantSet;

/// The commitment passed to `startWhitelistMint`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootOutput {
    pub root: String,
    pub root_bytes: Vec<u8>,
    pub leaf_count: usize,
}

impl RootOutput {
    pub fn new(tree: &MerkleTree) -> Self {
        Self {
            root: tree.root_hex(),
            root_bytes: tree.root().to_vec(),
            leaf_count: tree.leaf_count(),
        }
    }
}

/// Everything a participant submits to claim a whitelist mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimOutput {
    pub merkle_root: String,
    pub address: String,
    pub leaf: String,
    pub leaf_index: usize,
    pub merkle_proof: Vec<String>,
}

impl ClaimOutput {
    /// Builds the claim for `address`, proven at its first position.
    pub fn new(tree: &MerkleTree, address: &Address) -> Result<Self> {
        let proof = tree.proof_for_address(address)?;
        Ok(Self {
            merkle_root: tree.root_hex(),
            address: hex_encode(address),
            leaf: hex_encode(address_leaf(address)),
            leaf_index: proof.leaf_index,
            merkle_proof: proof.to_hex(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofTableEntry {
    pub address: String,
    pub leaf_index: usize,
    pub merkle_proof: Vec<String>,
}

/// Precomputed proofs for every distinct whitelisted address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofTable {
    pub merkle_root: String,
    pub leaf_count: usize,
    pub entries: Vec<ProofTableEntry>,
}

impl ProofTable {
    /// One entry per distinct address, in whitelist order; repeated
    /// addresses reuse the proof of their first position.
    pub fn new(tree: &MerkleTree, participants: &ParticipantSet) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(participants.len());

        for address in participants.iter().filter(|a| seen.insert(**a)) {
            let proof = tree.proof_for_address(address)?;
            entries.push(ProofTableEntry {
                address: hex_encode(address),
                leaf_index: proof.leaf_index,
                merkle_proof: proof.to_hex(),
            });
        }

        Ok(Self {
            merkle_root: tree.root_hex(),
            leaf_count: tree.leaf_count(),
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::parse_hash;
    use crate::error::WhitelistError;
    use crate::merkle::verify_proof;

    fn participants() -> ParticipantSet {
        ParticipantSet::from_addresses(vec![[1u8; 20], [2u8; 20], [1u8; 20], [3u8; 20]])
    }

    #[test]
    fn test_root_output() {
        let tree = MerkleTree::from_participants(&participants());
        let out = RootOutput::new(&tree);
        assert_eq!(out.root_bytes, tree.root().to_vec());
        assert_eq!(out.root, hex_encode(tree.root()));
        assert_eq!(out.leaf_count, 4);
    }

    #[test]
    fn test_claim_output_round_trips_through_json() {
        let tree = MerkleTree::from_participants(&participants());
        let claim = ClaimOutput::new(&tree, &[3u8; 20]).unwrap();
        assert_eq!(claim.leaf_index, 3);

        let json = serde_json::to_string_pretty(&claim).unwrap();
        let parsed: ClaimOutput = serde_json::from_str(&json).unwrap();
        let root = parse_hash(&parsed.merkle_root).unwrap();
        let proof = parsed
            .merkle_proof
            .iter()
            .map(|entry| parse_hash(entry).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(root, tree.root());
        assert!(verify_proof(&root, &address_leaf(&[3u8; 20]), &proof));
    }

    #[test]
    fn test_claim_output_unknown_address() {
        let tree = MerkleTree::from_participants(&participants());
        assert!(matches!(
            ClaimOutput::new(&tree, &[9u8; 20]),
            Err(WhitelistError::LeafNotFound(_))
        ));
    }

    #[test]
    fn test_proof_table_dedupes() {
        let set = participants();
        let tree = MerkleTree::from_participants(&set);
        let table = ProofTable::new(&tree, &set).unwrap();

        assert_eq!(table.leaf_count, 4);
        assert_eq!(table.entries.len(), 3);
        let indices: Vec<usize> = table.entries.iter().map(|e| e.leaf_index).collect();
        assert_eq!(indices, vec![0, 1, 3]);
    }
}
