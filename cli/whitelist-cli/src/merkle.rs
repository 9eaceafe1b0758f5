//! Sorted-pair Keccak256 Merkle tree over whitelisted addresses.
//!
//! Leaf formula: `keccak256(address)` over the raw 20 address bytes.
//! Internal nodes: `keccak256(min(a, b) || max(a, b))`, so a verifier only
//! needs sibling hashes and never left/right positions.
//! A layer with an odd node count carries its last node up unchanged; the
//! node is never hashed with itself. An empty tree has the zero hash as root.
//!
//! These rules MUST match the minter contract's whitelist check, which folds
//! a proof with the same sorted-pair hash against the committed root.

use std::fmt;

use sha3::{Digest, Keccak256};

use crate::common::{decode_hex, hex_encode, keccak256};
use crate::error::{Result, WhitelistError};
use crate::participants::ParticipantSet;

/// A 32-byte Keccak256 digest: a leaf, an internal node or the root.
pub type Hash = [u8; 32];

/// A 20-byte Ethereum address.
pub type Address = [u8; 20];

/// Root committed for a tree without leaves.
pub const EMPTY_ROOT: Hash = [0u8; 32];

/// Converts a 20-byte Ethereum address to its Merkle leaf.
pub fn address_leaf(address: &Address) -> Hash {
    keccak256(address)
}

/// Converts a raw identifier to its Merkle leaf.
///
/// # Errors
/// Returns `InvalidIdentifier` unless `identifier` is exactly 20 bytes.
pub fn encode_leaf(identifier: &[u8]) -> Result<Hash> {
    let address: &Address = identifier.try_into().map_err(|_| {
        WhitelistError::InvalidIdentifier(format!(
            "expected 20 bytes, got {}",
            identifier.len()
        ))
    })?;
    Ok(address_leaf(address))
}

/// Hashes two nodes with the smaller one first.
pub fn hash_pair(a: &Hash, b: &Hash) -> Hash {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    Keccak256::new()
        .chain_update(first)
        .chain_update(second)
        .finalize()
        .into()
}

/// Sibling hashes from the leaf level up to the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleProof {
    /// Position of the proven leaf in the leaf layer.
    pub leaf_index: usize,
    /// Siblings, bottom-up. Levels where the node was carried have no entry.
    pub siblings: Vec<Hash>,
}

impl MerkleProof {
    /// Checks this proof for `leaf` against `root`.
    pub fn verify(&self, root: &Hash, leaf: &Hash) -> bool {
        verify_proof(root, leaf, &self.siblings)
    }

    /// Siblings as `0x`-prefixed hex strings, the form the minter contract accepts.
    pub fn to_hex(&self) -> Vec<String> {
        self.siblings.iter().map(hex_encode).collect()
    }

    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }
}

/// A binary Merkle tree stored level by level, bottom-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    /// `layers[0]` holds the leaves, the last layer holds the root.
    /// Empty when built from no leaves.
    layers: Vec<Vec<Hash>>,
}

impl MerkleTree {
    /// Build a tree from the whitelisted addresses, in order.
    pub fn from_participants(participants: &ParticipantSet) -> Self {
        Self::from_leaves(participants.iter().map(address_leaf).collect())
    }

    /// Build a tree from pre-hashed leaves.
    pub fn from_leaves(leaves: Vec<Hash>) -> Self {
        if leaves.is_empty() {
            return Self { layers: Vec::new() };
        }

        let mut layers = vec![leaves];
        while let Some(level) = layers.last().filter(|level| level.len() > 1) {
            let next_level = level
                .chunks(2)
                .map(|chunk| match chunk {
                    [left, right] => hash_pair(left, right),
                    [carried] => *carried,
                    _ => unreachable!("chunks(2) yields one or two nodes"),
                })
                .collect();
            layers.push(next_level);
        }

        Self { layers }
    }

    /// The committed root, or [`EMPTY_ROOT`] for an empty tree.
    pub fn root(&self) -> Hash {
        self.layers
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or(EMPTY_ROOT)
    }

    pub fn root_hex(&self) -> String {
        hex_encode(self.root())
    }

    pub fn leaves(&self) -> &[Hash] {
        self.layers.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Number of hashing levels above the leaves.
    pub fn depth(&self) -> usize {
        self.layers.len().saturating_sub(1)
    }

    pub fn layers(&self) -> &[Vec<Hash>] {
        &self.layers
    }

    /// First position of `leaf` in the leaf layer.
    pub fn position(&self, leaf: &Hash) -> Option<usize> {
        self.leaves().iter().position(|candidate| candidate == leaf)
    }

    /// Generate a proof for `leaf`.
    ///
    /// A leaf committed more than once is proven at its first position.
    ///
    /// # Errors
    /// Returns `LeafNotFound` if `leaf` is not in the leaf layer.
    pub fn proof(&self, leaf: &Hash) -> Result<MerkleProof> {
        let index = self
            .position(leaf)
            .ok_or(WhitelistError::LeafNotFound(*leaf))?;
        self.proof_at(index)
    }

    /// Generate a proof for `address`, see [`MerkleTree::proof`].
    pub fn proof_for_address(&self, address: &Address) -> Result<MerkleProof> {
        self.proof(&address_leaf(address))
    }

    /// Generate a proof for the leaf at `leaf_index`.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` if the index is past the last leaf.
    pub fn proof_at(&self, leaf_index: usize) -> Result<MerkleProof> {
        if leaf_index >= self.leaf_count() {
            return Err(WhitelistError::IndexOutOfRange {
                index: leaf_index,
                leaf_count: self.leaf_count(),
            });
        }

        let mut siblings = Vec::with_capacity(self.depth());
        let mut index = leaf_index;

        for level in &self.layers[..self.depth()] {
            let sibling_index = if index.is_multiple_of(2) {
                index + 1
            } else {
                index - 1
            };
            // The carried odd node has no sibling at this level.
            if let Some(sibling) = level.get(sibling_index) {
                siblings.push(*sibling);
            }
            index /= 2;
        }

        Ok(MerkleProof {
            leaf_index,
            siblings,
        })
    }
}

/// Renders the tree top-down, one node per line, indented by level.
impl fmt::Display for MerkleTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.layers.is_empty() {
            return writeln!(f, "└─ {} (empty)", hex_encode(EMPTY_ROOT));
        }
        self.render_node(f, self.depth(), 0, "", true)
    }
}

impl MerkleTree {
    fn render_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        level: usize,
        index: usize,
        prefix: &str,
        last: bool,
    ) -> fmt::Result {
        let branch = if last { "└─ " } else { "├─ " };
        writeln!(
            f,
            "{}{}{}",
            prefix,
            branch,
            hex_encode(self.layers[level][index])
        )?;
        if level == 0 {
            return Ok(());
        }

        let child_prefix = format!("{}{}", prefix, if last { "   " } else { "│  " });
        let below = &self.layers[level - 1];
        let left = index * 2;
        let children: Vec<usize> = [left, left + 1]
            .into_iter()
            .filter(|&i| i < below.len())
            .collect();
        for (n, &child) in children.iter().enumerate() {
            self.render_node(f, level - 1, child, &child_prefix, n + 1 == children.len())?;
        }
        Ok(())
    }
}

/// Recomputes the root from `leaf` and `siblings` and compares it with `root`.
pub fn verify_proof(root: &Hash, leaf: &Hash, siblings: &[Hash]) -> bool {
    siblings
        .iter()
        .fold(*leaf, |acc, sibling| hash_pair(&acc, sibling))
        == *root
}

/// Like [`verify_proof`], for proof entries of unchecked width.
///
/// # Errors
/// Returns `MalformedProof` if any entry is not exactly 32 bytes.
pub fn verify<P: AsRef<[u8]>>(root: &Hash, leaf: &Hash, proof: &[P]) -> Result<bool> {
    let siblings = proof
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let entry = entry.as_ref();
            Hash::try_from(entry).map_err(|_| WhitelistError::MalformedProof {
                index,
                reason: format!("is {} bytes, expected 32", entry.len()),
            })
        })
        .collect::<Result<Vec<Hash>>>()?;
    Ok(verify_proof(root, leaf, &siblings))
}

/// Like [`verify`], for hex-encoded proof entries as submitted by claimants.
///
/// # Errors
/// Returns `MalformedProof` if any entry is not hex or not exactly 32 bytes.
pub fn verify_hex<S: AsRef<str>>(root: &Hash, leaf: &Hash, proof: &[S]) -> Result<bool> {
    let entries = proof
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            decode_hex(entry.as_ref()).map_err(|e| WhitelistError::MalformedProof {
                index,
                reason: format!("is not a hex hash ({})", e),
            })
        })
        .collect::<Result<Vec<Vec<u8>>>>()?;
    verify(root, leaf, &entries)
}
