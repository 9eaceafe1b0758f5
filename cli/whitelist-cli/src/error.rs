//! Error type shared by the commitment tree, the proof verifier and the
//! participant loader.

use std::path::PathBuf;

use crate::merkle::Hash;

/// Errors raised while building, proving or verifying whitelist membership.
///
/// Every variant is terminal for the operation that produced it; nothing in
/// this crate retries.
#[derive(Debug, thiserror::Error)]
pub enum WhitelistError {
    /// An identifier could not be turned into a 20-byte address.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A proof was requested for a leaf that is not committed in the tree.
    #[error("Leaf 0x{} not found in tree", hex::encode(.0))]
    LeafNotFound(Hash),

    /// A positional proof was requested past the end of the leaf layer.
    #[error("Leaf index {index} is out of bounds for tree with {leaf_count} leaves")]
    IndexOutOfRange { index: usize, leaf_count: usize },

    /// A proof entry is not a 32-byte hash.
    #[error("Malformed proof: entry {index} {reason}")]
    MalformedProof { index: usize, reason: String },

    /// A hex string that should encode a 32-byte hash does not.
    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    /// The participant file is missing, unreadable or not a JSON array of strings.
    #[error("Failed to read participant set from {path:?}: {reason}")]
    InputReadFailure { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, WhitelistError>;
