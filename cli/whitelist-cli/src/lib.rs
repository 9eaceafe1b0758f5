pub mod common;
pub mod error;
pub mod logging;
pub mod merkle;
pub mod output;
pub mod participants;

pub use common::{decode_hex, hex_encode, keccak256, parse_address, parse_hash, write_file_atomic};
pub use error::{Result, WhitelistError};
pub use merkle::{
    address_leaf, encode_leaf, hash_pair, verify, verify_hex, verify_proof, Address, Hash,
    MerkleProof, MerkleTree, EMPTY_ROOT,
};
pub use participants::{ParticipantSet, DEFAULT_WHITELIST_PATH};
