use std::io::Write;
use std::path::Path;

use sha3::{Digest, Keccak256};
use tempfile::NamedTempFile;

use crate::error::{Result, WhitelistError};
use crate::merkle::{Address, Hash};

/// Parses an Ethereum address from a hex string.
///
/// # Arguments
/// * `addr_str` - The address string, with or without "0x" prefix
///
/// # Returns
/// A 20-byte array representing the address
///
/// # Errors
/// Returns `InvalidIdentifier` if the address is not 40 hex characters or contains invalid hex
pub fn parse_address(addr_str: &str) -> Result<Address> {
    let trimmed = addr_str.trim();
    let cleaned = strip_hex_prefix(trimmed);
    if cleaned.len() != 40 {
        return Err(WhitelistError::InvalidIdentifier(format!(
            "expected 40 hex chars, got {} in '{}'",
            cleaned.len(),
            trimmed
        )));
    }
    let mut address = [0u8; 20];
    hex::decode_to_slice(cleaned, &mut address).map_err(|e| {
        WhitelistError::InvalidIdentifier(format!("invalid hex encoding in '{}': {}", trimmed, e))
    })?;
    Ok(address)
}

/// Parses a 32-byte hash (a Merkle root or proof node) from a hex string.
///
/// # Errors
/// Returns `InvalidHash` if the string is not exactly 64 hex characters after the optional prefix
pub fn parse_hash(hash_str: &str) -> Result<Hash> {
    let trimmed = hash_str.trim();
    let cleaned = strip_hex_prefix(trimmed);
    if cleaned.len() != 64 {
        return Err(WhitelistError::InvalidHash(format!(
            "expected 64 hex chars, got {} in '{}'",
            cleaned.len(),
            trimmed
        )));
    }
    let mut hash = [0u8; 32];
    hex::decode_to_slice(cleaned, &mut hash)
        .map_err(|e| WhitelistError::InvalidHash(format!("invalid hex encoding: {}", e)))?;
    Ok(hash)
}

/// Decodes a hex string of any even length, with or without "0x" prefix.
///
/// # Errors
/// Returns `InvalidHash` if the string is not valid hex
pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let trimmed = s.trim();
    hex::decode(strip_hex_prefix(trimmed)).map_err(|e| {
        WhitelistError::InvalidHash(format!("invalid hex encoding in '{}': {}", trimmed, e))
    })
}

/// Encodes bytes as a lowercase, `0x`-prefixed hex string.
pub fn hex_encode<T: AsRef<[u8]>>(bytes: T) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Keccak256 over an arbitrary byte string.
pub fn keccak256(data: &[u8]) -> Hash {
    Keccak256::digest(data).into()
}

/// Writes `contents` to `path` through a uniquely named temp file in the same
/// directory and a rename, so a reader never observes a half-written output.
/// The temp file is removed if any step fails.
pub fn write_file_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
