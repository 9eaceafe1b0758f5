//! The whitelisted address list, validated once when it is read.

use std::path::Path;

use crate::common::parse_address;
use crate::error::{Result, WhitelistError};
use crate::merkle::Address;

/// Where the whitelist lives relative to the working directory.
pub const DEFAULT_WHITELIST_PATH: &str = "whitelist/whitelist.json";

/// Ordered whitelist addresses.
///
/// Duplicates are kept in place; the tree commits to every entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantSet {
    addresses: Vec<Address>,
}

impl ParticipantSet {
    pub fn from_addresses(addresses: Vec<Address>) -> Self {
        Self { addresses }
    }

    /// Parses a JSON array of `0x`-prefixed address strings.
    ///
    /// Entries without the exact `0x` prefix are rejected: the deployment
    /// scripts' `keccak256` helper hashes such strings as UTF-8 text, so
    /// accepting them would commit to a different root.
    ///
    /// # Errors
    /// `InputReadFailure` if `json` is not an array of strings, attributed to
    /// `origin`; `InvalidIdentifier` naming the first entry that is not an
    /// address.
    pub fn from_json_str(json: &str, origin: &Path) -> Result<Self> {
        let entries: Vec<String> =
            serde_json::from_str(json).map_err(|e| WhitelistError::InputReadFailure {
                path: origin.to_path_buf(),
                reason: e.to_string(),
            })?;

        let addresses = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                if !entry.starts_with("0x") {
                    return Err(WhitelistError::InvalidIdentifier(format!(
                        "entry {}: missing 0x prefix in '{}'",
                        index, entry
                    )));
                }
                parse_address(entry).map_err(|e| match e {
                    WhitelistError::InvalidIdentifier(reason) => {
                        WhitelistError::InvalidIdentifier(format!("entry {}: {}", index, reason))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { addresses })
    }

    /// Reads and validates the whitelist file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| WhitelistError::InputReadFailure {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Self::from_json_str(&content, path)
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Address> {
        self.addresses.iter()
    }

    pub fn as_slice(&self) -> &[Address] {
        &self.addresses
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.addresses.contains(address)
    }
}

impl<'a> IntoIterator for &'a ParticipantSet {
    type Item = &'a Address;
    type IntoIter = std::slice::Iter<'a, Address>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
