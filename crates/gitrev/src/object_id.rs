// Copyright 2026 Oxide Computer Company

//! Git object identifiers.

use crate::ObjectIdParseError;
use std::{fmt, str::FromStr};

/// A Git object identifier: the hash of a blob, tree, commit, or tag.
///
/// This type guarantees the contained value is either:
///
/// - 20 bytes (SHA-1, displayed as 40 lowercase hex characters)
/// - 32 bytes (SHA-256, displayed as 64 lowercase hex characters)
///
/// Commits and file contents share this type, since both come out of the
/// same content-addressed store.
///
/// # Parsing
///
/// Parse from a hex string using [`FromStr`]:
///
/// ```
/// use gitrev::ObjectId;
///
/// let id: ObjectId =
///     "0123456789abcdef0123456789abcdef01234567".parse().unwrap();
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectId {
    /// A SHA-1 object ID: the one traditionally used in Git.
    Sha1([u8; 20]),
    /// A SHA-256 object ID, supported by newer versions of Git.
    Sha256([u8; 32]),
}

impl ObjectId {
    /// The number of hex digits shown by [`ObjectId::short`].
    pub const SHORT_LEN: usize = 12;

    /// Returns the raw hash bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ObjectId::Sha1(bytes) => bytes,
            ObjectId::Sha256(bytes) => bytes,
        }
    }

    /// Returns an abbreviated form for diagnostics, such as `0123456789ab`.
    ///
    /// Abbreviations are not guaranteed to be unique within a repository, so
    /// anything written back to a manifest uses the full ID.
    pub fn short(&self) -> ShortObjectId<'_> {
        ShortObjectId(self)
    }
}

/// An abbreviated [`ObjectId`], displayed as its first
/// [`ObjectId::SHORT_LEN`] hex digits.
#[derive(Clone, Copy, Debug)]
pub struct ShortObjectId<'a>(&'a ObjectId);

impl fmt::Display for ShortObjectId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = &self.0.as_bytes()[..ObjectId::SHORT_LEN / 2];
        hex::encode(bytes).fmt(f)
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = s.len();
        match len {
            40 => {
                let mut bytes = [0; 20];
                hex::decode_to_slice(s, &mut bytes)
                    .map_err(ObjectIdParseError::InvalidHex)?;
                Ok(ObjectId::Sha1(bytes))
            }
            64 => {
                let mut bytes = [0; 32];
                hex::decode_to_slice(s, &mut bytes)
                    .map_err(ObjectIdParseError::InvalidHex)?;
                Ok(ObjectId::Sha256(bytes))
            }
            _ => Err(ObjectIdParseError::InvalidLength(len)),
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        hex::encode(self.as_bytes()).fmt(f)
    }
}
