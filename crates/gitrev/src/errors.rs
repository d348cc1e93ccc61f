// Copyright 2026 Oxide Computer Company

//! Error types for revision matching.

use crate::ObjectId;
use thiserror::Error;

/// An error that occurs while parsing an [`ObjectId`].
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum ObjectIdParseError {
    /// The object ID has an invalid length.
    #[error(
        "invalid length: expected 40 (SHA-1) or 64 (SHA-256) hex characters, \
         got {0}"
    )]
    InvalidLength(usize),

    /// The object ID is not valid hexadecimal.
    #[error("invalid hexadecimal")]
    InvalidHex(hex::FromHexError),
}

/// An error returned by [`find_best_match`](crate::find_best_match) when no
/// [`MatchResult`](crate::MatchResult) can be produced.
///
/// Note that failing to find an *exact* match is not an error: the closest
/// revision is returned instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MatchError<E> {
    /// The candidate list was empty.
    #[error("no revisions to match against")]
    NoRevisions,

    /// The fingerprint set was empty, so no revision can be said to match
    /// it.
    #[error("no fingerprints to match (vendored directory has no files)")]
    EmptyFingerprints,

    /// Listing the tree of a candidate revision failed.
    #[error("failed to list tree for revision {revision}")]
    Tree {
        /// The revision whose tree could not be listed.
        revision: ObjectId,
        /// The underlying error.
        #[source]
        error: E,
    },
}
