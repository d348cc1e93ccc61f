// Copyright 2026 Oxide Computer Company

//! Scoring candidate revisions against a fingerprint set.

use crate::{FingerprintSet, MatchError, ObjectId, TagIndex};
use std::{collections::HashSet, fmt};
use tracing::{debug, trace};

/// The set of blob IDs contained in a revision's tree.
pub type TreeObjects = HashSet<ObjectId>;

/// A source of tree contents for revisions.
///
/// The Git-backed implementation lives in `gitrev-vcs`; tests can supply
/// an in-memory map.
pub trait TreeSource {
    /// The error returned when a tree cannot be listed.
    type Error;

    /// Returns every blob ID reachable from `revision`'s root tree.
    fn tree_objects(
        &self,
        revision: &ObjectId,
    ) -> Result<TreeObjects, Self::Error>;
}

/// A human-facing revision name: a tag if the commit carries one, otherwise
/// the commit ID.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevisionName {
    /// The commit is tagged.
    Tag(String),
    /// The commit is not tagged.
    Commit(ObjectId),
}

impl RevisionName {
    /// Resolves `commit` through `tags`.
    pub fn resolve(commit: ObjectId, tags: &TagIndex) -> Self {
        match tags.name_of(&commit) {
            Some(name) => RevisionName::Tag(name.to_owned()),
            None => RevisionName::Commit(commit),
        }
    }
}

impl fmt::Display for RevisionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevisionName::Tag(name) => f.write_str(name),
            RevisionName::Commit(id) => id.fmt(f),
        }
    }
}

/// The best revision found by [`find_best_match`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchResult {
    commit: ObjectId,
    revision: RevisionName,
    match_count: usize,
    total: usize,
}

impl MatchResult {
    /// Returns the matching commit.
    pub fn commit(&self) -> ObjectId {
        self.commit
    }

    /// Returns the commit's display name (a tag name where possible).
    pub fn revision(&self) -> &RevisionName {
        &self.revision
    }

    /// Returns how many fingerprints were found in the revision's tree.
    pub fn match_count(&self) -> usize {
        self.match_count
    }

    /// Returns the size of the fingerprint set that was matched.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Returns true if every fingerprint was found in the revision's tree.
    pub fn is_exact(&self) -> bool {
        self.total > 0 && self.match_count == self.total
    }

    /// Names the result by the tag `name` if that tag points at the matched
    /// commit.
    ///
    /// A commit can carry several tags. When a manifest already records one
    /// of them, keeping it avoids rewriting the entry to another name for
    /// the same commit.
    pub fn preferring_tag(mut self, name: &str, tags: &TagIndex) -> Self {
        if tags.commit_for(name) == Some(self.commit) {
            self.revision = RevisionName::Tag(name.to_owned());
        }
        self
    }
}

#[derive(Clone, Copy, Debug)]
struct Scored {
    commit: ObjectId,
    match_count: usize,
}

/// Keeps whichever of `best` and `candidate` has the strictly higher match
/// count. On a tie `best` is kept, since it was seen earlier in search
/// order.
fn prefer(best: Option<Scored>, candidate: Scored) -> Option<Scored> {
    match best {
        Some(best) if best.match_count >= candidate.match_count => Some(best),
        _ => Some(candidate),
    }
}

/// Finds the revision in `candidates` that best matches `fingerprints`.
///
/// Candidates are tried in order. The first one whose tree contains every
/// fingerprint is returned immediately as an exact match. Otherwise the
/// candidate with the highest match count is returned, with ties going to
/// the earliest candidate.
///
/// The returned revision name is resolved through `tags`.
///
/// # Errors
///
/// * [`MatchError::NoRevisions`] if `candidates` is empty.
/// * [`MatchError::EmptyFingerprints`] if `fingerprints` is empty: an empty
///   directory would otherwise match every revision vacuously.
/// * [`MatchError::Tree`] if `source` fails to list a tree.
pub fn find_best_match<S: TreeSource>(
    fingerprints: &FingerprintSet,
    candidates: &[ObjectId],
    tags: &TagIndex,
    source: &S,
) -> Result<MatchResult, MatchError<S::Error>> {
    if candidates.is_empty() {
        return Err(MatchError::NoRevisions);
    }
    if fingerprints.is_empty() {
        return Err(MatchError::EmptyFingerprints);
    }

    let total = fingerprints.len();
    let to_result = |scored: Scored| MatchResult {
        commit: scored.commit,
        revision: RevisionName::resolve(scored.commit, tags),
        match_count: scored.match_count,
        total,
    };

    let mut best = None;
    for commit in candidates {
        let tree = source.tree_objects(commit).map_err(|error| {
            MatchError::Tree { revision: *commit, error }
        })?;
        let match_count = fingerprints.count_present(&tree);
        let scored = Scored { commit: *commit, match_count };
        trace!(
            commit = %commit.short(),
            matches = match_count,
            total,
            "scored revision"
        );

        if match_count == total {
            debug!(commit = %commit.short(), "exact match");
            return Ok(to_result(scored));
        }
        best = prefer(best, scored);
    }

    // candidates is non-empty, so at least one revision was scored.
    let best = best.ok_or(MatchError::NoRevisions)?;
    debug!(
        commit = %best.commit.short(),
        matches = best.match_count,
        total,
        "no exact match, using closest"
    );
    Ok(to_result(best))
}
