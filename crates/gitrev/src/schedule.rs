// Copyright 2026 Oxide Computer Company

//! Ordering of candidate revisions.

use crate::{ObjectId, TagIndex};
use tracing::debug;

/// The default number of revisions above which only tagged revisions are
/// searched.
pub const DEFAULT_TAG_ONLY_THRESHOLD: usize = 3000;

/// Controls how many revisions [`schedule_candidates`] keeps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchPolicy {
    /// If a repository has more revisions than this, only tagged revisions
    /// are searched.
    pub tag_only_threshold: usize,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        SearchPolicy { tag_only_threshold: DEFAULT_TAG_ONLY_THRESHOLD }
    }
}

/// Orders `revisions` into the sequence in which they should be tried.
///
/// `revisions` is the full history in the order the VCS reports it
/// (typically newest first).
///
/// * If there are more revisions than `policy.tag_only_threshold`, untagged
///   revisions are dropped.
/// * Tagged revisions come before untagged ones. Relative order within each
///   group is preserved.
/// * `suggested`, if present, is moved (or inserted) at the front, whether
///   or not it survived the steps above.
pub fn schedule_candidates(
    revisions: Vec<ObjectId>,
    tags: &TagIndex,
    suggested: Option<ObjectId>,
    policy: &SearchPolicy,
) -> Vec<ObjectId> {
    let mut candidates = if revisions.len() > policy.tag_only_threshold {
        debug!(
            revisions = revisions.len(),
            threshold = policy.tag_only_threshold,
            "too many revisions, searching tags only"
        );
        revisions.into_iter().filter(|rev| tags.is_tagged(rev)).collect()
    } else {
        revisions
    };

    // sort_by_key is stable, which keeps history order within each group.
    candidates.sort_by_key(|rev| !tags.is_tagged(rev));

    if let Some(suggested) = suggested {
        candidates.retain(|rev| *rev != suggested);
        candidates.insert(0, suggested);
    }

    candidates
}
