// Copyright 2026 Oxide Computer Company

//! Fingerprint sets.

use crate::{ObjectId, TreeObjects};
use std::collections::BTreeSet;

/// The content fingerprints of a vendored directory.
///
/// Each fingerprint is the Git blob ID of one file's contents. Files with
/// identical contents collapse into a single fingerprint.
///
/// An empty set never matches any revision; see
/// [`MatchError::EmptyFingerprints`](crate::MatchError::EmptyFingerprints).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FingerprintSet {
    ids: BTreeSet<ObjectId>,
}

impl FingerprintSet {
    /// Creates an empty fingerprint set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of distinct fingerprints.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if there are no fingerprints.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns true if `id` is one of the fingerprints.
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.ids.contains(id)
    }

    /// Returns how many fingerprints appear in `tree`.
    pub fn count_present(&self, tree: &TreeObjects) -> usize {
        self.ids.iter().filter(|id| tree.contains(id)).count()
    }

    /// Iterates over the fingerprints in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &ObjectId> {
        self.ids.iter()
    }
}

impl FromIterator<ObjectId> for FingerprintSet {
    fn from_iter<I: IntoIterator<Item = ObjectId>>(iter: I) -> Self {
        FingerprintSet { ids: iter.into_iter().collect() }
    }
}

impl Extend<ObjectId> for FingerprintSet {
    fn extend<I: IntoIterator<Item = ObjectId>>(&mut self, iter: I) {
        self.ids.extend(iter);
    }
}
