// Copyright 2026 Oxide Computer Company

//! Commit-to-tag mapping.

use crate::ObjectId;
use std::collections::HashMap;

/// A mapping from commit ID to tag name.
///
/// Each commit has at most one preferred tag. When built from an iterator,
/// the first name seen for a commit wins, so callers should feed entries in
/// their preferred order (ref-name order for `git show-ref`). Every name is
/// still remembered for [`TagIndex::commit_for`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagIndex {
    by_commit: HashMap<ObjectId, String>,
    by_name: HashMap<String, ObjectId>,
}

impl TagIndex {
    /// Creates an empty tag index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `name` for `commit`. The name becomes the commit's preferred
    /// tag unless the commit is already tagged.
    ///
    /// Returns true if `name` became the preferred tag.
    pub fn insert(&mut self, commit: ObjectId, name: String) -> bool {
        self.by_name.insert(name.clone(), commit);
        match self.by_commit.entry(commit) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(name);
                true
            }
        }
    }

    /// Returns the tag name for `commit`, if it is tagged.
    pub fn name_of(&self, commit: &ObjectId) -> Option<&str> {
        self.by_commit.get(commit).map(String::as_str)
    }

    /// Returns true if `commit` carries a tag.
    pub fn is_tagged(&self, commit: &ObjectId) -> bool {
        self.by_commit.contains_key(commit)
    }

    /// Returns the commit a tag name points to, if any. This includes tags
    /// that are not their commit's preferred name.
    pub fn commit_for(&self, name: &str) -> Option<ObjectId> {
        self.by_name.get(name).copied()
    }

    /// Returns the number of tagged commits.
    pub fn len(&self) -> usize {
        self.by_commit.len()
    }

    /// Returns true if no commits are tagged.
    pub fn is_empty(&self) -> bool {
        self.by_commit.is_empty()
    }
}

impl FromIterator<(ObjectId, String)> for TagIndex {
    fn from_iter<I: IntoIterator<Item = (ObjectId, String)>>(iter: I) -> Self {
        let mut index = TagIndex::new();
        for (commit, name) in iter {
            index.insert(commit, name);
        }
        index
    }
}
