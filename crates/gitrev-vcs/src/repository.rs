// Copyright 2026 Oxide Computer Company

//! Revision enumeration for a local clone.

use crate::{GitCommandError, Vcs};
use camino::{Utf8Path, Utf8PathBuf};
use gitrev::{
    ObjectId, SearchPolicy, TagIndex, TreeObjects, TreeSource,
    schedule_candidates,
};
use tracing::{debug, warn};

/// A local clone of an upstream repository.
#[derive(Debug, Clone)]
pub struct Repository {
    vcs: Vcs,
    root: Utf8PathBuf,
}

/// The revisions of a repository, in the order they should be searched.
#[derive(Debug, Clone)]
pub struct Candidates {
    /// Commits to try, highest priority first.
    pub order: Vec<ObjectId>,
    /// The repository's tags, keyed by commit.
    pub tags: TagIndex,
}

impl Repository {
    /// Wraps the working tree at `root`. The caller is responsible for
    /// ensuring it is a Git repository.
    pub fn new(vcs: Vcs, root: impl Into<Utf8PathBuf>) -> Self {
        Repository { vcs, root: root.into() }
    }

    /// Returns the root of the working tree.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Returns the Git client used for this repository.
    pub fn vcs(&self) -> &Vcs {
        &self.vcs
    }

    /// Returns the tag index, or an empty one if tags cannot be listed.
    ///
    /// Tags are optional: a repository with no tags (or an empty
    /// repository) makes `git show-ref` fail, which is not an error here.
    pub fn tags(&self) -> TagIndex {
        match self.vcs.tags(&self.root) {
            Ok(tags) => tags,
            Err(error) => {
                debug!(repo = %self.root, %error, "no tags found");
                TagIndex::new()
            }
        }
    }

    /// Lists every revision and orders them for searching.
    ///
    /// `suggested` may be a commit ID or a tag name. If it resolves to a
    /// commit, that commit is searched first; otherwise it is ignored with
    /// a warning.
    pub fn candidates(
        &self,
        suggested: Option<&str>,
        policy: &SearchPolicy,
    ) -> Result<Candidates, GitCommandError> {
        let revisions = self.vcs.rev_list_all(&self.root)?;
        let tags = self.tags();
        debug!(
            repo = %self.root,
            revisions = revisions.len(),
            tags = tags.len(),
            "enumerated revisions"
        );

        let suggested =
            suggested.and_then(|rev| self.resolve_suggested(rev, &tags));
        let order = schedule_candidates(revisions, &tags, suggested, policy);
        Ok(Candidates { order, tags })
    }

    fn resolve_suggested(
        &self,
        suggested: &str,
        tags: &TagIndex,
    ) -> Option<ObjectId> {
        if let Some(commit) = tags.commit_for(suggested) {
            return Some(commit);
        }
        match self.vcs.resolve_commit(&self.root, suggested) {
            Ok(commit) => Some(commit),
            Err(error) => {
                warn!(
                    repo = %self.root,
                    %suggested,
                    %error,
                    "suggested revision not found, ignoring it"
                );
                None
            }
        }
    }
}

impl TreeSource for Repository {
    type Error = GitCommandError;

    fn tree_objects(
        &self,
        revision: &ObjectId,
    ) -> Result<TreeObjects, GitCommandError> {
        self.vcs.tree_objects(&self.root, revision)
    }
}
