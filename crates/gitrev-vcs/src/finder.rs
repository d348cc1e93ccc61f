// Copyright 2026 Oxide Computer Company

//! Resolving one vendored directory to its upstream revision.

use crate::{
    Acquired, FindError, Inspection, RepoCache, Vcs,
    cache::find_non_normal_component, fingerprint_dir, inspect_closest,
};
use camino::{Utf8Path, Utf8PathBuf};
use gitrev::{MatchError, MatchResult, SearchPolicy, find_best_match};
use tracing::{debug, warn};

/// What [`Finder::find`] learned about a vendored directory.
#[derive(Debug, Clone)]
pub enum FindOutcome {
    /// The import path cannot name a directory inside the cache, because it
    /// is empty, absolute, or contains `.` or `..`.
    InvalidImportPath {
        /// The offending path component (empty for an empty path).
        component: String,
    },
    /// The upstream clone is not a Git repository.
    NotARepository {
        /// The clone directory that was checked.
        path: Utf8PathBuf,
    },
    /// The upstream repository has no revisions to match against.
    NoRevisions {
        /// The clone directory.
        repo_root: Utf8PathBuf,
    },
    /// The vendored directory contains no files.
    EmptyDirectory,
    /// A best revision was found.
    Matched {
        /// The best revision, exact or closest.
        result: MatchResult,
        /// For inexact matches with inspection enabled, the prepared
        /// comparison working tree.
        inspection: Option<Inspection>,
    },
}

/// Finds the upstream revisions of vendored directories.
///
/// Each call fingerprints the vendored files, obtains a clean clone of the
/// upstream repository from the cache, and searches its history.
#[derive(Debug, Clone)]
pub struct Finder {
    vcs: Vcs,
    cache: RepoCache,
    policy: SearchPolicy,
    inspect: bool,
}

impl Finder {
    /// Creates a finder. Inspection of inexact matches is enabled by
    /// default.
    pub fn new(vcs: Vcs, cache: RepoCache) -> Self {
        Finder { vcs, cache, policy: SearchPolicy::default(), inspect: true }
    }

    /// Sets the search policy.
    pub fn with_policy(mut self, policy: SearchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Controls whether inexact matches are checked out and overlaid with
    /// the vendored files for comparison.
    pub fn with_inspect(mut self, inspect: bool) -> Self {
        self.inspect = inspect;
        self
    }

    /// Returns the repository cache.
    pub fn cache(&self) -> &RepoCache {
        &self.cache
    }

    /// Finds the revision of `import_path` vendored at `vendor_dir`.
    ///
    /// `suggested` is a previously recorded revision (commit ID or tag
    /// name), searched first. If it is a tag on the matched commit, the
    /// result keeps that name.
    pub fn find(
        &self,
        vendor_dir: &Utf8Path,
        import_path: &Utf8Path,
        suggested: Option<&str>,
    ) -> Result<FindOutcome, FindError> {
        if let Some(component) = find_non_normal_component(import_path) {
            return Ok(FindOutcome::InvalidImportPath { component });
        }

        let fingerprints = fingerprint_dir(&self.vcs, vendor_dir)?;

        let repo = match self.cache.acquire(import_path)? {
            Acquired::Ready(repo) => repo,
            Acquired::NotARepository { path } => {
                return Ok(FindOutcome::NotARepository { path });
            }
        };

        let candidates =
            repo.candidates(suggested, &self.policy).map_err(|error| {
                FindError::Enumerate {
                    repo_root: repo.root().to_owned(),
                    error,
                }
            })?;
        debug!(
            %import_path,
            candidates = candidates.order.len(),
            fingerprints = fingerprints.len(),
            "searching for matching revision"
        );

        let result = match find_best_match(
            &fingerprints,
            &candidates.order,
            &candidates.tags,
            &repo,
        ) {
            Ok(result) => result,
            Err(MatchError::NoRevisions) => {
                return Ok(FindOutcome::NoRevisions {
                    repo_root: repo.root().to_owned(),
                });
            }
            Err(MatchError::EmptyFingerprints) => {
                return Ok(FindOutcome::EmptyDirectory);
            }
            Err(error) => {
                return Err(FindError::Match {
                    repo_root: repo.root().to_owned(),
                    error,
                });
            }
        };

        let result = match suggested {
            Some(name) => result.preferring_tag(name, &candidates.tags),
            None => result,
        };

        let inspection = if !result.is_exact() && self.inspect {
            warn!(
                %import_path,
                revision = %result.revision(),
                matched = result.match_count(),
                total = result.total(),
                "no exact match; see {} to compare",
                repo.root()
            );
            Some(inspect_closest(&repo, result.commit(), vendor_dir)?)
        } else {
            None
        };

        Ok(FindOutcome::Matched { result, inspection })
    }
}
