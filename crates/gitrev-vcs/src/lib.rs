// Copyright 2026 Oxide Computer Company

//! Git plumbing for finding the upstream revision of vendored code.
//!
//! This crate connects the pure matching logic in
//! [`gitrev`](https://crates.io/crates/gitrev) to the `git` command-line
//! tool:
//!
//! * [`fingerprint_dir`] hashes a vendored directory with
//!   `git hash-object`.
//! * [`RepoCache`] keeps clones of upstream repositories, keyed by import
//!   path, and resets them before each use.
//! * [`Repository`] lists revisions and tags and orders them for the
//!   search.
//! * [`inspect_closest`] prepares a working tree for comparing a vendored
//!   directory against its closest revision.
//! * [`Finder`] strings these together for a single vendored directory.
//!
//! # Usage
//!
//! ```no_run
//! use camino::Utf8Path;
//! use gitrev_vcs::{FindOutcome, Finder, RepoCache, Vcs};
//!
//! let vcs = Vcs::git().expect("$GIT is valid UTF-8");
//! let cache = RepoCache::new(vcs.clone(), "/home/me/.gitrev-cache");
//! let finder = Finder::new(vcs, cache);
//!
//! let outcome = finder
//!     .find(
//!         Utf8Path::new("vendor/github.com/foo/bar"),
//!         Utf8Path::new("github.com/foo/bar"),
//!         Some("v1.2.0"),
//!     )
//!     .expect("search completed");
//!
//! if let FindOutcome::Matched { result, .. } = outcome {
//!     println!("github.com/foo/bar {}", result.revision());
//! }
//! ```

#![deny(missing_docs)]

mod cache;
mod errors;
mod finder;
mod fingerprint;
mod inspect;
mod repository;
mod vcs;

pub use cache::{Acquired, CloneSource, RepoCache};
pub use errors::{
    AcquireError, AtomicWriteError, FindError, FingerprintError,
    GitCommandError, InspectError, VcsEnvError,
};
pub use finder::{FindOutcome, Finder};
pub use fingerprint::fingerprint_dir;
pub use inspect::{Inspection, inspect_closest};
pub use repository::{Candidates, Repository};
pub use vcs::Vcs;
