// Copyright 2026 Oxide Computer Company

//! Revision matching for vendored source trees.
//!
//! Vendoring copies a dependency's source into a consuming project, and the
//! record of which upstream revision was copied is often lost. This crate
//! answers the question "which single historical snapshot of the upstream
//! repository best matches these files?" by comparing content hashes.
//!
//! The pieces are:
//!
//! * [`ObjectId`]: a Git object identifier (SHA-1 or SHA-256).
//! * [`FingerprintSet`]: the blob identifiers of every file in a vendored
//!   directory.
//! * [`TagIndex`]: a map from commit to tag name, used both to prefer
//!   tagged revisions during the search and to report readable names.
//! * [`schedule_candidates`]: the order in which revisions are tried.
//! * [`find_best_match`]: scores candidates against a fingerprint set and
//!   returns a [`MatchResult`].
//!
//! This crate never runs any external processes. Tree contents are supplied
//! through the [`TreeSource`] trait; see
//! [`gitrev-vcs`](https://crates.io/crates/gitrev-vcs) for the Git-backed
//! implementation.
//!
//! # Examples
//!
//! ```
//! use gitrev::{
//!     FingerprintSet, ObjectId, SearchPolicy, TagIndex, TreeObjects,
//!     TreeSource, find_best_match, schedule_candidates,
//! };
//! use std::{collections::HashMap, convert::Infallible};
//!
//! struct Trees(HashMap<ObjectId, TreeObjects>);
//!
//! impl TreeSource for Trees {
//!     type Error = Infallible;
//!
//!     fn tree_objects(
//!         &self,
//!         revision: &ObjectId,
//!     ) -> Result<TreeObjects, Infallible> {
//!         Ok(self.0.get(revision).cloned().unwrap_or_default())
//!     }
//! }
//!
//! let id = |c: char| -> ObjectId {
//!     c.to_string().repeat(40).parse().unwrap()
//! };
//!
//! let fingerprints: FingerprintSet = [id('1'), id('2')].into_iter().collect();
//! let trees = Trees(HashMap::from([
//!     (id('a'), [id('1')].into_iter().collect()),
//!     (id('b'), [id('1'), id('2'), id('3')].into_iter().collect()),
//! ]));
//! let tags: TagIndex = [(id('b'), "v1.0".to_owned())].into_iter().collect();
//!
//! let candidates = schedule_candidates(
//!     vec![id('a'), id('b')],
//!     &tags,
//!     None,
//!     &SearchPolicy::default(),
//! );
//! let result = find_best_match(&fingerprints, &candidates, &tags, &trees)
//!     .unwrap();
//!
//! assert!(result.is_exact());
//! assert_eq!(result.revision().to_string(), "v1.0");
//! ```

#![deny(missing_docs)]

mod errors;
mod fingerprint;
mod manifest;
mod matcher;
mod object_id;
mod schedule;
mod tags;

pub use errors::{MatchError, ObjectIdParseError};
pub use fingerprint::FingerprintSet;
pub use manifest::{ManifestEntry, ManifestLine};
pub use matcher::{
    MatchResult, RevisionName, TreeObjects, TreeSource, find_best_match,
};
pub use object_id::{ObjectId, ShortObjectId};
pub use schedule::{
    DEFAULT_TAG_ONLY_THRESHOLD, SearchPolicy, schedule_candidates,
};
pub use tags::TagIndex;
