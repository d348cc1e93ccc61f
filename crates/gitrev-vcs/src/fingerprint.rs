// Copyright 2026 Oxide Computer Company

//! Content fingerprinting of vendored directories.

use crate::{FingerprintError, Vcs};
use camino::{Utf8Path, Utf8PathBuf};
use gitrev::FingerprintSet;
use tracing::debug;
use walkdir::WalkDir;

/// Lists every regular file under `dir`, relative to `dir`.
///
/// Symbolic links are not followed, and directories are not reported.
fn walk_files(
    dir: &Utf8Path,
) -> Result<Vec<Utf8PathBuf>, FingerprintError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|error| FingerprintError::Walk {
            path: dir.to_owned(),
            error,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
        let relative = Utf8PathBuf::try_from(relative.to_path_buf())
            .map_err(|error| FingerprintError::NonUtf8Path {
                dir: dir.to_owned(),
                path: error.into_path_buf(),
            })?;
        files.push(relative);
    }
    Ok(files)
}

/// Computes the fingerprint set of a vendored directory.
///
/// Every regular file under `dir` is hashed with the same scheme Git uses
/// for blobs, so the result can be compared directly against tree listings.
/// A missing or unreadable directory is an error; an empty directory yields
/// an empty set.
pub fn fingerprint_dir(
    vcs: &Vcs,
    dir: &Utf8Path,
) -> Result<FingerprintSet, FingerprintError> {
    let files = walk_files(dir)?;
    let ids = vcs.hash_objects(dir, &files).map_err(|error| {
        FingerprintError::Hash { dir: dir.to_owned(), error }
    })?;

    let fingerprints: FingerprintSet = ids.into_iter().collect();
    debug!(
        %dir,
        files = files.len(),
        fingerprints = fingerprints.len(),
        "fingerprinted vendored directory"
    );
    Ok(fingerprints)
}
