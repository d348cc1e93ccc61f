// Copyright 2026 Oxide Computer Company

//! Preparing a closest match for manual comparison.

use crate::{AtomicWriteError, InspectError, Repository};
use atomicwrites::AtomicFile;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use gitrev::ObjectId;
use std::io::Write;
use tracing::info;
use walkdir::WalkDir;

/// A working tree prepared for comparing a vendored directory against its
/// closest upstream revision.
#[derive(Debug, Clone)]
pub struct Inspection {
    /// The working tree, checked out at the closest revision with the
    /// vendored files copied over it.
    pub worktree: Utf8PathBuf,
    /// `git diff` of the working tree: how the vendored files differ from
    /// the revision.
    pub diff: String,
}

/// Checks out `commit` in `repo` and overlays the files of `vendor_dir`
/// onto the working tree.
///
/// Files present upstream but missing from the vendored copy stay as
/// checked out, so the diff shows modifications only. Anything named
/// `.git` in the vendored directory is skipped.
///
/// The next [`RepoCache::acquire`](crate::RepoCache::acquire) of the same
/// repository resets the working tree.
pub fn inspect_closest(
    repo: &Repository,
    commit: ObjectId,
    vendor_dir: &Utf8Path,
) -> Result<Inspection, InspectError> {
    let git_error = |error| InspectError::Git { commit, error };

    repo.vcs().checkout(repo.root(), &commit).map_err(git_error)?;
    let copied = overlay(vendor_dir, repo.root())?;
    let diff = repo.vcs().diff(repo.root()).map_err(git_error)?;

    info!(
        worktree = %repo.root(),
        commit = %commit.short(),
        copied,
        "prepared closest match for comparison"
    );
    Ok(Inspection { worktree: repo.root().to_owned(), diff })
}

/// Copies every regular file under `src` to the same relative path under
/// `dest`, returning the number of files copied.
fn overlay(src: &Utf8Path, dest: &Utf8Path) -> Result<usize, InspectError> {
    let mut copied = 0;
    let walker = WalkDir::new(src)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git");

    for entry in walker {
        let entry = entry.map_err(|error| InspectError::Walk {
            path: src.to_owned(),
            error,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let from = Utf8PathBuf::try_from(entry.path().to_path_buf()).map_err(
            |error| InspectError::NonUtf8Path {
                dir: src.to_owned(),
                path: error.into_path_buf(),
            },
        )?;
        let relative = from.strip_prefix(src).unwrap_or(&from);
        let to = dest.join(relative);

        let contents = fs::read(&from)
            .map_err(|error| InspectError::Read { path: from.clone(), error })?;
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).map_err(|error| {
                InspectError::CreateDir { path: parent.to_owned(), error }
            })?;
        }
        write_atomic(&to, &contents)?;
        copied += 1;
    }
    Ok(copied)
}

fn write_atomic(path: &Utf8Path, contents: &[u8]) -> Result<(), InspectError> {
    AtomicFile::new(path, atomicwrites::OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(contents))
        .map_err(|error| {
            let error = match error {
                atomicwrites::Error::Internal(e) => AtomicWriteError::Rename(e),
                atomicwrites::Error::User(e) => AtomicWriteError::Write(e),
            };
            InspectError::Write { path: path.to_owned(), error }
        })
}
