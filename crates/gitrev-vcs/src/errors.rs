// Copyright 2026 Oxide Computer Company

//! Error types for Git operations, fingerprinting, and acquisition.

use camino::Utf8PathBuf;
use gitrev::{MatchError, ObjectId};
use std::{ffi::OsString, io};
use thiserror::Error;

// ---- VCS errors ----

/// An error from reading the Git binary path from the environment.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VcsEnvError {
    /// The environment variable is set but is not valid UTF-8.
    #[error(
        "${var} environment variable is not valid \
         UTF-8: {value:?}"
    )]
    NonUtf8 {
        /// The environment variable name.
        var: &'static str,
        /// The non-UTF-8 value.
        value: OsString,
    },
}

/// An error from running a single Git command.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GitCommandError {
    /// Failed to spawn the Git process.
    #[error("failed to run {binary_path:?} {args} in {dir}")]
    SpawnFailed {
        /// The path to the Git executable.
        binary_path: String,
        /// The arguments passed to Git.
        args: String,
        /// The working directory where the command was run.
        dir: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The Git command exited unsuccessfully.
    #[error("git {args} failed in {dir} ({exit_status}): {stderr}")]
    Failed {
        /// The arguments passed to Git.
        args: String,
        /// The working directory where the command was run.
        dir: Utf8PathBuf,
        /// A human-readable description of the exit status (e.g.,
        /// "exit code 128" or "killed by signal").
        exit_status: String,
        /// The stderr output from Git.
        stderr: String,
    },

    /// The Git command succeeded but its output could not be interpreted.
    #[error("git {args} returned unexpected output: {detail}")]
    UnexpectedOutput {
        /// The arguments passed to Git.
        args: String,
        /// What was wrong with the output.
        detail: String,
    },
}

// ---- Fingerprinting errors ----

/// An error that occurs while fingerprinting a vendored directory.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FingerprintError {
    /// Walking the directory failed.
    #[error("failed to walk {path}")]
    Walk {
        /// The directory being walked.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        error: walkdir::Error,
    },

    /// A file path is not valid UTF-8.
    #[error("path under {dir} is not valid UTF-8: {path:?}")]
    NonUtf8Path {
        /// The directory being walked.
        dir: Utf8PathBuf,
        /// The offending path.
        path: std::path::PathBuf,
    },

    /// Hashing the files failed.
    #[error("failed to hash files under {dir}")]
    Hash {
        /// The directory being fingerprinted.
        dir: Utf8PathBuf,
        /// The underlying Git error.
        #[source]
        error: GitCommandError,
    },
}

// ---- Acquisition errors ----

/// An error that occurs while obtaining a local clone of an upstream
/// repository.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AcquireError {
    /// The import path contains a non-normal component, which would place
    /// the clone outside the cache.
    #[error(
        "import path {path:?} contains non-normal component {component:?} \
         (only plain directory names are allowed)"
    )]
    InvalidImportPath {
        /// The import path.
        path: Utf8PathBuf,
        /// The non-normal component that was found (e.g., `..`, `.`, `/`).
        component: String,
    },

    /// Failed to create a directory in the cache.
    #[error("failed to create cache directory {path}")]
    CreateDir {
        /// The directory path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// An I/O error occurred while probing the clone.
    #[error("I/O error while checking for a repository at {path}")]
    Io {
        /// The path being checked when the error occurred.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// Failed to spawn the Go toolchain.
    #[error("failed to run {binary_path:?} to fetch {import_path}")]
    GoSpawnFailed {
        /// The path to the Go executable.
        binary_path: String,
        /// The import path being fetched.
        import_path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A Git command (clone, fetch, reset, or clean) failed.
    #[error("failed to prepare clone of {import_path}")]
    Git {
        /// The import path being acquired.
        import_path: Utf8PathBuf,
        /// The underlying Git error.
        #[source]
        error: GitCommandError,
    },
}

// ---- Inspection errors ----

/// An error that occurs while preparing a closest-match inspection.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InspectError {
    /// A Git command (checkout or diff) failed.
    #[error("git failed while preparing inspection of {commit}")]
    Git {
        /// The commit being inspected.
        commit: ObjectId,
        /// The underlying Git error.
        #[source]
        error: GitCommandError,
    },

    /// Walking the vendored directory failed.
    #[error("failed to walk {path}")]
    Walk {
        /// The directory being walked.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        error: walkdir::Error,
    },

    /// A path in the vendored directory is not valid UTF-8.
    #[error("path under {dir} is not valid UTF-8: {path:?}")]
    NonUtf8Path {
        /// The directory being walked.
        dir: Utf8PathBuf,
        /// The offending path.
        path: std::path::PathBuf,
    },

    /// Failed to read a vendored file.
    #[error("failed to read vendored file {path}")]
    Read {
        /// The file path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// Failed to create a directory in the working tree.
    #[error("failed to create directory {path}")]
    CreateDir {
        /// The directory path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// Failed to write a vendored file into the working tree.
    #[error("failed to copy vendored file to {path}")]
    Write {
        /// The destination path.
        path: Utf8PathBuf,
        /// The underlying write error.
        #[source]
        error: AtomicWriteError,
    },
}

/// An error that occurred during an atomic file write.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AtomicWriteError {
    /// Writing contents to the temporary file failed.
    #[error("writing file contents failed")]
    Write(#[source] io::Error),

    /// The atomic write infrastructure failed (e.g., creating the
    /// temporary file, or renaming it into place).
    #[error("atomic create or rename failed")]
    Rename(#[source] io::Error),
}

// ---- Finder errors ----

/// An error that stops a single vendored path from being resolved.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FindError {
    /// Fingerprinting the vendored directory failed.
    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),

    /// Obtaining the upstream repository failed.
    #[error(transparent)]
    Acquire(#[from] AcquireError),

    /// Listing revisions failed.
    #[error("failed to list revisions in {repo_root}")]
    Enumerate {
        /// The repository root.
        repo_root: Utf8PathBuf,
        /// The underlying Git error.
        #[source]
        error: GitCommandError,
    },

    /// Listing a candidate revision's tree failed.
    #[error("failed to match revisions in {repo_root}")]
    Match {
        /// The repository root.
        repo_root: Utf8PathBuf,
        /// The underlying error.
        #[source]
        error: MatchError<GitCommandError>,
    },

    /// Preparing the closest-match inspection failed.
    #[error(transparent)]
    Inspect(#[from] InspectError),
}
