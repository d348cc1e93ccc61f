// Copyright 2026 Oxide Computer Company

//! A cache of upstream clones, keyed by import path.

use crate::{AcquireError, GitCommandError, Repository, Vcs};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::process::Command;
use tracing::{debug, info, warn};

/// Where fresh clones come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneSource {
    /// Run `git clone <base_url><import path>`.
    Git {
        /// The prefix joined with the import path to form a clone URL, for
        /// example `https://`.
        base_url: String,
    },
    /// Run `go get -d <import path>` in GOPATH mode, with `GOPATH` set to
    /// the cache root. This resolves vanity import paths the way the Go
    /// toolchain does.
    GoGet {
        /// Path to the `go` binary.
        binary: String,
    },
}

impl Default for CloneSource {
    fn default() -> Self {
        CloneSource::Git { base_url: "https://".to_owned() }
    }
}

/// The result of [`RepoCache::acquire`].
#[derive(Debug, Clone)]
pub enum Acquired {
    /// A clean, usable clone.
    Ready(Repository),
    /// The cache directory exists (or was fetched) but is not a Git
    /// repository, for example because upstream uses another VCS.
    NotARepository {
        /// The directory that was checked.
        path: Utf8PathBuf,
    },
}

/// A directory of upstream clones, reused across runs.
///
/// Clones live at `<root>/src/<import path>`, which is also the layout
/// `go get` produces in GOPATH mode.
#[derive(Debug, Clone)]
pub struct RepoCache {
    vcs: Vcs,
    root: Utf8PathBuf,
    source: CloneSource,
    refresh: bool,
}

impl RepoCache {
    /// Creates a cache rooted at `root`. Nothing is created on disk until
    /// a repository is acquired.
    pub fn new(vcs: Vcs, root: impl Into<Utf8PathBuf>) -> Self {
        RepoCache {
            vcs,
            root: root.into(),
            source: CloneSource::default(),
            refresh: false,
        }
    }

    /// Sets where fresh clones come from.
    pub fn with_source(mut self, source: CloneSource) -> Self {
        self.source = source;
        self
    }

    /// If true, existing clones fetch from `origin` before use.
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    /// Returns the cache root.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Returns the directory where `import_path` is (or would be) cloned.
    pub fn repo_path(&self, import_path: &Utf8Path) -> Utf8PathBuf {
        self.root.join("src").join(import_path)
    }

    /// Obtains a clean clone of `import_path`.
    ///
    /// A missing clone is fetched from the configured [`CloneSource`]. An
    /// existing clone is reset and cleaned, which also undoes any files
    /// left behind by a previous inspection.
    pub fn acquire(
        &self,
        import_path: &Utf8Path,
    ) -> Result<Acquired, AcquireError> {
        if let Some(component) = find_non_normal_component(import_path) {
            return Err(AcquireError::InvalidImportPath {
                path: import_path.to_owned(),
                component,
            });
        }

        let repo_path = self.repo_path(import_path);
        let git_error = |error: GitCommandError| AcquireError::Git {
            import_path: import_path.to_owned(),
            error,
        };

        if !repo_path.is_dir() {
            self.fetch_fresh(import_path, &repo_path)?;
            return self.check_repository(repo_path);
        }

        match self.check_repository(repo_path)? {
            Acquired::Ready(repo) => {
                debug!(repo = %repo.root(), "reusing cached clone");
                if self.refresh {
                    self.vcs.fetch(repo.root()).map_err(git_error)?;
                }
                self.vcs.reset_hard(repo.root()).map_err(git_error)?;
                self.vcs.clean(repo.root()).map_err(git_error)?;
                Ok(Acquired::Ready(repo))
            }
            not_a_repo @ Acquired::NotARepository { .. } => Ok(not_a_repo),
        }
    }

    fn check_repository(
        &self,
        repo_path: Utf8PathBuf,
    ) -> Result<Acquired, AcquireError> {
        match Vcs::is_repository(&repo_path) {
            Ok(true) => Ok(Acquired::Ready(Repository::new(
                self.vcs.clone(),
                repo_path,
            ))),
            Ok(false) => Ok(Acquired::NotARepository { path: repo_path }),
            Err(error) => Err(AcquireError::Io { path: repo_path, error }),
        }
    }

    fn fetch_fresh(
        &self,
        import_path: &Utf8Path,
        repo_path: &Utf8Path,
    ) -> Result<(), AcquireError> {
        fs::create_dir_all(&self.root).map_err(|error| {
            AcquireError::CreateDir { path: self.root.clone(), error }
        })?;

        match &self.source {
            CloneSource::Git { base_url } => {
                let url = format!("{base_url}{import_path}");
                info!(%url, dest = %repo_path, "cloning");
                if let Some(parent) = repo_path.parent() {
                    fs::create_dir_all(parent).map_err(|error| {
                        AcquireError::CreateDir {
                            path: parent.to_owned(),
                            error,
                        }
                    })?;
                }
                // Relative to the cache root, where git runs.
                let dest = Utf8Path::new("src").join(import_path);
                self.vcs.clone_repo(&self.root, &url, &dest).map_err(
                    |error| AcquireError::Git {
                        import_path: import_path.to_owned(),
                        error,
                    },
                )
            }
            CloneSource::GoGet { binary } => {
                info!(
                    %import_path,
                    gopath = %self.root,
                    "fetching with go get"
                );
                let output = Command::new(binary)
                    .current_dir(&self.root)
                    .env("GOPATH", &self.root)
                    .env("GO111MODULE", "off")
                    .args(["get", "-d", import_path.as_str()])
                    .output()
                    .map_err(|source| AcquireError::GoSpawnFailed {
                        binary_path: binary.clone(),
                        import_path: import_path.to_owned(),
                        source,
                    })?;
                // go get routinely fails after downloading (e.g. on build
                // constraints); whether a clone exists is decided afterwards.
                if !output.status.success() {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    warn!(
                        %import_path,
                        status = %output.status,
                        stderr = %stderr.trim(),
                        "go get failed"
                    );
                }
                Ok(())
            }
        }
    }
}

/// Returns the first non-normal component in the path, if any.
///
/// A normal component is a plain file or directory name (not `..`, `.`,
/// root `/`, or a Windows prefix).
pub(crate) fn find_non_normal_component(path: &Utf8Path) -> Option<String> {
    if path.as_str().is_empty() {
        return Some(String::new());
    }
    path.components().find_map(|component| match component {
        Utf8Component::Normal(_) => None,
        Utf8Component::Prefix(_)
        | Utf8Component::RootDir
        | Utf8Component::CurDir
        | Utf8Component::ParentDir => Some(component.as_str().to_owned()),
    })
}
