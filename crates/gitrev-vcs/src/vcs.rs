// Copyright 2026 Oxide Computer Company

//! A thin client over the `git` command-line tool.

use crate::{GitCommandError, VcsEnvError};
use camino::{Utf8Path, Utf8PathBuf};
use gitrev::{ObjectId, TagIndex, TreeObjects};
use std::{
    collections::BTreeMap,
    io,
    process::{Command, Output},
};

/// The number of paths passed to a single `git hash-object` invocation,
/// keeping the command line well under platform argument limits.
const HASH_OBJECT_BATCH: usize = 256;

/// Reads a VCS binary path from an environment variable, falling back
/// to `default` if the variable is unset or empty.
///
/// The value is trimmed of leading and trailing whitespace.
///
/// Returns an error if the variable is set but is not valid UTF-8.
fn read_vcs_env(
    var: &'static str,
    default: &str,
) -> Result<String, VcsEnvError> {
    match std::env::var(var) {
        Ok(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(default.to_string())
            } else {
                Ok(trimmed.to_string())
            }
        }
        Err(std::env::VarError::NotPresent) => Ok(default.to_string()),
        Err(std::env::VarError::NotUnicode(value)) => {
            Err(VcsEnvError::NonUtf8 { var, value })
        }
    }
}

/// The Git client used for hashing, history queries, and working-tree
/// manipulation.
///
/// Every operation takes an explicit working directory; the process-wide
/// current directory is never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vcs {
    binary: String,
}

impl Vcs {
    /// Creates a Git client using the `$GIT` environment variable or
    /// `"git"`.
    ///
    /// Returns an error if the `$GIT` environment variable is set
    /// but is not valid UTF-8.
    pub fn git() -> Result<Self, VcsEnvError> {
        let binary = read_vcs_env("GIT", "git")?;
        Ok(Vcs { binary })
    }

    /// Creates a Git client that runs the given binary.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Vcs { binary: binary.into() }
    }

    /// Returns the path to the Git binary.
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Returns true if `path` is the root of a Git working tree.
    ///
    /// `.git` may be a directory or a file, as in worktrees and submodules.
    pub fn is_repository(path: &Utf8Path) -> io::Result<bool> {
        path.join(".git").try_exists()
    }

    /// Computes the blob ID of each file in `paths`, in order.
    ///
    /// `paths` are relative to `dir`. Runs
    /// `git hash-object --no-filters -- <paths>` in batches, so the IDs
    /// reflect the raw file contents regardless of any attributes in effect.
    /// Paths are passed as arguments rather than on stdin, since a file name
    /// may contain a newline.
    pub fn hash_objects(
        &self,
        dir: &Utf8Path,
        paths: &[Utf8PathBuf],
    ) -> Result<Vec<ObjectId>, GitCommandError> {
        let mut ids = Vec::with_capacity(paths.len());
        for batch in paths.chunks(HASH_OBJECT_BATCH) {
            let mut args = vec!["hash-object", "--no-filters", "--"];
            args.extend(batch.iter().map(|path| path.as_str()));

            let output = self.run(dir, &args)?;
            let batch_ids = parse_object_ids(&args[..2], &output)?;
            if batch_ids.len() != batch.len() {
                return Err(unexpected(
                    &args[..2],
                    format!(
                        "expected {} object IDs, got {}",
                        batch.len(),
                        batch_ids.len()
                    ),
                ));
            }
            ids.extend(batch_ids);
        }
        Ok(ids)
    }

    /// Lists every commit reachable from any ref, newest first.
    ///
    /// Runs `git rev-list --all`. An empty repository yields an empty list.
    pub fn rev_list_all(
        &self,
        repo_root: &Utf8Path,
    ) -> Result<Vec<ObjectId>, GitCommandError> {
        let args = ["rev-list", "--all"];
        let output = self.run(repo_root, &args)?;
        parse_object_ids(&args, &output)
    }

    /// Builds the commit-to-tag index from the repository's tag refs.
    ///
    /// Runs `git show-ref --tags -d`. Annotated tags are keyed by the
    /// commit they point to. If several tags name the same commit, the
    /// first in ref-name order wins.
    ///
    /// `git show-ref` exits unsuccessfully when there are no tags at all;
    /// that surfaces as [`GitCommandError::Failed`].
    pub fn tags(
        &self,
        repo_root: &Utf8Path,
    ) -> Result<TagIndex, GitCommandError> {
        let args = ["show-ref", "--tags", "-d"];
        let output = self.run(repo_root, &args)?;
        parse_show_ref_tags(&args, &output)
    }

    /// Lists the blob IDs in `revision`'s tree, recursively.
    ///
    /// Runs `git ls-tree -r -z <revision>`.
    pub fn tree_objects(
        &self,
        repo_root: &Utf8Path,
        revision: &ObjectId,
    ) -> Result<TreeObjects, GitCommandError> {
        let revision = revision.to_string();
        let args = ["ls-tree", "-r", "-z", revision.as_str()];
        let output = self.run(repo_root, &args)?;
        parse_ls_tree(&args, &output)
    }

    /// Resolves a revision expression (a tag, branch, or commit ID) to a
    /// commit.
    ///
    /// Runs `git rev-parse --verify --quiet <revision>^{commit}`.
    pub fn resolve_commit(
        &self,
        repo_root: &Utf8Path,
        revision: &str,
    ) -> Result<ObjectId, GitCommandError> {
        let spec = format!("{revision}^{{commit}}");
        let args = ["rev-parse", "--verify", "--quiet", spec.as_str()];
        let output = self.run(repo_root, &args)?;
        let ids = parse_object_ids(&args, &output)?;
        match ids.as_slice() {
            [id] => Ok(*id),
            _ => Err(GitCommandError::UnexpectedOutput {
                args: args.join(" "),
                detail: format!("expected one commit, got {}", ids.len()),
            }),
        }
    }

    /// Clones `url` into `dest`.
    pub fn clone_repo(
        &self,
        work_dir: &Utf8Path,
        url: &str,
        dest: &Utf8Path,
    ) -> Result<(), GitCommandError> {
        self.run(work_dir, &["clone", "--quiet", "--", url, dest.as_str()])?;
        Ok(())
    }

    /// Fetches all branches and tags from `origin`.
    pub fn fetch(&self, repo_root: &Utf8Path) -> Result<(), GitCommandError> {
        self.run(repo_root, &["fetch", "--quiet", "--tags", "origin"])?;
        Ok(())
    }

    /// Discards local modifications to tracked files.
    pub fn reset_hard(
        &self,
        repo_root: &Utf8Path,
    ) -> Result<(), GitCommandError> {
        self.run(repo_root, &["reset", "-q", "--hard"])?;
        Ok(())
    }

    /// Removes untracked and ignored files from the working tree.
    pub fn clean(&self, repo_root: &Utf8Path) -> Result<(), GitCommandError> {
        self.run(repo_root, &["clean", "-qfdx"])?;
        Ok(())
    }

    /// Checks out `commit` as a detached `HEAD`.
    pub fn checkout(
        &self,
        repo_root: &Utf8Path,
        commit: &ObjectId,
    ) -> Result<(), GitCommandError> {
        let commit = commit.to_string();
        self.run(repo_root, &["checkout", "--quiet", "--detach", &commit])?;
        Ok(())
    }

    /// Returns the diff between the index and the working tree.
    pub fn diff(
        &self,
        repo_root: &Utf8Path,
    ) -> Result<String, GitCommandError> {
        let output = self.run(repo_root, &["diff"])?;
        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    fn command(&self, dir: &Utf8Path, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.current_dir(dir).args(args);
        cmd
    }

    fn spawn_failed(
        &self,
        dir: &Utf8Path,
        args: &[&str],
        source: io::Error,
    ) -> GitCommandError {
        GitCommandError::SpawnFailed {
            binary_path: self.binary.clone(),
            args: args.join(" "),
            dir: dir.to_owned(),
            source,
        }
    }

    /// Runs a command to completion and returns its stdout.
    fn run(
        &self,
        dir: &Utf8Path,
        args: &[&str],
    ) -> Result<Vec<u8>, GitCommandError> {
        let output = self
            .command(dir, args)
            .output()
            .map_err(|source| self.spawn_failed(dir, args, source))?;
        check_status(dir, args, output)
    }
}

fn check_status(
    dir: &Utf8Path,
    args: &[&str],
    output: Output,
) -> Result<Vec<u8>, GitCommandError> {
    if output.status.success() {
        Ok(output.stdout)
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(GitCommandError::Failed {
            args: args.join(" "),
            dir: dir.to_owned(),
            exit_status: output.status.to_string(),
            stderr: stderr.trim().to_string(),
        })
    }
}

fn unexpected(args: &[&str], detail: String) -> GitCommandError {
    GitCommandError::UnexpectedOutput { args: args.join(" "), detail }
}

/// Parses whitespace-separated object IDs, one per line.
fn parse_object_ids(
    args: &[&str],
    output: &[u8],
) -> Result<Vec<ObjectId>, GitCommandError> {
    let output = std::str::from_utf8(output)
        .map_err(|error| unexpected(args, error.to_string()))?;
    output
        .split_whitespace()
        .map(|word| {
            word.parse()
                .map_err(|error| unexpected(args, format!("{word:?}: {error}")))
        })
        .collect()
}

/// Parses `git show-ref --tags -d` output.
///
/// Each line is `<id> refs/tags/<name>`, followed for annotated tags by
/// `<id> refs/tags/<name>^{}` carrying the peeled commit.
fn parse_show_ref_tags(
    args: &[&str],
    output: &[u8],
) -> Result<TagIndex, GitCommandError> {
    let output = String::from_utf8_lossy(output);

    // Commit by tag name, in ref-name order.
    let mut by_name: BTreeMap<&str, ObjectId> = BTreeMap::new();
    for line in output.lines().filter(|line| !line.trim().is_empty()) {
        let (id, refname) = line.trim().split_once(' ').ok_or_else(|| {
            unexpected(args, format!("malformed line {line:?}"))
        })?;
        let Some(name) = refname.strip_prefix("refs/tags/") else {
            continue;
        };
        let id: ObjectId = id.parse().map_err(|error| {
            unexpected(args, format!("malformed line {line:?}: {error}"))
        })?;

        match name.strip_suffix("^{}") {
            Some(name) => {
                by_name.insert(name, id);
            }
            None => {
                by_name.entry(name).or_insert(id);
            }
        }
    }

    Ok(by_name
        .into_iter()
        .map(|(name, commit)| (commit, name.to_owned()))
        .collect())
}

/// Parses `git ls-tree -r -z` output, keeping blob IDs.
///
/// Each NUL-terminated record is `<mode> <type> <id>\t<path>`.
fn parse_ls_tree(
    args: &[&str],
    output: &[u8],
) -> Result<TreeObjects, GitCommandError> {
    let mut objects = TreeObjects::new();
    for record in output.split(|b| *b == 0).filter(|r| !r.is_empty()) {
        let tab = record.iter().position(|b| *b == b'\t').ok_or_else(|| {
            unexpected(
                args,
                format!(
                    "record without a path: {:?}",
                    String::from_utf8_lossy(record)
                ),
            )
        })?;
        let header = std::str::from_utf8(&record[..tab])
            .map_err(|error| unexpected(args, error.to_string()))?;

        let mut fields = header.split(' ');
        match (fields.next(), fields.next(), fields.next()) {
            (Some(_mode), Some("blob"), Some(id)) => {
                let id = id.parse().map_err(|error| {
                    unexpected(args, format!("{header:?}: {error}"))
                })?;
                objects.insert(id);
            }
            // Submodules (type "commit") have no content of their own.
            (Some(_), Some(_), Some(_)) => {}
            _ => {
                return Err(unexpected(
                    args,
                    format!("malformed record header {header:?}"),
                ));
            }
        }
    }
    Ok(objects)
}
