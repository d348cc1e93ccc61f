// Copyright 2026 Oxide Computer Company

//! Shared setup for integration tests.

use anyhow::Result;
use atomicwrites::{AtomicFile, OverwriteBehavior};
use camino::{Utf8Path, Utf8PathBuf};
use gitrev::ObjectId;
use std::{fs, io::Write, process::Command};

/// Returns a `Command` for git, respecting the `$GIT` environment variable.
pub fn git_command() -> Command {
    let bin = std::env::var("GIT").unwrap_or_else(|_| "git".to_string());
    Command::new(bin)
}

/// Writes content to a file atomically, creating parent directories.
pub fn write_file(
    path: impl AsRef<Utf8Path>,
    content: impl AsRef<[u8]>,
) -> std::io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(content.as_ref()))
        .map_err(|e| e.into())
}

/// Writes each `(path, contents)` pair under `root`.
pub fn write_tree(root: &Utf8Path, files: &[(&str, &str)]) -> Result<()> {
    for (path, contents) in files {
        write_file(root.join(path), contents)?;
    }
    Ok(())
}

/// Runs git in `dir`, asserting success, and returns trimmed stdout.
pub fn git(dir: &Utf8Path, args: &[&str]) -> Result<String> {
    let output = git_command().args(args).current_dir(dir).output()?;
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(String::from_utf8(output.stdout)?.trim().to_string())
}

/// A throwaway upstream repository with deterministic commit dates, so
/// that `git rev-list` order is stable.
pub struct TestRepo {
    root: Utf8PathBuf,
    commits: u32,
}

impl TestRepo {
    /// Initializes a git repository at `root` and configures the user.
    pub fn init(root: impl Into<Utf8PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        git(&root, &["init", "--quiet"])?;
        git(&root, &["config", "user.email", "test@example.com"])?;
        git(&root, &["config", "user.name", "Test User"])?;
        git(&root, &["config", "tag.gpgSign", "false"])?;
        git(&root, &["config", "commit.gpgSign", "false"])?;
        Ok(TestRepo { root, commits: 0 })
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Writes `files`, commits everything, and returns the commit ID.
    pub fn commit(&mut self, files: &[(&str, &str)]) -> Result<ObjectId> {
        write_tree(&self.root, files)?;
        self.commits += 1;
        let date = format!("2020-01-01T00:{:02}:00+0000", self.commits);

        git(&self.root, &["add", "--all"])?;
        let status = git_command()
            .args(["commit", "--quiet", "-m"])
            .arg(format!("commit {}", self.commits))
            .env("GIT_AUTHOR_DATE", &date)
            .env("GIT_COMMITTER_DATE", &date)
            .current_dir(&self.root)
            .status()?;
        assert!(status.success(), "git commit failed");

        Ok(git(&self.root, &["rev-parse", "HEAD"])?.parse()?)
    }

    /// Tags `HEAD` with a lightweight tag.
    pub fn tag(&self, name: &str) -> Result<()> {
        git(&self.root, &["tag", name])?;
        Ok(())
    }

    /// Adds a lightweight tag `name` on the commit `target` names.
    pub fn tag_at(&self, name: &str, target: &str) -> Result<()> {
        git(&self.root, &["tag", name, target])?;
        Ok(())
    }

    /// Tags `HEAD` with an annotated tag.
    pub fn tag_annotated(&self, name: &str) -> Result<()> {
        git(&self.root, &["tag", "-a", "-m", name, name])?;
        Ok(())
    }
}
