// Copyright 2026 Oxide Computer Company

//! Running the finder over manifest entries or explicit paths, and reporting
//! the results.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use gitrev::ManifestLine;
use gitrev_vcs::{FindOutcome, Finder};
use std::io::Write;
use tracing::{info, warn};

/// Processes every line of a manifest.
///
/// Entries are resolved against the `vendor` directory next to the
/// manifest. Lines that are not entries are echoed unchanged, so the output
/// can replace the manifest.
pub fn run_manifest(
    finder: &Finder,
    manifest: &Utf8Path,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let contents = fs::read_to_string(manifest)?;
    let vendor_root = manifest
        .parent()
        .map(|dir| dir.join("vendor"))
        .unwrap_or_else(|| Utf8PathBuf::from("vendor"));

    for line in contents.lines() {
        match ManifestLine::parse(line) {
            ManifestLine::Verbatim(line) => {
                writeln!(out, "{line}")?;
                out.flush()?;
            }
            ManifestLine::Entry(entry) => {
                if !vendor_root.join(entry.path()).is_dir() {
                    warn!(path = %entry.path(), "not in vendor tree, removed");
                    continue;
                }
                find_and_report(
                    finder,
                    &vendor_root,
                    entry.path(),
                    Some(entry.suggested()),
                    out,
                )?;
            }
        }
    }
    Ok(())
}

/// Processes explicitly named vendored paths, relative to `vendor_root`.
pub fn run_paths(
    finder: &Finder,
    vendor_root: &Utf8Path,
    paths: &[Utf8PathBuf],
    out: &mut impl Write,
) -> anyhow::Result<()> {
    for path in paths {
        find_and_report(finder, vendor_root, path, None, out)?;
    }
    Ok(())
}

/// Finds the revision of one vendored path and writes `<path> <revision>`
/// to `out`.
///
/// Skipped entries (invalid import path, not a repository, no revisions, no
/// files) produce a diagnostic instead. Invalid and not-a-repository entries
/// with a suggested revision echo the suggestion so the manifest keeps it.
fn find_and_report(
    finder: &Finder,
    vendor_root: &Utf8Path,
    path: &Utf8Path,
    suggested: Option<&str>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let outcome = finder
        .find(&vendor_root.join(path), path, suggested)
        .with_context(|| format!("failed to find the revision of {path}"))?;

    match outcome {
        FindOutcome::InvalidImportPath { component } => {
            warn!(%path, %component, "not a valid import path; skipping");
            if let Some(suggested) = suggested {
                writeln!(out, "{path} {suggested}")?;
            }
        }
        FindOutcome::NotARepository { path: clone } => {
            warn!(%path, %clone, "not a git repo; skipping");
            if let Some(suggested) = suggested {
                writeln!(out, "{path} {suggested}")?;
            }
        }
        FindOutcome::NoRevisions { repo_root } => {
            warn!(%path, repo = %repo_root, "no revisions?");
        }
        FindOutcome::EmptyDirectory => {
            warn!(%path, "no files to match; skipping");
        }
        FindOutcome::Matched { result, inspection } => {
            let revision = result.revision().to_string();
            if result.is_exact() {
                match suggested {
                    Some(suggested) if suggested == revision => {
                        info!(%path, "unchanged");
                    }
                    Some(suggested) => {
                        info!(%path, %revision, "changed from {suggested}");
                    }
                    None => {}
                }
            } else {
                warn!(
                    %path,
                    matched = result.match_count(),
                    total = result.total(),
                    "closest match {revision} (was {})",
                    suggested.unwrap_or("unknown"),
                );
                if let Some(inspection) = inspection {
                    eprint!("{}", inspection.diff);
                }
            }
            writeln!(out, "{path} {revision}")?;
        }
    }

    out.flush()?;
    Ok(())
}
