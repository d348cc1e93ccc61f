// Copyright 2026 Oxide Computer Company

use crate::helpers::{TestRepo, git, write_tree};
use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use camino_tempfile::Utf8TempDir;
use gitrev::RevisionName;
use gitrev_vcs::{
    Acquired, CloneSource, FindOutcome, Finder, RepoCache, Vcs,
};
use std::fs;

const IMPORT_PATH: &str = "example.com/acme/lib";

const V1: &[(&str, &str)] =
    &[("lib.go", "package lib // v1\n"), ("util/util.go", "package util\n")];
const V2: &[(&str, &str)] = &[
    ("lib.go", "package lib // v2\n"),
    ("util/util.go", "package util\n"),
    ("extra.go", "package lib\n"),
];

/// A temporary layout with an upstream repository under `upstream/`, a
/// clone cache under `cache/`, and a vendor tree under `vendor/`.
struct Fixture {
    temp: Utf8TempDir,
    upstream: TestRepo,
}

impl Fixture {
    /// Upstream history: v1.0 (tagged), an untagged commit, v2.0 (tagged).
    fn new() -> Result<Self> {
        let temp = Utf8TempDir::with_prefix("gitrev-finder-")?;
        let mut upstream =
            TestRepo::init(temp.path().join("upstream").join(IMPORT_PATH))?;
        upstream.commit(V1)?;
        upstream.tag("v1.0")?;
        upstream.commit(&[("lib.go", "package lib // wip\n")])?;
        upstream.commit(V2)?;
        upstream.tag_annotated("v2.0")?;
        Ok(Fixture { temp, upstream })
    }

    fn vendor_dir(&self) -> Utf8PathBuf {
        self.temp.path().join("vendor").join(IMPORT_PATH)
    }

    fn cache(&self) -> Result<RepoCache> {
        let source = CloneSource::Git {
            base_url: format!("{}/", self.temp.path().join("upstream")),
        };
        Ok(RepoCache::new(Vcs::git()?, self.temp.path().join("cache"))
            .with_source(source))
    }

    fn finder(&self) -> Result<Finder> {
        Ok(Finder::new(Vcs::git()?, self.cache()?))
    }

    fn find(&self, suggested: Option<&str>) -> Result<FindOutcome> {
        Ok(self.finder()?.find(
            &self.vendor_dir(),
            Utf8Path::new(IMPORT_PATH),
            suggested,
        )?)
    }
}

#[test]
fn test_exact_match_on_tag() -> Result<()> {
    let fixture = Fixture::new()?;
    write_tree(&fixture.vendor_dir(), V1)?;

    match fixture.find(None)? {
        FindOutcome::Matched { result, inspection } => {
            assert!(result.is_exact());
            assert_eq!(result.revision(), &RevisionName::Tag("v1.0".into()));
            assert!(inspection.is_none(), "exact matches are not inspected");
        }
        other => panic!("expected a match, got {other:?}"),
    }

    Ok(())
}

#[test]
fn test_exact_match_on_annotated_tag_subset() -> Result<()> {
    let fixture = Fixture::new()?;
    // Vendoring often prunes files; a subset of v2.0 still matches exactly.
    write_tree(&fixture.vendor_dir(), &V2[..2])?;

    match fixture.find(None)? {
        FindOutcome::Matched { result, .. } => {
            assert!(result.is_exact());
            assert_eq!(result.revision().to_string(), "v2.0");
        }
        other => panic!("expected a match, got {other:?}"),
    }

    Ok(())
}

#[test]
fn test_exact_match_on_untagged_commit() -> Result<()> {
    let fixture = Fixture::new()?;
    write_tree(
        &fixture.vendor_dir(),
        &[
            ("lib.go", "package lib // wip\n"),
            ("util/util.go", "package util\n"),
        ],
    )?;
    let wip = git(fixture.upstream.root(), &["rev-parse", "HEAD~1"])?;

    match fixture.find(None)? {
        FindOutcome::Matched { result, .. } => {
            assert!(result.is_exact());
            assert_eq!(result.revision().to_string(), wip);
        }
        other => panic!("expected a match, got {other:?}"),
    }

    Ok(())
}

#[test]
fn test_rerun_with_previous_result_is_unchanged() -> Result<()> {
    let fixture = Fixture::new()?;
    write_tree(&fixture.vendor_dir(), V1)?;

    let first = match fixture.find(None)? {
        FindOutcome::Matched { result, .. } => result,
        other => panic!("expected a match, got {other:?}"),
    };
    let previous = first.revision().to_string();

    // The second run reuses the cached clone.
    match fixture.find(Some(&previous))? {
        FindOutcome::Matched { result, .. } => {
            assert!(result.is_exact());
            assert_eq!(result.revision().to_string(), previous);
        }
        other => panic!("expected a match, got {other:?}"),
    }

    Ok(())
}

#[test]
fn test_closest_match_is_inspected() -> Result<()> {
    let fixture = Fixture::new()?;
    let patched = "package lib // v1 with local patch\n";
    write_tree(
        &fixture.vendor_dir(),
        &[("lib.go", patched), ("util/util.go", "package util\n")],
    )?;

    let (result, inspection) = match fixture.find(Some("v2.0"))? {
        FindOutcome::Matched { result, inspection } => (result, inspection),
        other => panic!("expected a match, got {other:?}"),
    };

    assert!(!result.is_exact());
    assert_eq!(result.match_count(), 1);
    assert_eq!(
        result.revision().to_string(),
        "v2.0",
        "all revisions tie on util.go; the suggestion is searched first"
    );

    let inspection = inspection.expect("inexact match should be inspected");
    assert_eq!(
        fs::read_to_string(inspection.worktree.join("lib.go"))?,
        patched,
        "vendored files are copied over the checkout"
    );
    assert!(
        inspection.worktree.join("extra.go").exists(),
        "files missing from the vendored copy stay as checked out"
    );
    assert!(
        inspection.diff.contains("+package lib // v1 with local patch"),
        "diff should show the local patch: {}",
        inspection.diff
    );

    // The next acquisition resets the overlay.
    let repo = match fixture.cache()?.acquire(Utf8Path::new(IMPORT_PATH))? {
        Acquired::Ready(repo) => repo,
        other => panic!("expected a repository, got {other:?}"),
    };
    assert_eq!(git(repo.root(), &["status", "--porcelain"])?, "");

    Ok(())
}

#[test]
fn test_closest_match_without_inspection() -> Result<()> {
    let fixture = Fixture::new()?;
    write_tree(&fixture.vendor_dir(), &[("lib.go", "package lib // fork\n")])?;

    let outcome = fixture.finder()?.with_inspect(false).find(
        &fixture.vendor_dir(),
        Utf8Path::new(IMPORT_PATH),
        None,
    )?;
    match outcome {
        FindOutcome::Matched { result, inspection } => {
            assert!(!result.is_exact());
            assert_eq!(result.match_count(), 0);
            assert!(inspection.is_none());
        }
        other => panic!("expected a match, got {other:?}"),
    }

    Ok(())
}

#[test]
fn test_empty_vendor_directory() -> Result<()> {
    let fixture = Fixture::new()?;
    fs::create_dir_all(fixture.vendor_dir())?;

    assert!(
        matches!(fixture.find(None)?, FindOutcome::EmptyDirectory),
        "an empty directory never matches"
    );

    Ok(())
}

#[test]
fn test_not_a_repository() -> Result<()> {
    let fixture = Fixture::new()?;
    write_tree(&fixture.vendor_dir(), V1)?;
    let cache = fixture.cache()?;
    fs::create_dir_all(cache.repo_path(Utf8Path::new(IMPORT_PATH)))?;

    assert!(matches!(
        fixture.find(None)?,
        FindOutcome::NotARepository { .. }
    ));

    Ok(())
}

#[test]
fn test_no_revisions() -> Result<()> {
    let temp = Utf8TempDir::with_prefix("gitrev-finder-")?;
    TestRepo::init(temp.path().join("upstream").join(IMPORT_PATH))?;
    let vendor_dir = temp.path().join("vendor");
    write_tree(&vendor_dir, V1)?;

    let cache = RepoCache::new(Vcs::git()?, temp.path().join("cache"))
        .with_source(CloneSource::Git {
            base_url: format!("{}/", temp.path().join("upstream")),
        });
    let outcome = Finder::new(Vcs::git()?, cache).find(
        &vendor_dir,
        Utf8Path::new(IMPORT_PATH),
        None,
    )?;

    assert!(
        matches!(outcome, FindOutcome::NoRevisions { .. }),
        "an empty upstream has no revisions, got {outcome:?}"
    );

    Ok(())
}

#[test]
fn test_refresh_picks_up_new_tags() -> Result<()> {
    let mut fixture = Fixture::new()?;
    write_tree(&fixture.vendor_dir(), V1)?;
    fixture.find(None)?;

    let v3 = &[("lib.go", "package lib // v3\n")];
    fixture.upstream.commit(v3)?;
    fixture.upstream.tag("v3.0")?;
    write_tree(&fixture.vendor_dir(), v3)?;
    fs::remove_dir_all(fixture.vendor_dir().join("util"))?;

    let cache = fixture.cache()?.with_refresh(true);
    let outcome = Finder::new(Vcs::git()?, cache).find(
        &fixture.vendor_dir(),
        Utf8Path::new(IMPORT_PATH),
        None,
    )?;
    match outcome {
        FindOutcome::Matched { result, .. } => {
            assert!(result.is_exact());
            assert_eq!(result.revision().to_string(), "v3.0");
        }
        other => panic!("expected a match, got {other:?}"),
    }

    Ok(())
}

#[test]
fn test_invalid_import_path() -> Result<()> {
    let fixture = Fixture::new()?;
    write_tree(&fixture.vendor_dir(), V1)?;

    for (path, expected) in [("../escape", ".."), ("/abs/path", "/")] {
        match fixture.finder()?.find(
            &fixture.vendor_dir(),
            Utf8Path::new(path),
            Some("v1.0"),
        )? {
            FindOutcome::InvalidImportPath { component } => {
                assert_eq!(component, expected, "for {path:?}");
            }
            other => {
                panic!("expected an invalid path for {path:?}, got {other:?}")
            }
        }
    }
    assert!(
        !fixture.temp.path().join("cache").exists(),
        "nothing is cloned for an invalid path"
    );

    Ok(())
}

#[test]
fn test_suggested_tag_sharing_a_commit_is_kept() -> Result<()> {
    let fixture = Fixture::new()?;
    // v0.5 sorts before v1.0, so it is the commit's preferred name.
    fixture.upstream.tag_at("v0.5", "v1.0")?;
    write_tree(&fixture.vendor_dir(), V1)?;

    let revision = |suggested: Option<&str>| -> Result<String> {
        match fixture.find(suggested)? {
            FindOutcome::Matched { result, .. } => {
                assert!(result.is_exact());
                Ok(result.revision().to_string())
            }
            other => panic!("expected a match, got {other:?}"),
        }
    };

    assert_eq!(revision(None)?, "v0.5");
    assert_eq!(revision(Some("v1.0"))?, "v1.0");
    assert_eq!(
        revision(Some("v2.0"))?,
        "v0.5",
        "a tag on another commit is not kept"
    );

    Ok(())
}
