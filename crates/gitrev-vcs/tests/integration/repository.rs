// Copyright 2026 Oxide Computer Company

use crate::helpers::{TestRepo, git};
use anyhow::Result;
use camino_tempfile::Utf8TempDir;
use gitrev::SearchPolicy;
use gitrev_vcs::{Repository, Vcs};

/// Three commits: the first tagged lightweight `v1.0`, the second untagged,
/// the third tagged annotated `v2.0`.
fn setup() -> Result<(Utf8TempDir, TestRepo, [gitrev::ObjectId; 3])> {
    let temp = Utf8TempDir::with_prefix("gitrev-repository-")?;
    let mut repo = TestRepo::init(temp.path().join("upstream"))?;

    let c1 = repo.commit(&[("a.txt", "one\n")])?;
    repo.tag("v1.0")?;
    let c2 = repo.commit(&[("a.txt", "two\n")])?;
    let c3 = repo.commit(&[("a.txt", "three\n")])?;
    repo.tag_annotated("v2.0")?;

    Ok((temp, repo, [c1, c2, c3]))
}

#[test]
fn test_tags_peel_annotated() -> Result<()> {
    let (_temp, upstream, [c1, c2, c3]) = setup()?;
    let repo = Repository::new(Vcs::git()?, upstream.root());

    let tags = repo.tags();
    assert_eq!(tags.len(), 2);
    assert_eq!(tags.name_of(&c1), Some("v1.0"));
    assert_eq!(tags.name_of(&c2), None);
    assert_eq!(
        tags.name_of(&c3),
        Some("v2.0"),
        "annotated tag keyed by commit"
    );

    Ok(())
}

#[test]
fn test_tags_empty_when_untagged() -> Result<()> {
    let temp = Utf8TempDir::with_prefix("gitrev-repository-")?;
    let mut upstream = TestRepo::init(temp.path().join("upstream"))?;
    upstream.commit(&[("a.txt", "one\n")])?;

    let repo = Repository::new(Vcs::git()?, upstream.root());
    assert!(repo.tags().is_empty(), "show-ref failure means no tags");

    Ok(())
}

#[test]
fn test_candidates_tagged_first() -> Result<()> {
    let (_temp, upstream, [c1, c2, c3]) = setup()?;
    let repo = Repository::new(Vcs::git()?, upstream.root());

    let candidates = repo.candidates(None, &SearchPolicy::default())?;
    assert_eq!(
        candidates.order,
        vec![c3, c1, c2],
        "tagged revisions newest first, then untagged"
    );

    Ok(())
}

#[test]
fn test_candidates_suggested_first() -> Result<()> {
    let (_temp, upstream, [c1, c2, c3]) = setup()?;
    let repo = Repository::new(Vcs::git()?, upstream.root());
    let policy = SearchPolicy::default();

    let by_commit = repo.candidates(Some(&c2.to_string()), &policy)?;
    assert_eq!(by_commit.order, vec![c2, c3, c1], "suggested commit ID");

    let by_tag = repo.candidates(Some("v1.0"), &policy)?;
    assert_eq!(by_tag.order, vec![c1, c3, c2], "suggested tag name");

    let short = &c2.to_string()[..10];
    let by_prefix = repo.candidates(Some(short), &policy)?;
    assert_eq!(by_prefix.order, vec![c2, c3, c1], "abbreviated commit ID");

    let unknown = repo.candidates(Some("no-such-revision"), &policy)?;
    assert_eq!(unknown.order, vec![c3, c1, c2], "unknown suggestion ignored");

    Ok(())
}

#[test]
fn test_candidates_tag_only_threshold() -> Result<()> {
    let (_temp, upstream, [c1, _c2, c3]) = setup()?;
    let repo = Repository::new(Vcs::git()?, upstream.root());

    let candidates =
        repo.candidates(None, &SearchPolicy { tag_only_threshold: 2 })?;
    assert_eq!(candidates.order, vec![c3, c1], "untagged revision dropped");

    Ok(())
}

#[test]
fn test_candidates_include_all_refs() -> Result<()> {
    let (_temp, upstream, _) = setup()?;
    git(upstream.root(), &["checkout", "--quiet", "-b", "side", "v1.0"])?;
    let mut upstream = upstream;
    let side = upstream.commit(&[("b.txt", "side\n")])?;

    let repo = Repository::new(Vcs::git()?, upstream.root());
    let candidates = repo.candidates(None, &SearchPolicy::default())?;
    assert!(
        candidates.order.contains(&side),
        "commits on other branches are candidates"
    );
    assert_eq!(candidates.order.len(), 4);

    Ok(())
}
