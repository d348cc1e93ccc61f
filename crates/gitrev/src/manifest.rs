// Copyright 2026 Oxide Computer Company

//! Vendor manifest lines.

use camino::{Utf8Path, Utf8PathBuf};

/// One entry in a vendor manifest: a vendored path and the revision it was
/// last recorded at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestEntry {
    path: Utf8PathBuf,
    suggested: String,
}

impl ManifestEntry {
    /// Creates a new entry.
    pub fn new(
        path: impl Into<Utf8PathBuf>,
        suggested: impl Into<String>,
    ) -> Self {
        ManifestEntry { path: path.into(), suggested: suggested.into() }
    }

    /// Returns the vendored path, which doubles as the import path of the
    /// upstream repository.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Returns the recorded revision: a commit ID or a tag name.
    pub fn suggested(&self) -> &str {
        &self.suggested
    }
}

/// A parsed line of a vendor manifest.
///
/// Manifests are line-oriented. A line with exactly two whitespace-separated
/// fields is an entry. Anything else is kept verbatim so it can be echoed
/// back unchanged, as is any line starting with `#`.
///
/// # Examples
///
/// ```
/// use gitrev::ManifestLine;
///
/// let line = ManifestLine::parse("github.com/foo/bar v1.2.0");
/// let entry = line.entry().unwrap();
/// assert_eq!(entry.path(), "github.com/foo/bar");
/// assert_eq!(entry.suggested(), "v1.2.0");
///
/// let comment = ManifestLine::parse("# pinned by hand");
/// assert!(comment.entry().is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ManifestLine {
    /// A `path revision` entry.
    Entry(ManifestEntry),
    /// Any other line, without its trailing newline.
    Verbatim(String),
}

impl ManifestLine {
    /// Parses a single line. Never fails.
    pub fn parse(line: &str) -> Self {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim_start().starts_with('#') {
            return ManifestLine::Verbatim(line.to_owned());
        }
        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next(), fields.next()) {
            (Some(path), Some(suggested), None) => {
                ManifestLine::Entry(ManifestEntry::new(path, suggested))
            }
            _ => ManifestLine::Verbatim(line.to_owned()),
        }
    }

    /// Returns the entry, if this line is one.
    pub fn entry(&self) -> Option<&ManifestEntry> {
        match self {
            ManifestLine::Entry(entry) => Some(entry),
            ManifestLine::Verbatim(_) => None,
        }
    }
}
