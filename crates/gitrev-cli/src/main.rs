// Copyright 2026 Oxide Computer Company

//! CLI entry point for gitrev.
//!
//! This module handles argument parsing, logging setup, and exit codes. The
//! per-entry work lives in `report.rs`; the matching itself lives in the
//! `gitrev` and `gitrev-vcs` crates.

mod report;

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{CommandFactory, Parser};
use gitrev::{DEFAULT_TAG_ONLY_THRESHOLD, SearchPolicy};
use gitrev_vcs::{CloneSource, Finder, RepoCache, Vcs};
use std::io::{self, IsTerminal};
use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Find which upstream revision of a dependency was vendored.
#[derive(Parser, Debug)]
#[command(
    name = "gitrev",
    version,
    about = "Find which upstream revision of a dependency was vendored",
    long_about = "Hashes every file in a vendored directory and searches the \
                  upstream repository's history for the revision that \
                  contains them.\n\n\
                  Prints `<path> <revision>` for each entry on stdout. \
                  Diagnostics go to stderr."
)]
struct Cli {
    /// Vendored import paths (relative to --vendor-dir), or a single
    /// `vendor.conf` manifest.
    paths: Vec<Utf8PathBuf>,

    /// Manifest of `<path> <revision>` lines. Vendored paths are resolved
    /// against the `vendor` directory next to it.
    #[arg(long, conflicts_with = "paths")]
    manifest: Option<Utf8PathBuf>,

    /// Directory that explicit paths are relative to.
    #[arg(long, default_value = ".")]
    vendor_dir: Utf8PathBuf,

    /// Directory holding cached upstream clones [default: ~/.gitrev-cache].
    #[arg(long, env = "GITREV_CACHE")]
    cache_dir: Option<Utf8PathBuf>,

    /// Prefix joined with the import path to form the clone URL.
    #[arg(long, default_value = "https://")]
    clone_base: String,

    /// Fetch missing repositories with `go get -d` instead of `git clone`.
    #[arg(long, conflicts_with = "clone_base")]
    go_get: bool,

    /// The `go` binary used with --go-get.
    #[arg(long, default_value = "go")]
    go_binary: String,

    /// Search only tagged revisions when a repository has more revisions
    /// than this.
    #[arg(long, default_value_t = DEFAULT_TAG_ONLY_THRESHOLD)]
    max_revisions: usize,

    /// Fetch from upstream before searching a cached clone.
    #[arg(long)]
    refresh: bool,

    /// Don't check out and diff the closest revision when there is no
    /// exact match.
    #[arg(long)]
    no_inspect: bool,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all diagnostics except errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.paths.is_empty() && cli.manifest.is_none() {
        eprintln!("{}", Cli::command().render_usage());
        std::process::exit(1);
    }

    init_logging(cli.verbose, cli.quiet);

    let finder = build_finder(&cli)?;
    let mut stdout = io::stdout().lock();

    match manifest_path(&cli) {
        Some(manifest) => {
            report::run_manifest(&finder, manifest, &mut stdout)
        }
        None => report::run_paths(
            &finder,
            &cli.vendor_dir,
            &cli.paths,
            &mut stdout,
        ),
    }
}

/// Returns the manifest to process, if running in manifest mode.
///
/// A lone positional argument named `vendor.conf` is treated as a manifest.
fn manifest_path(cli: &Cli) -> Option<&Utf8Path> {
    if let Some(manifest) = &cli.manifest {
        return Some(manifest);
    }
    match cli.paths.as_slice() {
        [path] if path.as_str().ends_with("vendor.conf") => Some(path),
        _ => None,
    }
}

fn build_finder(cli: &Cli) -> anyhow::Result<Finder> {
    let vcs = Vcs::git()?;

    let cache_dir = match &cli.cache_dir {
        Some(dir) => dir.clone(),
        None => default_cache_dir()?,
    };
    // go get requires an absolute GOPATH.
    let cache_dir = std::path::absolute(&cache_dir)
        .with_context(|| format!("failed to resolve {cache_dir}"))?;
    let cache_dir = Utf8PathBuf::try_from(cache_dir)
        .context("cache directory is not valid UTF-8")?;

    let source = if cli.go_get {
        CloneSource::GoGet { binary: cli.go_binary.clone() }
    } else {
        CloneSource::Git { base_url: cli.clone_base.clone() }
    };
    let cache = RepoCache::new(vcs.clone(), cache_dir)
        .with_source(source)
        .with_refresh(cli.refresh);

    Ok(Finder::new(vcs, cache)
        .with_policy(SearchPolicy { tag_only_threshold: cli.max_revisions })
        .with_inspect(!cli.no_inspect))
}

fn default_cache_dir() -> anyhow::Result<Utf8PathBuf> {
    let Some(home) = std::env::var_os("HOME") else {
        bail!("$HOME is not set; pass --cache-dir or set $GITREV_CACHE");
    };
    let home = Utf8PathBuf::try_from(std::path::PathBuf::from(home))
        .context("$HOME is not valid UTF-8")?;
    Ok(home.join(".gitrev-cache"))
}

fn init_logging(verbosity: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if let Ok(filter) = EnvFilter::try_from_default_env() {
        filter
    } else {
        // "gitrev" also covers the gitrev_vcs and gitrev_cli targets.
        match verbosity {
            0 => EnvFilter::new("warn,gitrev=info"),
            1 => EnvFilter::new("warn,gitrev=debug"),
            2 => EnvFilter::new("warn,gitrev=trace"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(io::stderr().is_terminal())
                .with_writer(io::stderr),
        )
        .init();
}
