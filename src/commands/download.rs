//! # Download Command Implementation
//!
//! Resolves an artifact's version (including snapshot wildcard resolution)
//! and downloads every file of the winning version into the local cache,
//! mirroring the remote path under the cache root.
//!
//! On success the resulting file list is printed to stdout as a
//! delimiter-joined string with the main artifact file first; the build
//! orchestrator splits that line to locate the fetched files. An empty line
//! means no prebuilt artifact exists and the caller should build locally;
//! that outcome is NOT an error.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use prebuilt_cache::coordinates::ArtifactCoordinates;
use prebuilt_cache::defaults::{default_cache_root, DEFAULT_CLIENT, DEFAULT_DELIMITER};
use prebuilt_cache::fetcher::ArtifactFetcher;
use prebuilt_cache::output::{emoji, OnceNotice, OutputConfig};
use prebuilt_cache::properties::parse_properties;
use prebuilt_cache::resolver::VersionResolver;
use prebuilt_cache::transport::ClientProcess;

/// Arguments for the download command
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Repository name, e.g. libs-snapshot
    pub repo: String,

    /// Dotted group id, e.g. com.acme.build
    pub group: String,

    /// Artifact name
    pub name: String,

    /// Version, concrete (1.0) or snapshot pattern (1.0-SNAPSHOT)
    pub version: String,

    /// Identity property filter, repeatable (key=value)
    #[arg(long = "property", value_name = "KEY=VALUE")]
    pub properties: Vec<String>,

    /// Cache root directory
    #[arg(long, value_name = "DIR", env = "PREBUILT_CACHE_CACHE")]
    pub cache_root: Option<PathBuf>,

    /// Delimiter joining the printed file list
    #[arg(long, value_name = "STRING", default_value = DEFAULT_DELIMITER)]
    pub delimiter: String,

    /// Repository client program
    #[arg(long, value_name = "PROGRAM", env = "PREBUILT_CACHE_CLIENT", default_value = DEFAULT_CLIENT)]
    pub client: String,
}

/// Execute the download command
pub fn execute(args: DownloadArgs, output: &OutputConfig) -> Result<()> {
    let coords = ArtifactCoordinates::new(&args.repo, &args.group, &args.name, &args.version)?;
    let identity = parse_properties(&args.properties)?;

    let cache_root = args.cache_root.unwrap_or_else(default_cache_root);
    let target_dir = cache_root.join(coords.remote_path().trim_start_matches('/'));

    let transport = ClientProcess::new(args.client.as_str());
    let notice = OnceNotice::new(format!(
        "{} Checking {} for prebuilt artifacts...",
        emoji(output, "📦", "[FETCH]"),
        coords.repo_path()
    ));

    let resolver = VersionResolver::new(&transport);
    let files = match resolver.resolve(&coords, &identity, &target_dir, &notice)? {
        Some(resolved) => ArtifactFetcher::new(&transport).fetch(
            &coords,
            &resolved,
            &identity,
            &target_dir,
            &notice,
        )?,
        None => Vec::new(),
    };

    let joined = files
        .iter()
        .map(|f| f.display().to_string())
        .collect::<Vec<_>>()
        .join(&args.delimiter);
    println!("{joined}");

    Ok(())
}
