//! # Publish Command Implementation
//!
//! Uploads the files of a locally built artifact version to the remote
//! repository, in the ordered sequence the publish protocol mandates (main
//! file, descriptor, remaining files).
//!
//! Publishing an empty or missing directory is a success-no-op so build
//! scripts can invoke this unconditionally after every build attempt,
//! including builds that were skipped because a prebuilt artifact was used.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use prebuilt_cache::coordinates::{ArtifactCoordinates, UploadVersion};
use prebuilt_cache::defaults::DEFAULT_CLIENT;
use prebuilt_cache::output::{emoji, OutputConfig};
use prebuilt_cache::properties::parse_properties;
use prebuilt_cache::publisher::{enumerate_local_files, PublishSequencer};
use prebuilt_cache::transport::ClientProcess;

/// Arguments for the publish command
#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Repository name, e.g. libs-snapshot
    pub repo: String,

    /// Dotted group id, e.g. com.acme.build
    pub group: String,

    /// Artifact name
    pub name: String,

    /// Nominal version the build was made for (e.g. 1.0-SNAPSHOT)
    pub version: String,

    /// Concrete upload version, <base>-<timestamp>-<build>
    pub upload_version: String,

    /// Directory holding the build output files
    pub dir: PathBuf,

    /// Identity properties, repeatable (key=value)
    #[arg(long = "property", value_name = "KEY=VALUE")]
    pub properties: Vec<String>,

    /// Informational properties, repeatable (key=value); never used as a filter
    #[arg(long = "info-property", value_name = "KEY=VALUE")]
    pub info_properties: Vec<String>,

    /// Do not synthesize a descriptor when the directory has none
    #[arg(long)]
    pub no_descriptor: bool,

    /// Repository client program
    #[arg(long, value_name = "PROGRAM", env = "PREBUILT_CACHE_CLIENT", default_value = DEFAULT_CLIENT)]
    pub client: String,
}

/// Execute the publish command
pub fn execute(args: PublishArgs, output: &OutputConfig) -> Result<()> {
    let coords = ArtifactCoordinates::new(&args.repo, &args.group, &args.name, &args.version)?;
    let upload_version = UploadVersion::parse(&args.upload_version)?;
    let identity = parse_properties(&args.properties)?;
    let informational = parse_properties(&args.info_properties)?;

    let files = enumerate_local_files(&args.dir)?;

    let transport = ClientProcess::new(args.client.as_str());
    let sequencer = PublishSequencer::new(&transport);
    let uploaded = sequencer.publish(
        &coords,
        &upload_version,
        &files,
        &identity,
        &informational,
        !args.no_descriptor,
    )?;

    if uploaded.is_empty() {
        println!(
            "{} Nothing to publish from {}",
            emoji(output, "📭", "[SKIP]"),
            args.dir.display()
        );
    } else {
        println!(
            "{} Published {} files to {}",
            emoji(output, "✅", "[OK]"),
            uploaded.len(),
            coords.repo_path()
        );
    }

    Ok(())
}
