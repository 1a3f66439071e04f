//! # Artifact Fetcher
//!
//! Downloads every file of one concrete artifact version into the local
//! cache directory and orders the result so the main artifact file comes
//! first; callers rely on "first element = main artifact" as a stable
//! contract.
//!
//! The target directory mirrors the remote path under the cache root
//! (`cacheRoot + remotePath`); that mirrored layout is itself a contract the
//! build orchestrator uses to locate fetched files. Downloaded files stay on
//! disk after the call: the disk location is the cache.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::coordinates::{all_files_pattern, ArtifactCoordinates};
use crate::error::{Error, Result};
use crate::output::OnceNotice;
use crate::properties::Properties;
use crate::resolver::ResolvedVersion;
use crate::transport::RemoteTransport;

/// Downloads all files of a resolved artifact version.
pub struct ArtifactFetcher<'t> {
    transport: &'t dyn RemoteTransport,
}

impl<'t> ArtifactFetcher<'t> {
    pub fn new(transport: &'t dyn RemoteTransport) -> Self {
        Self { transport }
    }

    /// Fetch every file of the resolved version into `target_dir`.
    ///
    /// Returns the local paths with the main artifact file first and the
    /// remaining files in listing order (stable, not re-sorted). An empty
    /// result means the descriptor matched but no files were found: an
    /// upstream race or incomplete upload, reported as "no prebuilt
    /// artifact" rather than an error. A non-empty result that lacks the
    /// main file promised by the descriptor is a hard inconsistency
    /// (`MissingMainArtifact`).
    pub fn fetch(
        &self,
        coords: &ArtifactCoordinates,
        resolved: &ResolvedVersion,
        identity: &Properties,
        target_dir: &Path,
        notice: &OnceNotice,
    ) -> Result<Vec<PathBuf>> {
        let pattern = all_files_pattern(&coords.artifact_id, &resolved.version);
        debug!(
            "fetching {} from {} into {}",
            pattern,
            coords.repo_path(),
            target_dir.display()
        );

        notice.emit();
        let files = self
            .transport
            .download(&coords.repo_path(), &pattern, identity, target_dir)?;

        if files.is_empty() {
            warn!(
                "descriptor {} matched but no files were found under {}; \
                 treating as no prebuilt artifact",
                resolved.descriptor_path.display(),
                coords.repo_path()
            );
            return Ok(Vec::new());
        }

        partition_main_first(files, &resolved.descriptor.main_artifact_filename(), coords)
    }
}

/// Reorder `files` so the file named `main_filename` comes first; the rest
/// keep their listing order.
fn partition_main_first(
    mut files: Vec<PathBuf>,
    main_filename: &str,
    coords: &ArtifactCoordinates,
) -> Result<Vec<PathBuf>> {
    let position = files
        .iter()
        .position(|f| f.file_name().and_then(|n| n.to_str()) == Some(main_filename));

    match position {
        Some(index) => {
            let main = files.remove(index);
            files.insert(0, main);
            Ok(files)
        }
        None => Err(Error::MissingMainArtifact {
            expected: main_filename.to_string(),
            path: coords.repo_path(),
        }),
    }
}
