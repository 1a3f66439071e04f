//! # Publish Sequencer
//!
//! Uploads a locally built artifact to the remote repository in the one
//! order that never exposes partial state as valid: **main file, then
//! descriptor, then everything else**, each as an independent synchronous
//! upload.
//!
//! The ordering is a correctness requirement, not an optimization. The
//! remote repository is known to misbehave (lock contention) when a
//! descriptor and several same-named files arrive concurrently or out of
//! order, and uploading the descriptor early would let a concurrent resolver
//! observe a descriptor pointing at a main file that does not exist yet.
//! Uploads are therefore strictly sequential; a failure aborts the remaining
//! sequence. A partially uploaded artifact remains possible, but because
//! main + descriptor go first, anything a resolver can see is resolvable.
//!
//! Local build outputs usually carry the unexpanded snapshot version in
//! their names (`widget-1.0-SNAPSHOT.tar.gz`); they are uploaded under the
//! expanded upload version (`widget-1.0-20210101.100000-1.tar.gz`), which is
//! what resolution looks for.

use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;

use crate::coordinates::{descriptor_file_name, ArtifactCoordinates, UploadVersion};
use crate::descriptor::{is_descriptor_file, Descriptor, DEFAULT_PACKAGING};
use crate::error::{Error, Result};
use crate::properties::{merged, Properties};
use crate::transport::RemoteTransport;

/// Uploads one artifact's files in the mandated order.
pub struct PublishSequencer<'t> {
    transport: &'t dyn RemoteTransport,
}

impl<'t> PublishSequencer<'t> {
    pub fn new(transport: &'t dyn RemoteTransport) -> Self {
        Self { transport }
    }

    /// Publish `files` as one artifact version.
    ///
    /// Validates that every basename belongs to the artifact, picks the main
    /// file, synthesizes a descriptor when none is present (unless
    /// `generate_descriptor` is false), and uploads main → descriptor →
    /// remaining files, each tagged with the merged identity+informational
    /// properties. Returns the remote paths uploaded, in upload order.
    ///
    /// An empty `files` is a success-no-op so an orchestrator can call
    /// publish unconditionally after every build attempt, including skipped
    /// builds.
    pub fn publish(
        &self,
        coords: &ArtifactCoordinates,
        upload_version: &UploadVersion,
        files: &[PathBuf],
        identity: &Properties,
        informational: &Properties,
        generate_descriptor: bool,
    ) -> Result<Vec<String>> {
        if files.is_empty() {
            info!(
                "nothing to publish for {}:{} {}",
                coords.group_id, coords.artifact_id, upload_version
            );
            return Ok(Vec::new());
        }

        let properties = merged(identity, informational);
        let plan = UploadPlan::new(coords, upload_version, files, generate_descriptor, &properties)?;
        let dest_root = coords.repo_path();
        let mut uploaded = Vec::new();

        let mut upload = |local: &Path, remote_name: &str| -> Result<()> {
            let remote = format!("{dest_root}/{remote_name}");
            debug!("uploading {} as {}", local.display(), remote);
            self.transport.upload(local, &remote, &properties)?;
            uploaded.push(remote);
            Ok(())
        };

        upload(&plan.main, &plan.main_remote_name)?;

        let descriptor_name = descriptor_file_name(&coords.artifact_id, upload_version.as_str());
        match &plan.descriptor {
            DescriptorSource::Local(path) => upload(path, &descriptor_name)?,
            DescriptorSource::Synthesized(descriptor) => {
                let mut temp = tempfile::NamedTempFile::new()?;
                descriptor.write_to(&mut temp)?;
                upload(temp.path(), &descriptor_name)?;
            }
            DescriptorSource::Disabled => {}
        }

        for (local, remote_name) in &plan.remaining {
            upload(local, remote_name)?;
        }

        info!(
            "published {} files to {}",
            uploaded.len(),
            dest_root
        );
        Ok(uploaded)
    }
}

/// What gets uploaded where, decided before the first byte leaves the
/// machine.
struct UploadPlan {
    main: PathBuf,
    main_remote_name: String,
    descriptor: DescriptorSource,
    remaining: Vec<(PathBuf, String)>,
}

enum DescriptorSource {
    /// A descriptor file was already among the local files.
    Local(PathBuf),
    /// Synthesized in memory from coordinates and properties.
    Synthesized(Descriptor),
    /// Generation was explicitly disabled and no local descriptor exists.
    Disabled,
}

impl UploadPlan {
    fn new(
        coords: &ArtifactCoordinates,
        upload_version: &UploadVersion,
        files: &[PathBuf],
        generate_descriptor: bool,
        properties: &Properties,
    ) -> Result<Self> {
        let nominal_prefix = format!("{}-{}", coords.artifact_id, coords.version);
        let upload_prefix = format!("{}-{}", coords.artifact_id, upload_version);

        // Local sanity check before spending network time: every file must
        // belong to this artifact, under either the unexpanded or the
        // already-expanded version.
        let mut entries = Vec::new();
        let mut offenders = Vec::new();
        for file in files {
            let basename = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            let suffix = basename
                .strip_prefix(&nominal_prefix)
                .or_else(|| basename.strip_prefix(&upload_prefix))
                .map(|s| s.to_string());
            match suffix {
                Some(suffix) => {
                    let remote_name = format!("{upload_prefix}{suffix}");
                    entries.push((file.clone(), basename, suffix, remote_name));
                }
                None => offenders.push(basename),
            }
        }
        if !offenders.is_empty() {
            return Err(Error::ArtifactNameMismatch {
                expected: nominal_prefix,
                files: offenders,
            });
        }

        // The main artifact is the classifier-less non-descriptor file
        // (suffix starts with the extension dot); a classifier file is
        // accepted only when nothing better exists.
        let main_index = entries
            .iter()
            .position(|(_, basename, suffix, _)| {
                !is_descriptor_file(basename) && suffix.starts_with('.')
            })
            .or_else(|| {
                entries
                    .iter()
                    .position(|(_, basename, _, _)| !is_descriptor_file(basename))
            })
            .ok_or_else(|| Error::MainArtifactNotFound {
                artifact: coords.artifact_id.clone(),
                count: files.len(),
            })?;

        let (main, _, main_suffix, main_remote_name) = entries.remove(main_index);

        let descriptor_index = entries
            .iter()
            .position(|(_, basename, _, _)| is_descriptor_file(basename));
        let descriptor = match descriptor_index {
            Some(index) => DescriptorSource::Local(entries.remove(index).0),
            None if generate_descriptor => {
                DescriptorSource::Synthesized(Descriptor {
                    group_id: coords.group_id.clone(),
                    artifact_id: coords.artifact_id.clone(),
                    version: upload_version.as_str().to_string(),
                    packaging: Some(infer_packaging(&main_suffix)),
                    properties: properties.clone(),
                })
            }
            None => DescriptorSource::Disabled,
        };

        Ok(Self {
            main,
            main_remote_name,
            descriptor,
            remaining: entries
                .into_iter()
                .map(|(local, _, _, remote_name)| (local, remote_name))
                .collect(),
        })
    }
}

/// Packaging of the main file, taken from its full extension chain
/// (`.tar.gz` → `tar.gz`).
fn infer_packaging(main_suffix: &str) -> String {
    main_suffix
        .split_once('.')
        .map(|(_, extension)| extension.to_string())
        .unwrap_or_else(|| DEFAULT_PACKAGING.to_string())
}

/// Enumerate the files of a local build-output directory, sorted by name
/// for a deterministic upload plan. A missing directory is an empty set.
pub fn enumerate_local_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        debug!("publish directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
