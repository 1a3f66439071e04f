//! # Coordinate Model
//!
//! Pure data types identifying an artifact inside a Maven-layout repository,
//! plus the path and filename derivations shared by resolution and publish.
//!
//! Everything here is a total function over validated input: validation
//! happens once, in the constructors, and never touches the network. A
//! coordinates value that exists is a coordinates value that is safe to turn
//! into a remote path.

use crate::error::{Error, Result};

/// File extension of the metadata descriptor (Maven POM equivalent).
pub const DESCRIPTOR_EXT: &str = "pom";

/// Version suffix marking "any timestamped build of this base version".
pub const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";

/// Characters that must not appear in a version string because they are
/// invalid in a file path component or a listing pattern.
const INVALID_VERSION_CHARS: [char; 4] = ['/', '\\', '[', ']'];

/// Logical coordinates of an artifact: repository, group, name and version.
///
/// `version` may be concrete (`1.0`) or a snapshot pattern (`1.0-SNAPSHOT`)
/// meaning "any timestamped build of base version 1.0".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactCoordinates {
    pub repo: String,
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl ArtifactCoordinates {
    /// Create validated coordinates.
    ///
    /// Rejects a `group_id` containing path separators (only `.` is allowed
    /// as a segment separator) and a `version` containing characters that are
    /// invalid in a path component (`/`, `\`, `[`, `]`). Validation errors
    /// are raised here, before any network call can happen.
    pub fn new(repo: &str, group_id: &str, artifact_id: &str, version: &str) -> Result<Self> {
        if repo.is_empty() {
            return Err(Error::Validation {
                message: "repository name must not be empty".to_string(),
            });
        }
        if group_id.is_empty() || group_id.contains('/') || group_id.contains('\\') {
            return Err(Error::Validation {
                message: format!(
                    "group id '{group_id}' must be a non-empty dotted name without path separators"
                ),
            });
        }
        if artifact_id.is_empty() {
            return Err(Error::Validation {
                message: "artifact id must not be empty".to_string(),
            });
        }
        validate_version(version)?;

        Ok(Self {
            repo: repo.to_string(),
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
        })
    }

    /// Repository-relative path of this artifact version.
    ///
    /// `/ + groupId.replace('.','/') + / + artifactId + / + version`. The
    /// dots of the group id are the only characters converted to path
    /// separators. This path is both the listing root and the upload
    /// destination root.
    pub fn remote_path(&self) -> String {
        format!(
            "/{}/{}/{}",
            self.group_id.replace('.', "/"),
            self.artifact_id,
            self.version
        )
    }

    /// The listing/upload root including the repository name, as understood
    /// by the repository client (`<repo><remote_path>`).
    pub fn repo_path(&self) -> String {
        format!("{}{}", self.repo, self.remote_path())
    }

    /// True when the version is a snapshot pattern rather than a concrete
    /// version.
    pub fn is_snapshot(&self) -> bool {
        self.version.ends_with(SNAPSHOT_SUFFIX)
    }
}

/// A fully concrete version used only for publishing.
///
/// Disambiguates a snapshot base version into `<base>-<timestamp>-<build>`
/// form: exactly two embedded separators, and a base segment that contains no
/// separator characters itself (which is what makes the base a usable
/// filename prefix).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadVersion {
    version: String,
    base_len: usize,
}

impl UploadVersion {
    /// Parse and validate an upload version string.
    pub fn parse(version: &str) -> Result<Self> {
        validate_version(version)?;

        let segments: Vec<&str> = version.split('-').collect();
        if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
            return Err(Error::Validation {
                message: format!(
                    "upload version '{version}' must have the form <base>-<timestamp>-<build>"
                ),
            });
        }

        Ok(Self {
            version: version.to_string(),
            base_len: segments[0].len(),
        })
    }

    /// The full `<base>-<timestamp>-<build>` string.
    pub fn as_str(&self) -> &str {
        &self.version
    }

    /// The base version segment, e.g. `1.0` for `1.0-20210101.100000-1`.
    pub fn base(&self) -> &str {
        &self.version[..self.base_len]
    }
}

impl std::fmt::Display for UploadVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.version)
    }
}

/// Filename of the descriptor for one concrete artifact version:
/// `<artifactId>-<version>.<descriptor-ext>`.
///
/// Also used with a wildcard version pattern to build a listing pattern for
/// all descriptors of a base version.
pub fn descriptor_file_name(artifact_id: &str, version: &str) -> String {
    format!("{artifact_id}-{version}.{DESCRIPTOR_EXT}")
}

/// Glob pattern matching every file of one concrete artifact version:
/// `<artifactId>-<version>*`.
pub fn all_files_pattern(artifact_id: &str, version: &str) -> String {
    format!("{artifact_id}-{version}*")
}

fn validate_version(version: &str) -> Result<()> {
    if version.is_empty() {
        return Err(Error::Validation {
            message: "version must not be empty".to_string(),
        });
    }
    if version.contains(INVALID_VERSION_CHARS) {
        return Err(Error::Validation {
            message: format!(
                "version '{version}' contains characters invalid in a path component (/, \\, [, ])"
            ),
        });
    }
    Ok(())
}
