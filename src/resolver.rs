//! # Version Resolver
//!
//! Turns a possibly-wildcarded version (snapshot pattern) into a concrete
//! version plus the descriptor that names it, or a definitive "not found",
//! without ever guessing a version that was not confirmed present remotely.
//!
//! ## Algorithm
//!
//! 1. A version ending in the snapshot marker is rewritten to a wildcard
//!    pattern covering all timestamped builds of that base version
//!    (`1.0-SNAPSHOT` → `1.0-*`); anything else is treated as already
//!    concrete (at most one descriptor can match).
//! 2. All descriptor files matching
//!    `<artifactId>-<versionPattern>.pom` under the artifact's remote path
//!    are listed and downloaded, filtered by the identity properties
//!    (permissive-missing semantics, applied by the remote side). The listing
//!    runs first so a miss never touches the local cache directory.
//! 3. Zero descriptors is a soft result (`Ok(None)`): the caller proceeds to
//!    build locally. A transport failure is a hard error and is never folded
//!    into "not found".
//! 4. Otherwise the descriptor filenames are ordered newest-first by the
//!    configured [`VersionComparator`] and the newest is parsed; its
//!    `version` field is the concrete version used for the subsequent fetch.
//!
//! Downloaded descriptors land in the caller-supplied target directory and
//! stay there; the disk location is the cache.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::{debug, warn};
use regex::Regex;

use crate::coordinates::{descriptor_file_name, ArtifactCoordinates, SNAPSHOT_SUFFIX};
use crate::descriptor::Descriptor;
use crate::error::Result;
use crate::output::OnceNotice;
use crate::properties::Properties;
use crate::transport::RemoteTransport;

/// Ordering strategy over descriptor filenames.
///
/// Separated from the resolver's control flow so that an artifact layout with
/// differently-shaped version strings can supply its own ordering without
/// touching resolution itself.
pub trait VersionComparator {
    /// Compare two descriptor basenames; `Ordering::Greater` means `a` is
    /// newer than `b`.
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

/// Newest-first by descending lexical order.
///
/// Timestamped snapshot filenames embed `YYYYMMDD.HHMMSS`, so descending
/// lexical order is equivalent to newest-first. This is cheap and
/// deterministic, but only correct for that fixed timestamp shape: names
/// that deviate from it sort in an undefined relative order (the resolver
/// logs a warning when it sees such names).
pub struct TimestampLexicalComparator;

impl TimestampLexicalComparator {
    /// Whether a descriptor basename carries a canonical
    /// `-YYYYMMDD.HHMMSS-<build>` suffix.
    pub fn is_timestamped(basename: &str) -> bool {
        static SHAPE: OnceLock<Regex> = OnceLock::new();
        let shape = SHAPE
            .get_or_init(|| Regex::new(r"-\d{8}\.\d{6}-\d+\.[^.]+$").expect("valid regex"));
        shape.is_match(basename)
    }
}

impl VersionComparator for TimestampLexicalComparator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.cmp(b)
    }
}

/// Outcome of a successful resolution: the concrete version, the descriptor
/// naming it, and where the descriptor file was materialized.
#[derive(Debug)]
pub struct ResolvedVersion {
    pub version: String,
    pub descriptor: Descriptor,
    pub descriptor_path: PathBuf,
}

/// Resolves wildcard versions against the remote repository.
pub struct VersionResolver<'t> {
    transport: &'t dyn RemoteTransport,
    comparator: Box<dyn VersionComparator>,
}

impl<'t> VersionResolver<'t> {
    /// Resolver with the standard timestamp-lexical ordering.
    pub fn new(transport: &'t dyn RemoteTransport) -> Self {
        Self::with_comparator(transport, Box::new(TimestampLexicalComparator))
    }

    /// Resolver with a custom ordering strategy.
    pub fn with_comparator(
        transport: &'t dyn RemoteTransport,
        comparator: Box<dyn VersionComparator>,
    ) -> Self {
        Self {
            transport,
            comparator,
        }
    }

    /// Resolve `coords` to a concrete version.
    ///
    /// Returns `Ok(None)` when no descriptor matches (the caller builds
    /// locally). Descriptor files are downloaded into `target_dir`.
    pub fn resolve(
        &self,
        coords: &ArtifactCoordinates,
        identity: &Properties,
        target_dir: &Path,
        notice: &OnceNotice,
    ) -> Result<Option<ResolvedVersion>> {
        let pattern = descriptor_file_name(&coords.artifact_id, &version_pattern(&coords.version));
        debug!(
            "resolving {}:{} against {} with pattern {}",
            coords.group_id,
            coords.artifact_id,
            coords.repo_path(),
            pattern
        );

        notice.emit();
        let listed = self
            .transport
            .list(&coords.repo_path(), &pattern, identity)?;
        if listed.is_empty() {
            debug!(
                "no descriptor matches {} under {}",
                pattern,
                coords.repo_path()
            );
            return Ok(None);
        }

        let mut descriptors =
            self.transport
                .download(&coords.repo_path(), &pattern, identity, target_dir)?;
        if descriptors.is_empty() {
            // Listed a moment ago but gone by download time; treat like any
            // other absence.
            warn!(
                "descriptors matching {} under {} disappeared between listing and download",
                pattern,
                coords.repo_path()
            );
            return Ok(None);
        }

        // Newest first. Lexical descending order is newest-first only for
        // canonically timestamped names; surface deviations instead of
        // silently picking an arbitrary one.
        if descriptors.len() > 1 {
            let odd: Vec<&str> = descriptors
                .iter()
                .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
                .filter(|n| !TimestampLexicalComparator::is_timestamped(n))
                .collect();
            if !odd.is_empty() {
                warn!(
                    "descriptor names without a timestamped suffix under {}: {}; \
                     newest-first selection among them is undefined",
                    coords.repo_path(),
                    odd.join(", ")
                );
            }
        }
        descriptors.sort_by(|a, b| {
            let name_a = a.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            let name_b = b.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            self.comparator.compare(name_a, name_b).reverse()
        });

        let newest = &descriptors[0];
        let descriptor = Descriptor::read(newest)?;
        debug!(
            "selected descriptor {} naming concrete version {}",
            newest.display(),
            descriptor.version
        );

        Ok(Some(ResolvedVersion {
            version: descriptor.version.clone(),
            descriptor,
            descriptor_path: newest.clone(),
        }))
    }
}

/// Rewrite a snapshot version to the wildcard pattern covering all of its
/// timestamped builds; concrete versions pass through unchanged.
fn version_pattern(version: &str) -> String {
    match version.strip_suffix(SNAPSHOT_SUFFIX) {
        Some(base) => format!("{base}-*"),
        None => version.to_string(),
    }
}
