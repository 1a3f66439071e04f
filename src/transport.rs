//! # Remote Transport
//!
//! The boundary between artifact logic and the remote repository. The
//! resolver, fetcher and publish sequencer only ever talk to the
//! [`RemoteTransport`] trait, which returns structured results; every process
//! invocation and every line of stdout parsing lives in the single
//! [`ClientProcess`] adapter. This keeps the artifact logic unit-testable
//! without any real process execution.
//!
//! ## Design
//!
//! The production implementation shells out to an external repository client
//! binary (`rt` by default), the same way repository access elsewhere in this
//! codebase wraps the system tool instead of reimplementing its wire
//! protocol. The client handles authentication, retries inside a single call,
//! and the repository's Maven2 path conventions; we hand it a path, a name
//! pattern and a property filter and consume its JSON output.
//!
//! All three operations are synchronous and blocking. No timeout is imposed
//! here; if the client hangs, the caller hangs (timeouts are the client's
//! responsibility).

use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::properties::Properties;

/// One file of a remote listing, identified by its repository-relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub path: String,
}

impl RemoteFile {
    /// The final path component.
    pub fn basename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Typed interface to the remote repository.
///
/// Property filters use permissive-missing semantics: a remote file lacking a
/// value for a filtered property is treated as matching (see
/// [`crate::properties::matches_filter`]). All operations may fail with
/// [`Error::Transport`] carrying the client's diagnostic output.
pub trait RemoteTransport {
    /// List remote files under `path` whose basename matches `name_pattern`.
    fn list(
        &self,
        path: &str,
        name_pattern: &str,
        properties: &Properties,
    ) -> Result<Vec<RemoteFile>>;

    /// Download matching remote files into `target_dir`, returning the local
    /// paths of the materialized files in listing order.
    fn download(
        &self,
        path: &str,
        name_pattern: &str,
        properties: &Properties,
        target_dir: &Path,
    ) -> Result<Vec<PathBuf>>;

    /// Upload one local file to `remote_path`, tagging it with `properties`.
    fn upload(&self, local_file: &Path, remote_path: &str, properties: &Properties) -> Result<()>;
}

/// Entry of the client's JSON output.
#[derive(Debug, Deserialize)]
struct ClientEntry {
    path: String,
}

/// Production transport: spawns the external repository client per
/// operation and parses its JSON stdout.
pub struct ClientProcess {
    program: String,
}

impl ClientProcess {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run one client invocation and return its stdout.
    ///
    /// A spawn failure or a non-zero exit becomes a transport error carrying
    /// the full command line and the client's stderr, so a network failure is
    /// never mistaken for an empty listing.
    fn invoke(&self, args: &[String], target: &str) -> Result<String> {
        let command_line = format!("{} {}", self.program, args.join(" "));
        debug!("running repository client: {command_line}");

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| Error::Transport {
                command: command_line.clone(),
                path: target.to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(Error::Transport {
                command: command_line,
                path: target.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn parse_entries(&self, stdout: &str, command: &str, target: &str) -> Result<Vec<ClientEntry>> {
        serde_json::from_str(stdout).map_err(|e| Error::Transport {
            command: command.to_string(),
            path: target.to_string(),
            message: format!("unparseable client output: {e}"),
        })
    }

    fn spec(path: &str, name_pattern: &str) -> String {
        format!("{}/{}", path.trim_end_matches('/'), name_pattern)
    }

    /// Render a property filter as the client's `--props k=v;k2=v2` argument.
    fn props_args(properties: &Properties) -> Vec<String> {
        if properties.is_empty() {
            return Vec::new();
        }
        let joined = properties
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(";");
        vec!["--props".to_string(), joined]
    }
}

impl RemoteTransport for ClientProcess {
    fn list(
        &self,
        path: &str,
        name_pattern: &str,
        properties: &Properties,
    ) -> Result<Vec<RemoteFile>> {
        let spec = Self::spec(path, name_pattern);
        let mut args = vec!["search".to_string(), spec];
        args.extend(Self::props_args(properties));

        let stdout = self.invoke(&args, path)?;
        let entries = self.parse_entries(&stdout, "search", path)?;
        Ok(entries
            .into_iter()
            .map(|e| RemoteFile { path: e.path })
            .collect())
    }

    fn download(
        &self,
        path: &str,
        name_pattern: &str,
        properties: &Properties,
        target_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(target_dir)?;

        let spec = Self::spec(path, name_pattern);
        let mut args = vec![
            "download".to_string(),
            spec,
            target_dir.display().to_string(),
        ];
        args.extend(Self::props_args(properties));

        let stdout = self.invoke(&args, path)?;
        let entries = self.parse_entries(&stdout, "download", path)?;
        Ok(entries.into_iter().map(|e| PathBuf::from(e.path)).collect())
    }

    fn upload(&self, local_file: &Path, remote_path: &str, properties: &Properties) -> Result<()> {
        let mut args = vec![
            "upload".to_string(),
            local_file.display().to_string(),
            remote_path.to_string(),
        ];
        args.extend(Self::props_args(properties));

        self.invoke(&args, remote_path)?;
        Ok(())
    }
}
