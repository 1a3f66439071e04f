//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `prebuilt-cache` application. It uses the `thiserror` library to create a
//! comprehensive `Error` enum covering every anticipated failure mode, with
//! enough context attached for an operator to retry the failed step by hand.
//!
//! ## Taxonomy
//!
//! - **`Validation`**: bad coordinates or version strings. Raised before any
//!   network I/O is attempted.
//! - **`Transport`**: the remote repository client failed (listing, download
//!   or upload). Always fatal to the current operation and always carries the
//!   executed command plus the client's diagnostic output, so a true remote
//!   absence and a network failure are never confused.
//! - **`MalformedDescriptor`**: a descriptor file could not be parsed or is
//!   missing a required field.
//! - **`MissingMainArtifact`**: a descriptor promised a main artifact file
//!   that was not among the downloaded files.
//! - **`ArtifactNameMismatch`** / **`MainArtifactNotFound`**: local
//!   consistency failures detected before any upload is issued.
//!
//! Two outcomes are deliberately NOT errors: "no matching version found" and
//! "descriptor matched but zero files found". Both are soft results
//! (`None` / empty list) so callers can fall back to a local build without
//! special-casing exceptions.
//!
//! Nothing is retried automatically. A transient network failure fails the
//! whole build-cache decision for that artifact; callers fall back to a full
//! local build.

use thiserror::Error;

/// Main error type for prebuilt-cache operations
#[derive(Error, Debug)]
pub enum Error {
    /// Coordinates or a version string failed validation.
    ///
    /// Raised before any transport call is made.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The remote repository client failed.
    ///
    /// Includes the command that was executed, the remote path it targeted,
    /// and the client's diagnostic output.
    #[error("Transport error: {command} (path: {path}) - {message}")]
    Transport {
        command: String,
        path: String,
        message: String,
    },

    /// A descriptor file could not be parsed, or a required field is absent
    /// or duplicated.
    #[error("Malformed descriptor {path}: {message}")]
    MalformedDescriptor { path: String, message: String },

    /// The descriptor promised a main artifact file that is not among the
    /// downloaded files.
    #[error("Main artifact {expected} promised by the descriptor is missing from {path}")]
    MissingMainArtifact { expected: String, path: String },

    /// Local files do not belong to the artifact being published.
    #[error(
        "Artifact name mismatch: expected basenames starting with '{expected}': {}",
        files.join(", ")
    )]
    ArtifactNameMismatch {
        expected: String,
        files: Vec<String>,
    },

    /// No local file qualifies as the main artifact.
    #[error("No main artifact file found among {count} local files for {artifact}")]
    MainArtifactNotFound { artifact: String, count: usize },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
