//! # Prebuilt Cache Library
//!
//! This library resolves and publishes versioned, multi-file build artifacts
//! against a Maven-layout binary repository used as a build-time artifact
//! cache: before compiling a component, check whether an equivalent artifact
//! already exists remotely; if so, fetch it instead of building; after
//! building, optionally publish the new artifact back.
//!
//! ## Core Concepts
//!
//! - **Coordinates (`coordinates`)**: the (repo, group, artifact, version)
//!   tuple identifying an artifact, and the path/filename derivations the
//!   Maven2 layout implies. Versions may be snapshot patterns meaning
//!   "latest timestamped build of this base version".
//! - **Descriptor (`descriptor`)**: the POM-equivalent metadata file that is
//!   the authoritative record of an artifact's concrete version, packaging
//!   and properties.
//! - **Transport (`transport`)**: the typed boundary to the remote
//!   repository. The production implementation wraps an external repository
//!   client process; all artifact logic is written against the trait and is
//!   testable with an in-memory mock.
//! - **Resolution (`resolver`, `fetcher`)**: turn a wildcard version into a
//!   confirmed concrete version, then materialize its files under the local
//!   cache root with the main artifact first.
//! - **Publishing (`publisher`)**: upload a locally built artifact in the
//!   one order that never exposes partial state as valid (main, descriptor,
//!   extras).
//!
//! ## Execution Flow
//!
//! A build orchestrator calls resolve → fetch to obtain prebuilt files and
//! skips the local build on a hit; after a local build it calls publish.
//! Everything is synchronous and blocking: each remote operation completes
//! before the next begins, by design, and failures are never retried (a
//! transient failure fails the cache decision and the caller falls back to a
//! full local build).

pub mod coordinates;
pub mod defaults;
pub mod descriptor;
pub mod error;
pub mod fetcher;
pub mod output;
pub mod properties;
pub mod publisher;
pub mod resolver;
pub mod transport;

#[cfg(test)]
mod coordinates_proptest;
