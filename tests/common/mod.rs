//! Shared test utilities for the CLI E2E tests.
//!
//! The download and publish flows shell out to an external repository
//! client. For hermetic tests a stub client script is installed into a temp
//! directory and selected with `--client`; it serves files from (and records
//! uploads into) a plain directory given by the `STUB_STORE` environment
//! variable, speaking the same `search`/`download`/`upload` + JSON-array
//! contract the real client does.

use assert_fs::prelude::*;
use std::path::PathBuf;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{descriptor_xml, install_stub_client};
}

/// POSIX shell implementation of the repository client contract.
///
/// `search <spec>` and `download <spec> <target>` glob-match `<spec>`'s last
/// path component against the store and print a JSON array of `{"path"}`
/// objects; `upload <local> <remote>` copies into the store and appends a
/// line to `upload.log`. Extra arguments (`--props k=v`) are ignored.
const STUB_CLIENT: &str = r#"#!/bin/sh
set -eu
store="${STUB_STORE:?STUB_STORE must be set}"
cmd="$1"; shift
case "$cmd" in
  search|download)
    spec="$1"
    dir="${spec%/*}"
    pat="${spec##*/}"
    out=""
    sep=""
    if [ -d "$store/$dir" ]; then
      for f in "$store/$dir"/*; do
        [ -f "$f" ] || continue
        name="${f##*/}"
        case "$name" in
          $pat)
            if [ "$cmd" = "download" ]; then
              target="$2"
              mkdir -p "$target"
              cp "$f" "$target/$name"
              out="$out$sep{\"path\": \"$target/$name\"}"
            else
              out="$out$sep{\"path\": \"$dir/$name\"}"
            fi
            sep=", "
            ;;
        esac
      done
    fi
    printf '[%s]\n' "$out"
    ;;
  upload)
    local="$1"
    remote="$2"
    mkdir -p "$store/${remote%/*}"
    cp "$local" "$store/$remote"
    printf '%s\n' "$remote" >> "$store/upload.log"
    printf '[]\n'
    ;;
  *)
    echo "stub client: unknown command '$cmd'" >&2
    exit 2
    ;;
esac
"#;

/// Install the stub client into `temp` and create an empty store directory.
///
/// Returns `(client_path, store_path)`; pass the client path via `--client`
/// and the store path via the `STUB_STORE` environment variable.
#[allow(dead_code)]
pub fn install_stub_client(temp: &assert_fs::TempDir) -> (PathBuf, PathBuf) {
    let client = temp.child("stub-client");
    client.write_str(STUB_CLIENT).unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(client.path(), std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    let store = temp.child("store");
    store.create_dir_all().unwrap();

    (client.path().to_path_buf(), store.path().to_path_buf())
}

/// A minimal descriptor document for seeding the stub store.
#[allow(dead_code)]
pub fn descriptor_xml(group: &str, artifact: &str, version: &str, packaging: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <groupId>{group}</groupId>
  <artifactId>{artifact}</artifactId>
  <version>{version}</version>
  <packaging>{packaging}</packaging>
</project>
"#
    )
}
