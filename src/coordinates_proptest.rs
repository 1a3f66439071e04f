//! Property-based tests for the coordinate model.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::coordinates::{all_files_pattern, descriptor_file_name, ArtifactCoordinates};
    use proptest::prelude::*;

    fn group_id() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9]{0,7}(\\.[a-z][a-z0-9]{0,7}){0,3}"
    }

    fn artifact_id() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,11}"
    }

    fn version() -> impl Strategy<Value = String> {
        "[0-9]{1,2}\\.[0-9]{1,2}(-SNAPSHOT)?"
    }

    proptest! {
        /// Property: remote_path is a pure function (same input = same output)
        #[test]
        fn remote_path_is_deterministic(g in group_id(), a in artifact_id(), v in version()) {
            let coords = ArtifactCoordinates::new("libs", &g, &a, &v).unwrap();
            prop_assert_eq!(coords.remote_path(), coords.remote_path());
        }

        /// Property: the group id's dots are the only characters converted
        /// to path separators
        #[test]
        fn remote_path_converts_group_dots_only(g in group_id(), a in artifact_id(), v in version()) {
            let coords = ArtifactCoordinates::new("libs", &g, &a, &v).unwrap();
            let path = coords.remote_path();

            let expected = format!("/{}/{}/{}", g.replace('.', "/"), a, v);
            prop_assert_eq!(&path, &expected);

            // Segment count: group segments + artifact + version.
            let segments: Vec<&str> = path[1..].split('/').collect();
            let group_segments = g.split('.').count();
            prop_assert_eq!(segments.len(), group_segments + 2);
            prop_assert_eq!(segments[segments.len() - 2], a.as_str());
            prop_assert_eq!(segments[segments.len() - 1], v.as_str());
        }

        /// Property: derived filenames always carry the artifact id and
        /// version verbatim
        #[test]
        fn derived_names_embed_artifact_and_version(a in artifact_id(), v in version()) {
            let descriptor = descriptor_file_name(&a, &v);
            prop_assert_eq!(&descriptor, &format!("{a}-{v}.pom"));

            let pattern = all_files_pattern(&a, &v);
            prop_assert!(descriptor.starts_with(pattern.trim_end_matches('*')));
        }

        /// Property: any version containing a path-invalid character is
        /// rejected before a coordinates value can exist
        #[test]
        fn invalid_version_chars_always_rejected(
            v in version(),
            bad in prop::sample::select(vec!['/', '\\', '[', ']']),
            split in 0usize..4,
        ) {
            let position = split.min(v.len());
            let mut corrupted = v.clone();
            corrupted.insert(position, bad);
            let result = ArtifactCoordinates::new("libs", "com.acme", "widget", &corrupted);
            prop_assert!(result.is_err());
        }
    }
}
