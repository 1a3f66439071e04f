//! # Artifact Properties
//!
//! Key/value properties attached to remote files. Two independent sets exist:
//!
//! - **identity properties** filter which remote artifacts are acceptable
//!   cache hits during resolution (they must match for caching correctness);
//! - **informational properties** are attached on publish purely for
//!   record-keeping and are never used as a filter.
//!
//! The two sets are merged only on the publish side; resolution sees identity
//! properties alone.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// An ordered mapping of property names to string values.
///
/// A `BTreeMap` keeps iteration order deterministic, which matters both for
/// descriptor serialization and for building a stable client command line.
pub type Properties = BTreeMap<String, String>;

/// Parse a single `key=value` CLI argument.
pub fn parse_property(arg: &str) -> Result<(String, String)> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(Error::Validation {
            message: format!("property '{arg}' must have the form key=value"),
        }),
    }
}

/// Parse repeated `key=value` arguments into a property set.
///
/// A key given twice keeps the last value, matching how repeatable CLI flags
/// usually override each other.
pub fn parse_properties(args: &[String]) -> Result<Properties> {
    let mut properties = Properties::new();
    for arg in args {
        let (key, value) = parse_property(arg)?;
        properties.insert(key, value);
    }
    Ok(properties)
}

/// Merge identity and informational properties for publishing.
///
/// On a key clash the identity value wins: identity keys define what the
/// artifact *is* and must not be shadowed by record-keeping values.
pub fn merged(identity: &Properties, informational: &Properties) -> Properties {
    let mut all = informational.clone();
    all.extend(identity.iter().map(|(k, v)| (k.clone(), v.clone())));
    all
}

/// Permissive-missing property matching.
///
/// A file matches the filter when every filtered key that the file *has* a
/// value for matches; a file lacking a value for a filtered key is treated as
/// matching. This looseness is deliberate and load-bearing: artifacts
/// uploaded before a property existed remain selectable. Tightening it would
/// change which artifacts count as cache hits.
pub fn matches_filter(file_properties: &Properties, filter: &Properties) -> bool {
    filter.iter().all(|(key, wanted)| {
        file_properties
            .get(key)
            .map(|actual| actual == wanted)
            .unwrap_or(true)
    })
}
