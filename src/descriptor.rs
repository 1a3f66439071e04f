//! # Descriptor Reader/Writer
//!
//! The descriptor is a minimal POM-equivalent XML document recording the
//! authoritative *concrete* version of an artifact, its packaging type, and
//! arbitrary string properties. One descriptor exists per concrete artifact
//! version, named `<artifactId>-<version>.pom` next to the artifact files.
//!
//! Reading is strict about the fields resolution depends on: a missing or
//! duplicated `groupId`/`artifactId`/`version` is a `MalformedDescriptor`
//! error, not a default. Writing is deterministic: stable element order,
//! properties in sorted key order, so repeated writes of the same descriptor
//! produce byte-identical output (reproducibility of published artifacts
//! depends on this).

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Deserialize;

use crate::coordinates::DESCRIPTOR_EXT;
use crate::error::{Error, Result};

/// Packaging assumed when a descriptor does not declare one.
pub const DEFAULT_PACKAGING: &str = "jar";

const POM_NAMESPACE: &str = "http://maven.apache.org/POM/4.0.0";
const MODEL_VERSION: &str = "4.0.0";

/// Parsed metadata descriptor of one concrete artifact version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub packaging: Option<String>,
    pub properties: BTreeMap<String, String>,
}

/// Raw deserialization target; serde reports absent and duplicated required
/// fields for us.
#[derive(Debug, Deserialize)]
struct RawDescriptor {
    #[serde(rename = "groupId")]
    group_id: String,
    #[serde(rename = "artifactId")]
    artifact_id: String,
    version: String,
    packaging: Option<String>,
    properties: Option<BTreeMap<String, String>>,
}

impl Descriptor {
    /// Read and parse a descriptor file.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text).map_err(|message| Error::MalformedDescriptor {
            path: path.display().to_string(),
            message,
        })
    }

    /// Parse a descriptor from an XML string.
    pub fn from_xml(xml: &str) -> Result<Self> {
        Self::parse(xml).map_err(|message| Error::MalformedDescriptor {
            path: "<inline>".to_string(),
            message,
        })
    }

    fn parse(xml: &str) -> std::result::Result<Self, String> {
        let raw: RawDescriptor = serde_xml_rs::from_str(xml).map_err(|e| e.to_string())?;
        Ok(Self {
            group_id: raw.group_id,
            artifact_id: raw.artifact_id,
            version: raw.version,
            packaging: raw.packaging,
            properties: raw.properties.unwrap_or_default(),
        })
    }

    /// Serialize to the descriptor XML document.
    ///
    /// Field order is fixed and properties are emitted in sorted key order:
    /// the same descriptor always serializes to the same bytes.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str(&format!("<project xmlns=\"{POM_NAMESPACE}\">\n"));
        out.push_str(&format!(
            "  <modelVersion>{MODEL_VERSION}</modelVersion>\n"
        ));
        out.push_str(&format!("  <groupId>{}</groupId>\n", escape(&self.group_id)));
        out.push_str(&format!(
            "  <artifactId>{}</artifactId>\n",
            escape(&self.artifact_id)
        ));
        out.push_str(&format!("  <version>{}</version>\n", escape(&self.version)));
        if let Some(packaging) = &self.packaging {
            out.push_str(&format!("  <packaging>{}</packaging>\n", escape(packaging)));
        }
        if !self.properties.is_empty() {
            out.push_str("  <properties>\n");
            for (key, value) in &self.properties {
                out.push_str(&format!("    <{key}>{}</{key}>\n", escape(value)));
            }
            out.push_str("  </properties>\n");
        }
        out.push_str("</project>\n");
        out
    }

    /// Write the serialized descriptor to a stream.
    pub fn write_to(&self, writer: &mut dyn Write) -> Result<()> {
        writer.write_all(self.to_xml().as_bytes())?;
        Ok(())
    }

    /// Filename of this descriptor: `<artifactId>-<version>.pom`.
    pub fn file_name(&self) -> String {
        crate::coordinates::descriptor_file_name(&self.artifact_id, &self.version)
    }

    /// Filename of the main artifact this descriptor points at:
    /// `<artifactId>-<version>.<packaging>`.
    pub fn main_artifact_filename(&self) -> String {
        format!(
            "{}-{}.{}",
            self.artifact_id,
            self.version,
            self.packaging.as_deref().unwrap_or(DEFAULT_PACKAGING)
        )
    }
}

/// True when a basename names a descriptor file.
pub fn is_descriptor_file(basename: &str) -> bool {
    Path::new(basename)
        .extension()
        .is_some_and(|ext| ext == DESCRIPTOR_EXT)
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> Descriptor {
        Descriptor {
            group_id: "com.acme.build".to_string(),
            artifact_id: "widget".to_string(),
            version: "1.0-20210101.100000-1".to_string(),
            packaging: Some("tar.gz".to_string()),
            properties: [
                ("arch".to_string(), "x86_64".to_string()),
                ("toolchain".to_string(), "gcc-12".to_string()),
            ]
            .into_iter()
            .collect(),
        }
    }

    #[test]
    fn test_round_trip_preserves_all_fields() {
        let original = descriptor();
        let parsed = Descriptor::from_xml(&original.to_xml()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_round_trip_without_optional_fields() {
        let original = Descriptor {
            group_id: "com.acme".to_string(),
            artifact_id: "widget".to_string(),
            version: "1.0".to_string(),
            packaging: None,
            properties: BTreeMap::new(),
        };
        let parsed = Descriptor::from_xml(&original.to_xml()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_write_is_deterministic() {
        assert_eq!(descriptor().to_xml(), descriptor().to_xml());
    }

    #[test]
    fn test_serialized_form_is_stable() {
        insta::assert_snapshot!(descriptor().to_xml(), @r###"
        <?xml version="1.0" encoding="UTF-8"?>
        <project xmlns="http://maven.apache.org/POM/4.0.0">
          <modelVersion>4.0.0</modelVersion>
          <groupId>com.acme.build</groupId>
          <artifactId>widget</artifactId>
          <version>1.0-20210101.100000-1</version>
          <packaging>tar.gz</packaging>
          <properties>
            <arch>x86_64</arch>
            <toolchain>gcc-12</toolchain>
          </properties>
        </project>
        "###);
    }

    #[test]
    fn test_missing_required_field_is_malformed() {
        let xml = r#"<?xml version="1.0"?>
<project>
  <groupId>com.acme</groupId>
  <artifactId>widget</artifactId>
</project>"#;
        let result = Descriptor::from_xml(xml);
        assert!(matches!(result, Err(Error::MalformedDescriptor { .. })));
        assert!(result.unwrap_err().to_string().contains("version"));
    }

    #[test]
    fn test_duplicated_required_field_is_malformed() {
        let xml = r#"<?xml version="1.0"?>
<project>
  <groupId>com.acme</groupId>
  <artifactId>widget</artifactId>
  <version>1.0</version>
  <version>2.0</version>
</project>"#;
        assert!(matches!(
            Descriptor::from_xml(xml),
            Err(Error::MalformedDescriptor { .. })
        ));
    }

    #[test]
    fn test_missing_root_is_malformed() {
        assert!(matches!(
            Descriptor::from_xml("not xml at all"),
            Err(Error::MalformedDescriptor { .. })
        ));
    }

    #[test]
    fn test_values_are_escaped() {
        let d = Descriptor {
            group_id: "com.acme".to_string(),
            artifact_id: "widget".to_string(),
            version: "1.0".to_string(),
            packaging: None,
            properties: [("cflags".to_string(), "-DX=\"<y>&z\"".to_string())]
                .into_iter()
                .collect(),
        };
        let xml = d.to_xml();
        assert!(xml.contains("&lt;y&gt;&amp;z"));
        let parsed = Descriptor::from_xml(&xml).unwrap();
        assert_eq!(parsed.properties["cflags"], "-DX=\"<y>&z\"");
    }

    #[test]
    fn test_main_artifact_filename() {
        assert_eq!(
            descriptor().main_artifact_filename(),
            "widget-1.0-20210101.100000-1.tar.gz"
        );
    }

    #[test]
    fn test_main_artifact_filename_defaults_packaging() {
        let mut d = descriptor();
        d.packaging = None;
        assert_eq!(
            d.main_artifact_filename(),
            "widget-1.0-20210101.100000-1.jar"
        );
    }

    #[test]
    fn test_descriptor_file_name() {
        assert_eq!(descriptor().file_name(), "widget-1.0-20210101.100000-1.pom");
    }

    #[test]
    fn test_is_descriptor_file() {
        assert!(is_descriptor_file("widget-1.0.pom"));
        assert!(!is_descriptor_file("widget-1.0.tar.gz"));
        assert!(!is_descriptor_file("widget-1.0-pom.txt"));
    }
}
