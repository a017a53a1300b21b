//! Versioned JSON encoding of [`IrFile`].
//!
//! External front-ends (the Swift companion) print this envelope on stdout:
//!
//! ```json
//! { "version": 1, "file": { "name": "Foo.swift", "imports": [], "declarations": [] } }
//! ```

use crate::file::IrFile;
use serde::{Deserialize, Serialize};

/// Bumped on any incompatible change to the serialized IR shape.
pub const IR_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("unsupported IR schema version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("malformed IR JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct EnvelopeOut<'a> {
    version: u32,
    file: &'a IrFile,
}

// Decoded in two steps so a version mismatch is reported instead of whatever
// shape error the newer payload would trigger.
#[derive(Deserialize)]
struct EnvelopeIn {
    version: u32,
    file: serde_json::Value,
}

pub fn to_json(file: &IrFile) -> Result<String, WireError> {
    Ok(serde_json::to_string(&EnvelopeOut {
        version: IR_SCHEMA_VERSION,
        file,
    })?)
}

pub fn to_json_pretty(file: &IrFile) -> Result<String, WireError> {
    Ok(serde_json::to_string_pretty(&EnvelopeOut {
        version: IR_SCHEMA_VERSION,
        file,
    })?)
}

pub fn from_json(json: &str) -> Result<IrFile, WireError> {
    let envelope: EnvelopeIn = serde_json::from_str(json)?;
    if envelope.version != IR_SCHEMA_VERSION {
        return Err(WireError::UnsupportedVersion {
            found: envelope.version,
            expected: IR_SCHEMA_VERSION,
        });
    }
    Ok(serde_json::from_value(envelope.file)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IrClassBuilder, IrClassKind, IrFileBuilder, IrImport, IrVisibility};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_roundtrip_preserves_file() {
        let class = IrClassBuilder::qualified("app.Model", "Model")
            .kind(IrClassKind::extension("swift", "struct"))
            .visibility(IrVisibility::Public)
            .build()
            .unwrap();
        let file = IrFileBuilder::new("Model.swift")
            .import(IrImport::new("Foundation"))
            .declaration(class)
            .property("swift/module", "App")
            .build();

        let json = to_json(&file).unwrap();
        assert_eq!(from_json(&json).unwrap(), file);
    }

    #[test]
    fn test_rejects_other_version() {
        let json = r#"{"version": 2, "file": {"name": "X.swift"}}"#;
        match from_json(json) {
            Err(WireError::UnsupportedVersion { found, expected }) => {
                assert_eq!(found, 2);
                assert_eq!(expected, IR_SCHEMA_VERSION);
            }
            other => panic!("expected version error, got {other:?}"),
        }
    }

    #[test]
    fn test_enums_are_tagged() {
        let json = r#"{
            "version": 1,
            "file": {
                "name": "A.swift",
                "declarations": [{
                    "type": "class",
                    "qualified_name": "A",
                    "name": "A",
                    "kind": {"type": "interface"},
                    "visibility": {"type": "extension", "language": "swift", "name": "open"}
                }]
            }
        }"#;
        let file = from_json(json).unwrap();
        let class = file.class("A").unwrap();
        assert_eq!(class.kind, IrClassKind::Interface);
        assert!(class.visibility.is_extension("swift", "open"));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(from_json("{"), Err(WireError::Json(_))));
    }
}
