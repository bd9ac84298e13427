//! MTL metadata document parser.
//!
//! MTL files are flat `KEY = VALUE` text wrapped in `GROUP = NAME` /
//! `END_GROUP` blocks, with a single outer `L1_METADATA_FILE` group
//! around everything. Values are quoted strings, integers or
//! decimals.

use std::collections::HashMap;

use landsat_common::{LandsatError, LandsatResult};

/// A scalar metadata value.
#[derive(Debug, Clone, PartialEq)]
pub enum MtlValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl MtlValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MtlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MtlValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view; integers widen to f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MtlValue::Int(v) => Some(*v as f64),
            MtlValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

/// Parsed MTL document: group name → key → value.
#[derive(Debug, Clone, Default)]
pub struct MtlDocument {
    groups: HashMap<String, HashMap<String, MtlValue>>,
}

impl MtlDocument {
    /// Parse an MTL text document.
    ///
    /// The outer `L1_METADATA_FILE` wrapper and all `END` statements
    /// are skipped; a key/value line before any group has opened is a
    /// structural error, as is a non-blank line without `=`.
    pub fn parse(text: &str) -> LandsatResult<Self> {
        let mut groups: HashMap<String, HashMap<String, MtlValue>> = HashMap::new();
        let mut current: Option<String> = None;

        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line == "END" || line.starts_with("END_GROUP") {
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| {
                LandsatError::MetadataError(format!("line {}: no '=' in '{}'", lineno + 1, line))
            })?;
            let (key, value) = (key.trim(), value.trim());

            if key == "GROUP" {
                if value != "L1_METADATA_FILE" {
                    current = Some(value.to_string());
                    groups.entry(value.to_string()).or_default();
                }
                continue;
            }

            let group = current.as_ref().ok_or_else(|| {
                LandsatError::MetadataError(format!(
                    "line {}: parameter '{}' outside of any group",
                    lineno + 1,
                    key
                ))
            })?;
            groups
                .entry(group.clone())
                .or_default()
                .insert(key.to_string(), coerce(value));
        }

        Ok(Self { groups })
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    fn value(&self, group: &str, key: &str) -> LandsatResult<&MtlValue> {
        self.groups
            .get(group)
            .and_then(|g| g.get(key))
            .ok_or_else(|| LandsatError::MetadataError(format!("missing {}/{}", group, key)))
    }

    pub fn str_value(&self, group: &str, key: &str) -> LandsatResult<&str> {
        self.value(group, key)?.as_str().ok_or_else(|| {
            LandsatError::MetadataError(format!("{}/{} is not a string", group, key))
        })
    }

    pub fn i64_value(&self, group: &str, key: &str) -> LandsatResult<i64> {
        self.value(group, key)?.as_i64().ok_or_else(|| {
            LandsatError::MetadataError(format!("{}/{} is not an integer", group, key))
        })
    }

    pub fn f64_value(&self, group: &str, key: &str) -> LandsatResult<f64> {
        self.value(group, key)?.as_f64().ok_or_else(|| {
            LandsatError::MetadataError(format!("{}/{} is not numeric", group, key))
        })
    }
}

/// Strip surrounding quotes and coerce to int, then float, then text.
fn coerce(raw: &str) -> MtlValue {
    let value = raw.trim_matches('"');
    if let Ok(v) = value.parse::<i64>() {
        return MtlValue::Int(v);
    }
    if let Ok(v) = value.parse::<f64>() {
        return MtlValue::Float(v);
    }
    MtlValue::Text(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"GROUP = L1_METADATA_FILE
  GROUP = METADATA_FILE_INFO
    ORIGIN = "Image courtesy of the U.S. Geological Survey"
    SCENE_ID = "LT50300251986270XXX01"
    PRODUCT_ID = "LT05_L1GS_030025_19860927_20161003_01_T2"
  END_GROUP = METADATA_FILE_INFO
  GROUP = PRODUCT_METADATA
    WRS_PATH = 30
    WRS_ROW = 25
    CLOUD_COVER = 20.00
  END_GROUP = PRODUCT_METADATA
END_GROUP = L1_METADATA_FILE
END
"#;

    #[test]
    fn test_parse_groups_and_types() {
        let mtl = MtlDocument::parse(SAMPLE).unwrap();
        assert!(mtl.has_group("PRODUCT_METADATA"));
        assert_eq!(
            mtl.str_value("METADATA_FILE_INFO", "SCENE_ID").unwrap(),
            "LT50300251986270XXX01"
        );
        assert_eq!(mtl.i64_value("PRODUCT_METADATA", "WRS_PATH").unwrap(), 30);
        assert_eq!(
            mtl.f64_value("PRODUCT_METADATA", "CLOUD_COVER").unwrap(),
            20.0
        );
        // Integers widen to f64 on request.
        assert_eq!(mtl.f64_value("PRODUCT_METADATA", "WRS_ROW").unwrap(), 25.0);
    }

    #[test]
    fn test_coerce() {
        assert_eq!(coerce("6"), MtlValue::Int(6));
        assert_eq!(coerce("6.1"), MtlValue::Float(6.1));
        assert_eq!(coerce("6%"), MtlValue::Text("6%".to_string()));
        assert_eq!(coerce("\"quoted\""), MtlValue::Text("quoted".to_string()));
    }

    #[test]
    fn test_parameter_outside_group_is_error() {
        let err = MtlDocument::parse("WRS_PATH = 30\n").unwrap_err();
        assert!(matches!(err, LandsatError::MetadataError(_)));
    }

    #[test]
    fn test_line_without_equals_is_error() {
        let text = "GROUP = PRODUCT_METADATA\nnot a parameter line\n";
        assert!(MtlDocument::parse(text).is_err());
    }

    #[test]
    fn test_missing_key_is_error() {
        let mtl = MtlDocument::parse(SAMPLE).unwrap();
        assert!(mtl.str_value("PRODUCT_METADATA", "NOPE").is_err());
        assert!(mtl.str_value("NO_GROUP", "SCENE_ID").is_err());
    }
}
