//! Form definition loading and parsing
//!
//! Definitions live in YAML or JSON files named after their form id. Parsed
//! definitions are normalized so that field slice order is render order.

use std::fs;
use std::path::Path;

use super::error::FormError;
use super::schema::FormDefinition;

/// Loads form definitions from YAML or JSON files
pub struct FormLoader;

impl FormLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a form definition from a file, picking the parser by extension
    pub fn load_form<P: AsRef<Path>>(&self, path: P) -> Result<FormDefinition, FormError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FormError::FileNotFound(path.display().to_string()));
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        let content = fs::read_to_string(path)?;
        match extension {
            "yaml" | "yml" => Self::parse_yaml(&content),
            "json" => Self::parse_json(&content),
            other => Err(FormError::unsupported_format(format!(
                "{} ({})",
                path.display(),
                if other.is_empty() { "no extension" } else { other }
            ))),
        }
    }

    /// Parse a form definition from a YAML string
    pub fn parse_yaml(content: &str) -> Result<FormDefinition, FormError> {
        let mut def: FormDefinition = serde_yaml::from_str(content)?;
        def.normalize();
        Ok(def)
    }

    /// Parse a form definition from a JSON string
    pub fn parse_json(content: &str) -> Result<FormDefinition, FormError> {
        let mut def: FormDefinition = serde_json::from_str(content)?;
        def.normalize();
        Ok(def)
    }
}

impl Default for FormLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::condition::Operator;
    use crate::forms::schema::FieldKind;

    #[test]
    fn test_parse_yaml_definition() {
        let yaml = r#"
id: rsvp
title: Retreat RSVP
description: "Tell us whether you can make it"

fields:
  - id: attending
    kind: single-choice
    label: Will you attend?
    position: 0
    options:
      - value: "yes"
        label: "Yes"
      - value: "no"
        label: "No"
  - id: diet
    kind: short-text
    label: Dietary needs
    position: 1

conditions:
  - target_field_id: diet
    source_field_id: attending
    operator: equals
    value: "yes"
"#;
        let def = FormLoader::parse_yaml(yaml).unwrap();
        assert_eq!(def.id, "rsvp");
        assert_eq!(def.fields.len(), 2);
        assert_eq!(def.fields[0].kind, FieldKind::SingleChoice);
        assert_eq!(def.conditions[0].operator, Operator::Equals);
    }

    #[test]
    fn test_parse_yaml_normalizes_field_order() {
        let yaml = r#"
id: shuffled
title: Shuffled
fields:
  - id: last
    kind: short-text
    label: Last
    position: 9
  - id: first
    kind: short-text
    label: First
    position: 1
"#;
        let def = FormLoader::parse_yaml(yaml).unwrap();
        assert_eq!(def.fields[0].id, "first");
        assert_eq!(def.fields[1].id, "last");
    }

    #[test]
    fn test_parse_json_definition() {
        let json = r#"{
            "id": "feedback",
            "title": "Feedback",
            "fields": [
                {"id": "score", "kind": "number", "label": "Score", "position": 0}
            ]
        }"#;
        let def = FormLoader::parse_json(json).unwrap();
        assert_eq!(def.id, "feedback");
        assert_eq!(def.fields[0].kind, FieldKind::Number);
    }

    #[test]
    fn test_invalid_yaml_returns_error() {
        let yaml = r#"
id: broken
title:
  - invalid structure
"#;
        assert!(FormLoader::parse_yaml(yaml).is_err());
    }

    #[test]
    fn test_missing_file_returns_error() {
        let loader = FormLoader::new();
        let result = loader.load_form("definitely/not/here.yaml");
        assert!(matches!(result, Err(FormError::FileNotFound(_))));
    }

    #[test]
    fn test_unsupported_extension_returns_error() {
        let dir = std::env::temp_dir().join(format!("formwork-loader-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("form.toml");
        fs::write(&path, "id = \"nope\"").unwrap();

        let loader = FormLoader::new();
        let result = loader.load_form(&path);
        assert!(matches!(result, Err(FormError::UnsupportedFormat(_))));

        fs::remove_dir_all(&dir).ok();
    }
}
