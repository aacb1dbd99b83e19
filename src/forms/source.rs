//! Form sources
//!
//! A [`FormSource`] is anywhere definitions can be listed and loaded from.
//! The file-backed source reads a directory of YAML/JSON files named after
//! their form id; the in-memory registry implements the same trait so server
//! handlers and tests can run against either.

use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use tokio::fs;

use super::error::FormError;
use super::loader::FormLoader;
use super::schema::FormDefinition;

/// Listing entry for a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSummary {
    pub id: String,
    pub title: String,
    pub field_count: usize,
}

impl FormSummary {
    /// Summarize a definition
    pub fn of(def: &FormDefinition) -> Self {
        Self {
            id: def.id.clone(),
            title: def.title.clone(),
            field_count: def.fields.len(),
        }
    }
}

/// A place form definitions can be listed and loaded from
#[async_trait]
pub trait FormSource: Send + Sync {
    /// List the forms this source provides
    async fn list(&self) -> Result<Vec<FormSummary>, FormError>;

    /// Load a form definition by id
    async fn load(&self, id: &str) -> Result<FormDefinition, FormError>;
}

/// Loads definitions from a directory of files named `<form id>.<ext>`
pub struct FsFormSource {
    dir: PathBuf,
}

impl FsFormSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl FormSource for FsFormSource {
    async fn list(&self) -> Result<Vec<FormSummary>, FormError> {
        let mut summaries = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let parse: fn(&str) -> Result<FormDefinition, FormError> =
                match path.extension().and_then(|ext| ext.to_str()) {
                    Some("yaml") | Some("yml") => FormLoader::parse_yaml,
                    Some("json") => FormLoader::parse_json,
                    _ => continue,
                };
            let content = fs::read_to_string(&path).await?;
            match parse(&content) {
                Ok(def) => summaries.push(FormSummary::of(&def)),
                Err(e) => log::warn!("Skipping unparseable definition {:?}: {}", path, e),
            }
        }
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    async fn load(&self, id: &str) -> Result<FormDefinition, FormError> {
        for ext in ["yaml", "yml", "json"] {
            let path = self.dir.join(format!("{}.{}", id, ext));
            if !path.exists() {
                continue;
            }
            let content = fs::read_to_string(&path).await?;
            return if ext == "json" {
                FormLoader::parse_json(&content)
            } else {
                FormLoader::parse_yaml(&content)
            };
        }
        Err(FormError::unknown_form(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("formwork-source-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_fs_source_lists_and_loads() {
        let dir = scratch_dir();
        write(
            &dir,
            "rsvp.yaml",
            "id: rsvp\ntitle: RSVP\nfields:\n  - id: name\n    kind: short-text\n    label: Name\n    position: 0\n",
        );
        write(
            &dir,
            "feedback.json",
            r#"{"id": "feedback", "title": "Feedback"}"#,
        );
        write(&dir, "notes.txt", "not a form");

        let source = FsFormSource::new(&dir);
        let summaries = source.list().await.unwrap();
        assert_eq!(summaries.len(), 2);
        // Sorted by id for a stable listing.
        assert_eq!(summaries[0].id, "feedback");
        assert_eq!(summaries[1].id, "rsvp");
        assert_eq!(summaries[1].field_count, 1);

        let def = source.load("rsvp").await.unwrap();
        assert_eq!(def.title, "RSVP");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_fs_source_skips_broken_definitions() {
        let dir = scratch_dir();
        write(&dir, "good.yaml", "id: good\ntitle: Good\n");
        write(&dir, "broken.yaml", "id: [unclosed");

        let source = FsFormSource::new(&dir);
        let summaries = source.list().await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, "good");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_fs_source_unknown_id() {
        let dir = scratch_dir();
        let source = FsFormSource::new(&dir);
        let result = source.load("missing").await;
        assert!(matches!(result, Err(FormError::UnknownForm(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_summary_of_definition() {
        let def = FormLoader::parse_yaml("id: x\ntitle: X\n").unwrap();
        let summary = FormSummary::of(&def);
        assert_eq!(summary.id, "x");
        assert_eq!(summary.field_count, 0);
    }
}
