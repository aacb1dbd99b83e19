// SPDX-License-Identifier: MIT

//! In-memory form registry

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::FormError;
use super::schema::{validate_form, FormDefinition};
use super::source::{FormSource, FormSummary};

/// Registry of validated form definitions, shared across handlers
#[derive(Clone)]
pub struct FormRegistry {
    forms: Arc<RwLock<HashMap<String, Arc<FormDefinition>>>>,
}

impl FormRegistry {
    pub fn new() -> Self {
        Self {
            forms: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Validate a definition and add it to the registry.
    ///
    /// Replaces any previous definition with the same id.
    pub async fn register(&self, def: FormDefinition) -> Result<Arc<FormDefinition>, FormError> {
        let violations = validate_form(&def);
        if !violations.is_empty() {
            return Err(FormError::Validation(violations));
        }
        let def = Arc::new(def);
        let mut forms = self.forms.write().await;
        forms.insert(def.id.clone(), Arc::clone(&def));
        Ok(def)
    }

    pub async fn get(&self, id: &str) -> Option<Arc<FormDefinition>> {
        let forms = self.forms.read().await;
        forms.get(id).cloned()
    }

    pub async fn remove(&self, id: &str) -> Option<Arc<FormDefinition>> {
        let mut forms = self.forms.write().await;
        forms.remove(id)
    }

    /// Pull every form a source provides into the registry.
    ///
    /// Definitions that fail validation are skipped with a warning so one
    /// bad file cannot take the whole catalog down. Returns how many forms
    /// were registered.
    pub async fn load_from(&self, source: &dyn FormSource) -> Result<usize, FormError> {
        let mut count = 0;
        for summary in source.list().await? {
            let def = match source.load(&summary.id).await {
                Ok(def) => def,
                Err(e) => {
                    log::warn!("Skipping form '{}': {}", summary.id, e);
                    continue;
                }
            };
            match self.register(def).await {
                Ok(_) => count += 1,
                Err(e) => log::warn!("Skipping form '{}': {}", summary.id, e),
            }
        }
        Ok(count)
    }
}

impl Default for FormRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FormSource for FormRegistry {
    async fn list(&self) -> Result<Vec<FormSummary>, FormError> {
        let forms = self.forms.read().await;
        let mut summaries: Vec<FormSummary> =
            forms.values().map(|def| FormSummary::of(def)).collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    async fn load(&self, id: &str) -> Result<FormDefinition, FormError> {
        match self.get(id).await {
            Some(def) => Ok((*def).clone()),
            None => Err(FormError::unknown_form(id)),
        }
    }
}
