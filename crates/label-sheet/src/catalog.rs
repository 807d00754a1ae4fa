//! Stored templates and labels
//!
//! The compositor never reads storage directly. The print service looks
//! things up through [`LabelStore`]; [`Catalog`] is the in-memory store the
//! CLI persists as a JSON file.

use crate::label::LabelAsset;
use crate::template::{Template, TemplateRecord};
use crate::types::*;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lookup of templates and labels by id
pub trait LabelStore {
    fn template(&self, id: i64) -> Option<Template>;
    fn label(&self, id: i64) -> Option<LabelAsset>;
}

/// In-memory catalog of templates and labels with auto-incrementing ids
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    templates: BTreeMap<i64, Template>,
    labels: BTreeMap<i64, LabelAsset>,
    next_template_id: i64,
    next_label_id: i64,
}

/// On-disk form of a catalog
#[cfg(feature = "serde")]
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct CatalogFile {
    templates: BTreeMap<i64, TemplateRecord>,
    labels: BTreeMap<i64, LabelAsset>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            next_template_id: 1,
            next_label_id: 1,
            ..Default::default()
        }
    }

    /// A catalog seeded with the standard A4 template as id 1
    pub fn with_default_template() -> Self {
        let mut catalog = Self::new();
        catalog.insert_template(Template::default());
        catalog
    }

    // -------------------------------------------------------------------------
    // Templates
    // -------------------------------------------------------------------------

    /// Normalize and store a submitted template, returning its id
    pub fn create_template(&mut self, record: &TemplateRecord) -> Result<i64> {
        let template = record.normalize()?;
        Ok(self.insert_template(template))
    }

    fn insert_template(&mut self, template: Template) -> i64 {
        let id = self.next_template_id.max(1);
        self.next_template_id = id + 1;
        log::debug!("Stored template {} '{}'", id, template.name);
        self.templates.insert(id, template);
        id
    }

    pub fn get_template(&self, id: i64) -> Result<&Template> {
        self.templates
            .get(&id)
            .ok_or(LabelSheetError::TemplateNotFound(id))
    }

    /// Templates ordered by id
    pub fn list_templates(&self) -> impl Iterator<Item = (i64, &Template)> {
        self.templates.iter().map(|(id, t)| (*id, t))
    }

    pub fn update_template(&mut self, id: i64, record: &TemplateRecord) -> Result<()> {
        if !self.templates.contains_key(&id) {
            return Err(LabelSheetError::TemplateNotFound(id));
        }
        let template = record.normalize()?;
        self.templates.insert(id, template);
        Ok(())
    }

    pub fn delete_template(&mut self, id: i64) -> Result<Template> {
        self.templates
            .remove(&id)
            .ok_or(LabelSheetError::TemplateNotFound(id))
    }

    // -------------------------------------------------------------------------
    // Labels
    // -------------------------------------------------------------------------

    /// Store a label, returning its id
    pub fn create_label(&mut self, asset: LabelAsset) -> Result<i64> {
        asset.validate()?;
        let id = self.next_label_id.max(1);
        self.next_label_id = id + 1;
        log::debug!("Stored label {} '{}' ({})", id, asset.name, asset.file_type);
        self.labels.insert(id, asset);
        Ok(id)
    }

    pub fn get_label(&self, id: i64) -> Result<&LabelAsset> {
        self.labels.get(&id).ok_or(LabelSheetError::LabelNotFound(id))
    }

    /// Labels ordered by id
    pub fn list_labels(&self) -> impl Iterator<Item = (i64, &LabelAsset)> {
        self.labels.iter().map(|(id, l)| (*id, l))
    }

    pub fn update_label(&mut self, id: i64, asset: LabelAsset) -> Result<()> {
        if !self.labels.contains_key(&id) {
            return Err(LabelSheetError::LabelNotFound(id));
        }
        asset.validate()?;
        self.labels.insert(id, asset);
        Ok(())
    }

    pub fn delete_label(&mut self, id: i64) -> Result<LabelAsset> {
        self.labels
            .remove(&id)
            .ok_or(LabelSheetError::LabelNotFound(id))
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    /// Load a catalog from a JSON file; every template is normalized on the way in
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file: CatalogFile = serde_json::from_slice(&bytes)
            .map_err(|e| LabelSheetError::Config(format!("Failed to parse catalog: {}", e)))?;

        let mut catalog = Self::new();
        for (id, record) in file.templates {
            let template = record.normalize()?;
            catalog.templates.insert(id, template);
            catalog.next_template_id = catalog.next_template_id.max(id + 1);
        }
        for (id, asset) in file.labels {
            catalog.labels.insert(id, asset);
            catalog.next_label_id = catalog.next_label_id.max(id + 1);
        }

        log::info!(
            "Loaded catalog with {} templates and {} labels",
            catalog.templates.len(),
            catalog.labels.len()
        );
        Ok(catalog)
    }

    /// Save the catalog to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let file = CatalogFile {
            templates: self
                .templates
                .iter()
                .map(|(id, t)| (*id, TemplateRecord::from(t)))
                .collect(),
            labels: self.labels.clone(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| LabelSheetError::Config(format!("Failed to serialize catalog: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

impl LabelStore for Catalog {
    fn template(&self, id: i64) -> Option<Template> {
        self.templates.get(&id).cloned()
    }

    fn label(&self, id: i64) -> Option<LabelAsset> {
        self.labels.get(&id).cloned()
    }
}
