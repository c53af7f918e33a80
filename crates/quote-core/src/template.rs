//! # Door Templates
//!
//! Named, reusable door assemblies. A template keeps the door type and
//! every selected part, but not quantity or discount.

use crate::catalog::{CatalogItem, DoorType};
use crate::configuration::{new_id, Selection};
use crate::error::{QuoteError, QuoteResult};
use serde::{Deserialize, Serialize};

/// Parts captured by a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub door_type: DoorType,
    pub leaf: Option<CatalogItem>,
    pub frame: Option<CatalogItem>,
    #[serde(default)]
    pub options: Vec<CatalogItem>,
    #[serde(default)]
    pub hardware: Vec<CatalogItem>,
    #[serde(default)]
    pub accessories: Vec<CatalogItem>,
}

/// A saved door template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorTemplate {
    pub id: String,
    pub name: String,
    pub config: TemplateConfig,
}

impl DoorTemplate {
    /// Capture a complete selection under a non-blank name
    pub fn from_selection(name: &str, selection: &Selection) -> QuoteResult<Self> {
        let name = validate_name(name)?;
        if selection.leaf.is_none() {
            return Err(QuoteError::IncompleteConfiguration { missing: "leaf" });
        }
        if selection.frame.is_none() {
            return Err(QuoteError::IncompleteConfiguration { missing: "frame" });
        }

        Ok(Self {
            id: new_id(),
            name,
            config: TemplateConfig {
                door_type: selection.door_type,
                leaf: selection.leaf.clone(),
                frame: selection.frame.clone(),
                options: selection.options.clone(),
                hardware: selection.hardware.clone(),
                accessories: selection.accessories.clone(),
            },
        })
    }

    /// Fresh selection from this template (quantity 1, no discount)
    pub fn to_selection(&self) -> Selection {
        let config = &self.config;
        Selection {
            leaf: config.leaf.clone(),
            frame: config.frame.clone(),
            options: config.options.clone(),
            hardware: config.hardware.clone(),
            accessories: config.accessories.clone(),
            ..Selection::new(config.door_type)
        }
    }
}

fn validate_name(name: &str) -> QuoteResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(QuoteError::InvalidRequest(
            "template name must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Collection of saved templates, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateLibrary {
    #[serde(default)]
    pub templates: Vec<DoorTemplate>,
}

impl TemplateLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template to the library
    pub fn add(&mut self, template: DoorTemplate) {
        self.templates.push(template);
    }

    /// Add a template with builder pattern
    pub fn with_template(mut self, template: DoorTemplate) -> Self {
        self.add(template);
        self
    }

    pub fn get(&self, template_id: &str) -> Option<&DoorTemplate> {
        self.templates.iter().find(|t| t.id == template_id)
    }

    pub fn rename(&mut self, template_id: &str, name: &str) -> QuoteResult<&DoorTemplate> {
        let name = validate_name(name)?;
        let template = self
            .templates
            .iter_mut()
            .find(|t| t.id == template_id)
            .ok_or_else(|| QuoteError::TemplateNotFound {
                template_id: template_id.to_string(),
            })?;
        template.name = name;
        Ok(template)
    }

    pub fn remove(&mut self, template_id: &str) -> QuoteResult<DoorTemplate> {
        let pos = self
            .templates
            .iter()
            .position(|t| t.id == template_id)
            .ok_or_else(|| QuoteError::TemplateNotFound {
                template_id: template_id.to_string(),
            })?;
        Ok(self.templates.remove(pos))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DoorTemplate> {
        self.templates.iter()
    }

    /// Templates for one door type
    pub fn for_door_type(&self, door_type: DoorType) -> impl Iterator<Item = &DoorTemplate> {
        self.templates
            .iter()
            .filter(move |t| t.config.door_type == door_type)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
