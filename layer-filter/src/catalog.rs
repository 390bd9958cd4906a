//! Read-only catalog of filterable layers and their fields.
//!
//! Built once from [`CatalogConfig`]. Lookups that miss return `None`: "no
//! layer selected yet" is an ordinary state, not an error.

use crate::config::{CatalogConfig, LayerConfig};
use crate::expression::Expression;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Paired geometry and label layers are the most a single layer expands to.
pub const MAX_TARGETS_PER_LAYER: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    #[serde(rename = "number", alias = "numeric")]
    Numeric,
    #[serde(rename = "text", alias = "string")]
    Text,
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Numeric => write!(f, "number"),
            ValueType::Text => write!(f, "text"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub field: String,
    pub display_name: String,
    pub value_type: ValueType,
    pub help_text: String,
}

/// An engine target and the predicate it carries before any user filter.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerTarget {
    pub id: String,
    pub default_predicate: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerFilterProfile {
    pub layer_id: String,
    pub name: String,
    pub description: String,
    pub targets: Vec<LayerTarget>,
    pub fields: Vec<FieldDescriptor>,
}

impl LayerFilterProfile {
    pub fn field(&self, field: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.field == field)
    }

    pub fn target_ids(&self) -> Vec<String> {
        self.targets.iter().map(|t| t.id.clone()).collect()
    }

    fn from_config(layer: LayerConfig) -> Result<Self> {
        anyhow::ensure!(!layer.id.is_empty(), "Layer id must not be empty");
        anyhow::ensure!(
            layer.targets.len() <= MAX_TARGETS_PER_LAYER,
            "Layer {} lists {} targets, at most {} are supported",
            layer.id,
            layer.targets.len(),
            MAX_TARGETS_PER_LAYER
        );

        let targets = if layer.targets.is_empty() {
            vec![LayerTarget {
                id: layer.id.clone(),
                default_predicate: None,
            }]
        } else {
            layer
                .targets
                .into_iter()
                .map(|target| -> Result<LayerTarget> {
                    let default_predicate = target
                        .filter
                        .as_ref()
                        .map(Expression::from_json)
                        .transpose()
                        .with_context(|| {
                            format!("Invalid default filter for target {}", target.id)
                        })?;
                    Ok(LayerTarget {
                        id: target.id,
                        default_predicate,
                    })
                })
                .collect::<Result<Vec<_>>>()?
        };

        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(layer.fields.len());
        for field in layer.fields {
            if !seen.insert(field.field.clone()) {
                anyhow::bail!("Duplicate field {} on layer {}", field.field, layer.id);
            }
            fields.push(FieldDescriptor {
                field: field.field,
                display_name: field.name,
                value_type: field.value_type,
                help_text: field.help,
            });
        }

        Ok(Self {
            layer_id: layer.id,
            name: layer.name,
            description: layer.description,
            targets,
            fields,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    layers: IndexMap<String, LayerFilterProfile>,
}

impl FieldCatalog {
    pub fn from_config(config: CatalogConfig) -> Result<Self> {
        let mut layers = IndexMap::new();
        for layer in config.layers {
            let profile = LayerFilterProfile::from_config(layer)?;
            if layers.contains_key(&profile.layer_id) {
                anyhow::bail!("Duplicate layer id: {}", profile.layer_id);
            }
            layers.insert(profile.layer_id.clone(), profile);
        }
        check_target_ownership(&layers)?;
        tracing::debug!("Loaded filter catalog with {} layers", layers.len());
        Ok(Self { layers })
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::from_config(CatalogConfig::from_json_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_config(CatalogConfig::load(path)?)
    }

    pub fn describe_layer(&self, layer_id: &str) -> Option<&LayerFilterProfile> {
        self.layers.get(layer_id)
    }

    pub fn describe_field(&self, layer_id: &str, field: &str) -> Option<&FieldDescriptor> {
        self.describe_layer(layer_id)?.field(field)
    }

    /// Layers in configuration order.
    pub fn layers(&self) -> impl Iterator<Item = &LayerFilterProfile> {
        self.layers.values()
    }

    pub fn targets(&self) -> impl Iterator<Item = &LayerTarget> {
        self.layers.values().flat_map(|layer| layer.targets.iter())
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Every target belongs to exactly one layer, so one history entry at most
/// references it.
fn check_target_ownership(layers: &IndexMap<String, LayerFilterProfile>) -> Result<()> {
    let mut owners: HashMap<&str, &str> = HashMap::new();
    for layer in layers.values() {
        for target in &layer.targets {
            if let Some(owner) = owners.insert(&target.id, &layer.layer_id) {
                anyhow::bail!(
                    "Target {} is listed by both layer {} and layer {}",
                    target.id,
                    owner,
                    layer.layer_id
                );
            }
            if target.id != layer.layer_id && layers.contains_key(&target.id) {
                anyhow::bail!(
                    "Target {} of layer {} is also a layer id",
                    target.id,
                    layer.layer_id
                );
            }
        }
    }
    Ok(())
}
