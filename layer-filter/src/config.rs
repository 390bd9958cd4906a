use crate::catalog::ValueType;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the configuration file used by `load_from_env`.
pub const CONFIG_PATH_ENV: &str = "LAYER_FILTER_CONFIG";

/// Static description of the filterable layers, as shipped with the viewer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub layers: Vec<LayerConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Engine targets sharing this layer's filter. Empty means the layer id itself.
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    pub id: String,
    /// Engine-level default filter in MapLibre expression form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub field: String,
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default)]
    pub help: String,
}

impl CatalogConfig {
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse layer filter configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn load_from_env() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .with_context(|| format!("{} is not set", CONFIG_PATH_ENV))?;
        Self::load(Path::new(&path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
{
    "layers": [
        {
            "id": "communities",
            "name": "Current Communities",
            "description": "Community boundaries",
            "targets": [
                { "id": "communities_fill" },
                { "id": "communities_labels", "filter": ["==", ["get", "kind"], "label"] }
            ],
            "fields": [
                { "field": "code", "name": "Code", "type": "text", "help": "Community code" },
                { "field": "population", "name": "Population", "type": "number" }
            ]
        },
        { "id": "earthquakes", "name": "Historical Earthquakes" }
    ]
}
"#;

    #[test]
    fn test_parse_sample_config() {
        let config = CatalogConfig::from_json_str(SAMPLE).unwrap();
        assert_eq!(config.layers.len(), 2);

        let communities = &config.layers[0];
        assert_eq!(communities.targets.len(), 2);
        assert!(communities.targets[0].filter.is_none());
        assert!(communities.targets[1].filter.is_some());
        assert_eq!(communities.fields[0].value_type, ValueType::Text);
        assert_eq!(communities.fields[1].value_type, ValueType::Numeric);
        assert_eq!(communities.fields[1].help, "");

        let earthquakes = &config.layers[1];
        assert!(earthquakes.targets.is_empty());
        assert!(earthquakes.fields.is_empty());
        assert_eq!(earthquakes.description, "");
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("filters.json");
        fs::write(&config_path, SAMPLE).unwrap();

        let config = CatalogConfig::load(&config_path).unwrap();
        assert_eq!(config.layers[0].id, "communities");
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = CatalogConfig::load(&temp_dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    // Both cases share one test since the variable is process-wide.
    #[test]
    fn test_load_from_env() {
        std::env::remove_var(CONFIG_PATH_ENV);
        let err = CatalogConfig::load_from_env().unwrap_err();
        assert!(err.to_string().contains("LAYER_FILTER_CONFIG is not set"));

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("filters.json");
        fs::write(&config_path, SAMPLE).unwrap();
        std::env::set_var(CONFIG_PATH_ENV, &config_path);
        let config = CatalogConfig::load_from_env();
        std::env::remove_var(CONFIG_PATH_ENV);

        let config = config.unwrap();
        assert_eq!(config.layers.len(), 2);
        assert_eq!(config.layers[1].id, "earthquakes");
    }

    #[test]
    fn test_unknown_value_type_rejected() {
        let content = r#"{"layers": [{"id": "a", "name": "A", "fields": [
            {"field": "f", "name": "F", "type": "date"}
        ]}]}"#;
        assert!(CatalogConfig::from_json_str(content).is_err());
    }
}
