//! Shared fixtures for the layer-filter integration tests

#![allow(dead_code)]

use layer_filter::FieldCatalog;
use serde_json::{Map, Value};

/// Two filterable layers: one paired with a label layer, one standalone.
pub const SAMPLE_CATALOG: &str = r#"
{
    "layers": [
        {
            "id": "communities",
            "name": "Current Communities",
            "description": "Boundaries of the current communities.",
            "targets": [
                { "id": "communities_fill" },
                { "id": "communities_labels", "filter": ["==", ["get", "kind"], "label"] }
            ],
            "fields": [
                { "field": "code", "name": "Community Code", "type": "text", "help": "Unique community code, e.g. SE-SEGH" },
                { "field": "population", "name": "Population", "type": "number", "help": "Residents at the last count" }
            ]
        },
        {
            "id": "earthquakes",
            "name": "UK Historical Earthquakes",
            "fields": [
                { "field": "magnitude", "name": "Magnitude", "type": "number" },
                { "field": "region", "name": "Region", "type": "text" }
            ]
        }
    ]
}
"#;

pub fn sample_catalog() -> FieldCatalog {
    FieldCatalog::from_json_str(SAMPLE_CATALOG).unwrap()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

pub fn feature(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("Expected object"),
    }
}

pub fn earthquake_features() -> Vec<Map<String, Value>> {
    vec![
        feature(serde_json::json!({"magnitude": 2.5, "region": "Kent"})),
        feature(serde_json::json!({"magnitude": 4.0, "region": "Dover Straits"})),
        feature(serde_json::json!({"magnitude": "5.2", "region": "Lincolnshire"})),
        feature(serde_json::json!({"magnitude": 6.1, "region": "Dogger Bank"})),
    ]
}
