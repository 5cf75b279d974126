//! Shared builders for derivation scenario tests.

use serde_json::{json, Value};

use routegen::placement::PlacementRecord;
use routegen::schema::SchemaLoader;
use routegen::RegistrySnapshot;

/// Schema stub resolving every table to a fixed label field.
pub struct FixedLabel(pub &'static str);

impl SchemaLoader for FixedLabel {
    fn load_table_schema(&self, _extension: &str, _table: &str) -> Option<String> {
        Some(self.0.to_string())
    }
}

/// Schema stub without any schema files.
pub struct NoSchema;

impl SchemaLoader for NoSchema {
    fn load_table_schema(&self, _extension: &str, _table: &str) -> Option<String> {
        None
    }
}

/// A registry with one `News` extension, one `Pi1` plugin and one `List`
/// controller whose `index` action takes an optional `DateTime` argument.
pub fn news_registry(class_doc: &str, method_doc: &str) -> RegistrySnapshot {
    serde_json::from_value(json!({
        "extensions": {
            "News": {
                "plugins": {
                    "Pi1": {
                        "controllers": {
                            "List": {
                                "actions": ["index"],
                                "class": {
                                    "docComment": class_doc,
                                    "methods": {
                                        "index": {
                                            "docComment": method_doc,
                                            "parameters": [
                                                {
                                                    "name": "dateFrom",
                                                    "type": "DateTime",
                                                    "hasDefault": true
                                                }
                                            ]
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }))
    .unwrap()
}

pub fn placement(page_id: u64, signature: &str, sorting: i64) -> PlacementRecord {
    PlacementRecord {
        page_id,
        signature: signature.to_string(),
        sorting,
        flexform: None,
    }
}

pub fn placement_with_flexform(
    page_id: u64,
    signature: &str,
    sorting: i64,
    flexform: Value,
) -> PlacementRecord {
    PlacementRecord {
        page_id,
        signature: signature.to_string(),
        sorting,
        flexform: Some(flexform),
    }
}
