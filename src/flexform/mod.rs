//! Form-tree flattener.
//!
//! Converts a nested, section- and language-aware form document (the
//! structured configuration blob attached to placement records) into a flat
//! or shallow-nested settings mapping. Standalone: the placement resolver
//! consumes it, but it has no dependency on the rest of the crate.
//!
//! # Data Flow
//! ```text
//! nested document (serde_json::Value)
//!     → unwrap optional top-level "data" envelope
//!     → per field group: descend into the language sub-node ("lDEF")
//!     → per setting: walk() resolves value wrappers ("vDEF"),
//!       section markers ("el", "_arrayContainer") and dotted keys
//!     → FlatSettings (insertion-ordered map)
//! ```
//!
//! # Design Decisions
//! - Dotted keys expand through an explicit path upsert; each container owns
//!   its children, no aliasing during construction
//! - Non-container input yields empty settings, never an error
//! - Keys starting with `_` are metadata and skipped

use serde_json::{Map, Value};

/// Default language pointer inside a field group.
pub const DEFAULT_LANGUAGE_KEY: &str = "lDEF";
/// Default value pointer wrapping terminal values.
pub const DEFAULT_VALUE_KEY: &str = "vDEF";

/// Keys marking a repeating section group; their child is unwrapped
/// transparently.
const SECTION_KEYS: [&str; 2] = ["el", "_arrayContainer"];

/// Flattened settings: string keys mapping to scalars or nested mappings.
pub type FlatSettings = Map<String, Value>;

/// Flatten a form document using the default language and value pointers.
pub fn flatten(document: &Value) -> FlatSettings {
    flatten_with(document, DEFAULT_LANGUAGE_KEY, DEFAULT_VALUE_KEY)
}

/// Flatten a form document with explicit language/value pointers.
///
/// The document may wrap its content under a top-level `data` key; that
/// envelope is unwrapped when present. Anything that is not a container
/// flattens to empty settings.
pub fn flatten_with(document: &Value, language_key: &str, value_key: &str) -> FlatSettings {
    let mut settings = FlatSettings::new();
    let Value::Object(root) = document else {
        return settings;
    };
    let tree = match root.get("data") {
        Some(Value::Object(data)) => data,
        _ => root,
    };
    for group in tree.values() {
        let Some(Value::Object(language_node)) = group.as_object().and_then(|g| g.get(language_key))
        else {
            continue;
        };
        for (key, definition) in language_node {
            if !key.contains('.') {
                settings.insert(key.clone(), walk(definition, value_key));
                continue;
            }
            let segments: Vec<&str> = key.split('.').collect();
            let leaf = match definition {
                Value::Object(map) => match map.get(value_key) {
                    Some(value) => value.clone(),
                    None => walk(definition, value_key),
                },
                other => other.clone(),
            };
            upsert_path(&mut settings, &segments, leaf);
        }
    }
    settings
}

/// Recursively resolve one form node.
///
/// Rule order matters: value wrappers terminate the descent, section markers
/// unwrap transparently, metadata keys are skipped, dotted keys expand into
/// nested containers.
pub fn walk(node: &Value, value_key: &str) -> Value {
    let Value::Object(map) = node else {
        return node.clone();
    };
    let mut result = FlatSettings::new();
    for (key, child) in map {
        if key == value_key {
            return child.clone();
        }
        if SECTION_KEYS.contains(&key.as_str()) {
            return walk(child, value_key);
        }
        if key.starts_with('_') {
            continue;
        }
        if key.contains('.') {
            let segments: Vec<&str> = key.split('.').collect();
            let (last, parents) = segments.split_last().unwrap_or((&"", &[]));
            let mut wrapper = FlatSettings::new();
            wrapper.insert((*last).to_string(), child.clone());
            let resolved = walk(&Value::Object(wrapper), value_key);
            upsert_path(&mut result, parents, resolved);
            continue;
        }
        let resolved = match child {
            Value::Object(inner) => match inner.get(value_key) {
                Some(value) => value.clone(),
                None => walk(child, value_key),
            },
            other => other.clone(),
        };
        result.insert(key.clone(), resolved);
    }
    Value::Object(result)
}

/// Set `root[segments[0]]..[segments[n-1]] = value`, creating or descending
/// one owned container per level. Existing non-container nodes on the path
/// are replaced.
fn upsert_path(root: &mut FlatSettings, segments: &[&str], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };
    let mut current = root;
    for segment in parents {
        let slot = current
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(FlatSettings::new()));
        if !slot.is_object() {
            *slot = Value::Object(FlatSettings::new());
        }
        let Value::Object(next) = slot else {
            return;
        };
        current = next;
    }
    current.insert((*last).to_string(), value);
}
