//! The emitted rule table.
//!
//! Two kinds of `fixedPostVars` entries share one mapping: identity-keyed
//! segment definition lists, and page-keyed aliases pointing at an identity.
//! Page keys are the decimal form of the page id; they must never be
//! re-indexed, which is why merging into an existing configuration document
//! happens entry by entry.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::rules::segment::SegmentDefinition;

/// One `fixedPostVars` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FixedPostVar {
    /// Page entry: the identity string whose definition applies to the page.
    Alias(String),
    /// Identity entry: ordered segment definitions for controller, action
    /// and each argument.
    Definition(Vec<SegmentDefinition>),
}

/// File-name handling flags emitted alongside the rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileNameRules {
    #[serde(rename = "defaultToHTMLsuffixOnPrev")]
    pub default_to_html_suffix_on_prev: u8,
}

impl Default for FileNameRules {
    fn default() -> Self {
        Self {
            default_to_html_suffix_on_prev: 1,
        }
    }
}

/// Final output of one derivation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RuleTable {
    #[serde(rename = "fileName")]
    pub file_name: FileNameRules,

    #[serde(rename = "fixedPostVars")]
    pub fixed_post_vars: IndexMap<String, FixedPostVar>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the segment definitions for an identity.
    pub fn insert_definition(&mut self, identity: &str, segments: Vec<SegmentDefinition>) {
        self.fixed_post_vars
            .insert(identity.to_string(), FixedPostVar::Definition(segments));
    }

    /// Map a page id onto an identity.
    pub fn insert_page_alias(&mut self, page_id: u64, identity: &str) {
        self.fixed_post_vars
            .insert(page_id.to_string(), FixedPostVar::Alias(identity.to_string()));
    }

    /// Merge this table into an existing configuration document.
    ///
    /// Unrelated keys of `base` are left untouched; `fixedPostVars` entries
    /// are written one by one so existing entries survive and page-id keys
    /// keep their value. A non-object `base` is replaced entirely.
    pub fn merge_into(&self, base: &mut Value) {
        if !base.is_object() {
            *base = Value::Object(Map::new());
        }
        let Value::Object(config) = base else {
            return;
        };

        let file_name = config
            .entry("fileName".to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !file_name.is_object() {
            *file_name = Value::Object(Map::new());
        }
        if let Value::Object(file_name) = file_name {
            file_name.insert(
                "defaultToHTMLsuffixOnPrev".to_string(),
                Value::from(self.file_name.default_to_html_suffix_on_prev),
            );
        }

        let post_vars = config
            .entry("fixedPostVars".to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !post_vars.is_object() {
            *post_vars = Value::Object(Map::new());
        }
        if let Value::Object(post_vars) = post_vars {
            for (key, entry) in &self.fixed_post_vars {
                if let Ok(value) = serde_json::to_value(entry) {
                    post_vars.insert(key.clone(), value);
                }
            }
        }
    }
}
