//! Table schema lookup for entity-typed arguments.
//!
//! # Responsibilities
//! - Resolve the label field of an entity table from its owning extension's
//!   schema definition file
//! - Cache lookups by table name so a schema file is loaded at most once
//!   per derivation pass
//!
//! # Design Decisions
//! - Loading is behind a trait so the schema-definition format is pluggable
//! - Missing or unreadable schemas resolve to "no label field", never errors
//! - The cache also stores negative results; repeated misses stay cheap

use std::collections::HashMap;
use std::path::PathBuf;

/// Source of table schema information.
pub trait SchemaLoader {
    /// Return the label field configured for `table` in the schema of
    /// `extension`, if any.
    fn load_table_schema(&self, extension: &str, table: &str) -> Option<String>;
}

/// Loads table schemas from per-extension `tables.toml` files under a root
/// directory. The extension directory name is the lowercase-underscored form
/// of the extension name (`MyExt` → `my_ext`), matching how extensions are
/// laid out on disk.
///
/// File format, one table per top-level key:
/// ```toml
/// [tx_news_domain_model_news]
/// label = "title"
/// ```
#[derive(Debug, Clone)]
pub struct FileSchemaLoader {
    root: PathBuf,
}

impl FileSchemaLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SchemaLoader for FileSchemaLoader {
    fn load_table_schema(&self, extension: &str, table: &str) -> Option<String> {
        let path = self
            .root
            .join(lowercase_underscored(extension))
            .join("tables.toml");
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(error) => {
                tracing::debug!(path = %path.display(), %error, "No schema file for extension");
                return None;
            }
        };
        let document: toml::Table = match content.parse() {
            Ok(document) => document,
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "Unparsable schema file");
                return None;
            }
        };
        document
            .get(table)?
            .get("label")?
            .as_str()
            .map(str::to_string)
    }
}

/// Memoizes label-field lookups by table name for one derivation pass.
///
/// Shared state is scoped to the pass that owns it; concurrent derivations
/// would each carry their own cache.
pub struct SchemaCache<L> {
    loader: L,
    labels: HashMap<String, Option<String>>,
}

impl<L: SchemaLoader> SchemaCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            labels: HashMap::new(),
        }
    }

    /// Resolve the label field for `table`, loading through the schema
    /// loader on the first request for that table name.
    pub fn label_field(&mut self, extension: &str, table: &str) -> Option<String> {
        if let Some(cached) = self.labels.get(table) {
            return cached.clone();
        }
        let label = self.loader.load_table_schema(extension, table);
        self.labels.insert(table.to_string(), label.clone());
        label
    }
}

/// Convert a camel-cased extension name to its lowercase-underscored on-disk
/// form: `MyExt` → `my_ext`, `News` → `news`.
pub fn lowercase_underscored(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    for (index, character) in name.chars().enumerate() {
        if character.is_ascii_uppercase() && index > 0 {
            result.push('_');
        }
        result.extend(character.to_lowercase());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Write;

    struct CountingLoader {
        calls: RefCell<u32>,
        label: Option<String>,
    }

    impl SchemaLoader for CountingLoader {
        fn load_table_schema(&self, _extension: &str, _table: &str) -> Option<String> {
            *self.calls.borrow_mut() += 1;
            self.label.clone()
        }
    }

    #[test]
    fn test_cache_loads_once_per_table() {
        let loader = CountingLoader {
            calls: RefCell::new(0),
            label: Some("title".to_string()),
        };
        let mut cache = SchemaCache::new(loader);
        assert_eq!(
            cache.label_field("News", "tx_news_domain_model_news"),
            Some("title".to_string())
        );
        assert_eq!(
            cache.label_field("News", "tx_news_domain_model_news"),
            Some("title".to_string())
        );
        assert_eq!(*cache.loader.calls.borrow(), 1);
    }

    #[test]
    fn test_cache_stores_negative_results() {
        let loader = CountingLoader {
            calls: RefCell::new(0),
            label: None,
        };
        let mut cache = SchemaCache::new(loader);
        assert_eq!(cache.label_field("News", "missing"), None);
        assert_eq!(cache.label_field("News", "missing"), None);
        assert_eq!(*cache.loader.calls.borrow(), 1);
    }

    #[test]
    fn test_file_loader_reads_label() {
        let dir = tempfile::tempdir().unwrap();
        let ext_dir = dir.path().join("my_ext");
        std::fs::create_dir(&ext_dir).unwrap();
        let mut file = std::fs::File::create(ext_dir.join("tables.toml")).unwrap();
        writeln!(file, "[tx_myext_domain_model_item]\nlabel = \"name\"").unwrap();

        let loader = FileSchemaLoader::new(dir.path());
        assert_eq!(
            loader.load_table_schema("MyExt", "tx_myext_domain_model_item"),
            Some("name".to_string())
        );
        assert_eq!(loader.load_table_schema("MyExt", "unknown_table"), None);
        assert_eq!(loader.load_table_schema("OtherExt", "whatever"), None);
    }

    #[test]
    fn test_unparsable_schema_file_resolves_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let ext_dir = dir.path().join("broken");
        std::fs::create_dir(&ext_dir).unwrap();
        std::fs::write(ext_dir.join("tables.toml"), "not [valid toml").unwrap();

        let loader = FileSchemaLoader::new(dir.path());
        assert_eq!(loader.load_table_schema("Broken", "any"), None);
    }

    #[test]
    fn test_lowercase_underscored() {
        assert_eq!(lowercase_underscored("News"), "news");
        assert_eq!(lowercase_underscored("MyExt"), "my_ext");
        assert_eq!(lowercase_underscored("already_lower"), "already_lower");
    }
}
