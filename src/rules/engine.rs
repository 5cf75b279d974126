//! Rule derivation engine.
//!
//! # Responsibilities
//! - Decide which (extension, plugin) pairs are routable at all
//! - Build identity-keyed segment definitions for every routable action
//! - Alias pages to identities via topmost-placement resolution
//!
//! # Design Decisions
//! - Two passes over the registry, mirroring how routability gates the more
//!   expensive definition work
//! - Routability is decided by the first controller (in declared order) with
//!   any routable action; remaining controllers are not scanned. A
//!   class-level disable met while the plugin is still unroutable also stops
//!   the scan. Both short-circuits are intentional.
//! - Everything fails open: one component's malformed metadata skips that
//!   component only

use crate::annotation::parser::parse_doc_comment;
use crate::annotation::policy::is_routable;
use crate::placement::{pages_for_action, PlacementRecord};
use crate::registry::snapshot::RegistrySnapshot;
use crate::rules::segment::{action_segment, argument_segment, controller_segment};
use crate::rules::table::RuleTable;
use crate::schema::{SchemaCache, SchemaLoader};

/// Derives the rule table for one registry/placement snapshot.
pub struct RuleDerivationEngine<'a, L> {
    registry: &'a RegistrySnapshot,
    placements: &'a [PlacementRecord],
    schema: SchemaCache<L>,
}

impl<'a, L: SchemaLoader> RuleDerivationEngine<'a, L> {
    pub fn new(
        registry: &'a RegistrySnapshot,
        placements: &'a [PlacementRecord],
        schema_loader: L,
    ) -> Self {
        Self {
            registry,
            placements,
            schema: SchemaCache::new(schema_loader),
        }
    }

    /// Run one full derivation pass.
    pub fn build(&mut self) -> RuleTable {
        let routable = self.routable_plugins();
        tracing::info!(plugins = routable.len(), "Routable plugins determined");

        let signatures: Vec<String> = routable
            .iter()
            .map(|(extension, plugin)| plugin_signature(extension, plugin))
            .collect();

        let mut table = RuleTable::new();
        for (extension, plugin) in &routable {
            self.derive_plugin_rules(extension, plugin, &signatures, &mut table);
        }
        table
    }

    /// Pass 1: every (extension, plugin) pair with at least one routable
    /// action, found by scanning controllers in declared order and stopping
    /// at the first hit.
    fn routable_plugins(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (extension_name, extension) in &self.registry.extensions {
            for (plugin_name, plugin) in &extension.plugins {
                let mut routable = false;
                for controller in plugin.controllers.values() {
                    if routable {
                        break;
                    }
                    let Some(class) = &controller.class else {
                        continue;
                    };
                    let class_directives = parse_doc_comment(&class.doc_comment);
                    if !is_routable(&class_directives) && !routable {
                        break;
                    }
                    for action in &controller.actions {
                        let Some(method) = class.methods.get(action) else {
                            continue;
                        };
                        if is_routable(&parse_doc_comment(&method.doc_comment)) {
                            routable = true;
                            break;
                        }
                    }
                }
                if routable {
                    tracing::debug!(
                        extension = extension_name.as_str(),
                        plugin = plugin_name.as_str(),
                        "Plugin is routable"
                    );
                    pairs.push((extension_name.clone(), plugin_name.clone()));
                }
            }
        }
        pairs
    }

    /// Pass 2 for one plugin: segment definitions per routable action plus
    /// page aliases.
    fn derive_plugin_rules(
        &mut self,
        extension: &str,
        plugin: &str,
        registered_signatures: &[String],
        table: &mut RuleTable,
    ) {
        let Some(controllers) = self
            .registry
            .extensions
            .get(extension)
            .and_then(|e| e.plugins.get(plugin))
            .map(|p| &p.controllers)
        else {
            return;
        };
        let signature = plugin_signature(extension, plugin);
        let url_prefix = format!("tx_{signature}");

        for (controller_name, controller) in controllers {
            let Some(class) = &controller.class else {
                continue;
            };
            let class_directives = parse_doc_comment(&class.doc_comment);
            if !is_routable(&class_directives) {
                continue;
            }
            for action_name in &controller.actions {
                let Some(method) = class.methods.get(action_name) else {
                    continue;
                };
                let method_directives = parse_doc_comment(&method.doc_comment);
                if !is_routable(&method_directives) {
                    continue;
                }

                let mut segments = vec![
                    controller_segment(&url_prefix, &class_directives),
                    action_segment(&url_prefix, &method_directives),
                ];
                for parameter in &method.parameters {
                    segments.push(argument_segment(
                        parameter,
                        &method_directives,
                        &url_prefix,
                        extension,
                        &mut self.schema,
                    ));
                }

                let identity = action_identity(&signature, controller_name, action_name);
                tracing::debug!(
                    identity = identity.as_str(),
                    segments = segments.len(),
                    "Derived rule"
                );
                table.insert_definition(&identity, segments);

                let pages = pages_for_action(
                    self.placements,
                    self.registry,
                    extension,
                    plugin,
                    controller_name,
                    action_name,
                    &signature,
                    registered_signatures,
                );
                for page_id in pages {
                    table.insert_page_alias(page_id, &identity);
                }
            }
        }
    }
}

/// Signature uniquely naming a plugin: underscores stripped from both names,
/// lowercased, joined with `_`. `News`/`Pi1` → `news_pi1`.
pub fn plugin_signature(extension: &str, plugin: &str) -> String {
    format!(
        "{}_{}",
        extension.replace('_', "").to_lowercase(),
        plugin.replace('_', "").to_lowercase()
    )
}

/// Identity keying one rule group: plugin signature, controller and action.
pub fn action_identity(signature: &str, controller: &str, action: &str) -> String {
    format!(
        "{signature}_{}_{}",
        controller.to_lowercase(),
        action.to_lowercase()
    )
}
