//! Registry snapshot definitions.
//!
//! This module defines the read-only component descriptor structure the
//! engine derives rules from: which extensions register which plugins, which
//! controllers and actions those expose, and the per-class/per-method
//! metadata (doc comments, declared parameters) an implementation obtains
//! from its own static-analysis or metadata-loading facility.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Immutable snapshot of all registered components.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RegistrySnapshot {
    /// Extension name → registered plugins.
    #[serde(default)]
    pub extensions: IndexMap<String, ExtensionEntry>,
}

/// One registered extension.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ExtensionEntry {
    /// Plugin name → plugin configuration.
    #[serde(default)]
    pub plugins: IndexMap<String, PluginEntry>,
}

/// One registered plugin of an extension.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PluginEntry {
    /// Controller name → controller configuration, in declared order.
    #[serde(default)]
    pub controllers: IndexMap<String, ControllerEntry>,
}

/// One controller declared for a plugin.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ControllerEntry {
    /// Action names in declared order.
    #[serde(default)]
    pub actions: Vec<String>,

    /// Class descriptor. `None` means the controller class does not exist;
    /// such controllers are skipped during derivation.
    #[serde(default)]
    pub class: Option<ControllerClass>,
}

/// Descriptor for an existing controller class.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ControllerClass {
    /// Raw class-level documentation comment.
    #[serde(default)]
    pub doc_comment: String,

    /// Action name → method descriptor. Actions declared for the plugin but
    /// missing here model non-existing methods and are skipped.
    #[serde(default)]
    pub methods: IndexMap<String, MethodDescriptor>,
}

/// Descriptor for one action method.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescriptor {
    /// Raw method-level documentation comment.
    #[serde(default)]
    pub doc_comment: String,

    /// Declared parameters in signature order.
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
}

/// One declared action parameter.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescriptor {
    /// Parameter name as declared.
    pub name: String,

    /// Declared type name as text. Empty means no type annotation.
    #[serde(default, rename = "type")]
    pub type_name: String,

    /// Whether the parameter declares a default value.
    #[serde(default)]
    pub has_default: bool,
}

impl RegistrySnapshot {
    /// First declared controller and its first declared action for a plugin.
    /// This is the fallback when a placement carries no usable controller
    /// switch in its configuration blob.
    pub fn default_controller_action(
        &self,
        extension: &str,
        plugin: &str,
    ) -> Option<(&str, &str)> {
        let plugin = self.extensions.get(extension)?.plugins.get(plugin)?;
        let (controller_name, controller) = plugin.controllers.first()?;
        let action = controller.actions.first()?;
        Some((controller_name.as_str(), action.as_str()))
    }
}
