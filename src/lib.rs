//! Routing auto-configuration generator for CMS plugin content.
//!
//! Walks a registry snapshot of plugin controllers/actions, resolves their
//! `@route` annotations into a routing policy, matches plugins against the
//! pages they are placed on, and emits a declarative rule table mapping page
//! identity and URL segments to controller/action/argument bindings.
//!
//! The derivation is a single synchronous batch pass: inputs are read-only
//! snapshots, the output is built once and never mutated afterwards.

pub mod annotation;
pub mod flexform;
pub mod placement;
pub mod registry;
pub mod rules;
pub mod schema;

pub use registry::snapshot::RegistrySnapshot;
pub use rules::engine::RuleDerivationEngine;
pub use rules::table::RuleTable;
pub use schema::{FileSchemaLoader, SchemaLoader};
