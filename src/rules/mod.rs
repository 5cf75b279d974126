//! Rule derivation subsystem.
//!
//! # Data Flow
//! ```text
//! RegistrySnapshot + PlacementRecords + SchemaLoader
//!     → engine.rs pass 1: which (extension, plugin) pairs are routable
//!     → engine.rs pass 2: per routable controller/action
//!         segment.rs (controller/action/argument segment definitions)
//!         placement (page ids aliasing the identity)
//!     → table.rs (RuleTable: identity-keyed definitions + page aliases)
//! ```
//!
//! # Design Decisions
//! - Derivation never mutates its inputs; the table is built once
//! - Fail open: malformed metadata skips one controller/action, never the
//!   whole batch

pub mod engine;
pub mod segment;
pub mod table;

pub use engine::RuleDerivationEngine;
pub use segment::{ConversionMethod, SegmentDefinition, SegmentParameters};
pub use table::{FixedPostVar, RuleTable};
