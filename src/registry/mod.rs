//! Component registry input.
//!
//! # Data Flow
//! ```text
//! registry snapshot file (JSON)
//!     → loader.rs (parse & deserialize)
//!     → RegistrySnapshot (declared-order, immutable)
//!     → read by the rule derivation engine and the placement resolver
//! ```
//!
//! # Design Decisions
//! - The snapshot is an explicit value passed to the engine; no process-wide
//!   registry state
//! - Declared order of controllers and actions is preserved (it drives
//!   routability short-circuits and placement defaults)
//! - Absent class/method descriptors model non-existing classes/methods

pub mod loader;
pub mod snapshot;

pub use loader::{load_placements, load_registry, LoadError};
pub use snapshot::RegistrySnapshot;
