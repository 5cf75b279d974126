//! Routing annotation subsystem.
//!
//! # Data Flow
//! ```text
//! raw doc-comment text
//!     → parser.rs (scan @route lines, one directive per match)
//!     → policy.rs (fold directives into routable / noMatch / redirect)
//!     → consumed by the rule derivation engine
//! ```
//!
//! # Design Decisions
//! - Directives are immutable once parsed
//! - Unknown directive shapes are kept but have no routing effect (fail open)
//! - Policy resolution is last-wins within one directive sequence

pub mod parser;
pub mod policy;

pub use parser::{parse_doc_comment, DirectiveKind, RedirectRule, RoutingDirective};
pub use policy::{is_routable, no_match_rule, redirect_rule};
