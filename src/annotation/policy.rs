//! Routing policy resolution over directive sequences.
//!
//! # Responsibilities
//! - Decide whether a class/method is routable at all
//! - Pick the applicable noMatch and redirect fallback rules per scope
//!
//! # Design Decisions
//! - Pure functions over an ordered slice; no state
//! - Last matching directive wins within one sequence
//! - A directive with no scope never applies to argument queries, and vice
//!   versa (exact scope matching)

use crate::annotation::parser::{DirectiveKind, RedirectRule, RoutingDirective};

/// A class or method is routable unless any directive explicitly disables
/// routing for the controller/action itself: `NoMatch(NULL)` with no
/// argument scope. Short-circuits on the first disabling directive.
pub fn is_routable(directives: &[RoutingDirective]) -> bool {
    !directives
        .iter()
        .any(|d| d.scope.is_none() && d.kind == DirectiveKind::NoMatch(None))
}

/// Resolve the noMatch rule for the given scope. Later directives in the
/// same sequence override earlier ones; disabling directives (rule value
/// `None`) carry no rule and are skipped here.
pub fn no_match_rule(directives: &[RoutingDirective], scope: Option<&str>) -> Option<String> {
    let mut rule = None;
    for directive in directives {
        if directive.scope.as_deref() != scope {
            continue;
        }
        if let DirectiveKind::NoMatch(Some(value)) = &directive.kind {
            rule = Some(value.clone());
        }
    }
    rule
}

/// Resolve the redirect rule for the given scope, last-wins.
pub fn redirect_rule(directives: &[RoutingDirective], scope: Option<&str>) -> Option<RedirectRule> {
    let mut rule = None;
    for directive in directives {
        if directive.scope.as_deref() != scope {
            continue;
        }
        if let DirectiveKind::Redirect(redirect) = &directive.kind {
            rule = Some(redirect.clone());
        }
    }
    rule
}
