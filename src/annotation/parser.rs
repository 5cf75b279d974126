//! `@route` directive parsing.
//!
//! # Responsibilities
//! - Scan doc-comment text line by line for `@route` markers
//! - Parse each single-line payload into a directive
//! - Preserve source order (policy resolution is last-wins)
//!
//! # Design Decisions
//! - No regex; plain substring scanning keeps matching O(n) and predictable
//! - Malformed payloads become `Unknown` directives instead of errors

use serde::{Deserialize, Serialize};

/// Marker that introduces a routing directive inside a doc comment.
const ROUTE_MARKER: &str = "@route";

/// One parsed `@route` instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDirective {
    /// Argument name this directive applies to. `None` means the directive
    /// applies to the controller/action itself.
    pub scope: Option<String>,
    pub kind: DirectiveKind,
}

/// The instruction carried by a directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveKind {
    /// Fallback when a segment value cannot be matched. A rule value of
    /// `None` (written `NoMatch(NULL)` or `NoMatch()`) disables routing for
    /// the annotated scope.
    NoMatch(Option<String>),
    /// Fallback routing target for invalid segment values.
    Redirect(RedirectRule),
    /// Any payload shape the parser does not recognize. Kept for
    /// extensibility but has no effect on policy resolution.
    Unknown(String),
}

/// Parameters of a `Redirect(...)` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectRule {
    /// Redirect target (path or URL).
    pub target: String,
    /// Optional HTTP status code for the redirect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

/// Extract all routing directives from a raw doc-comment string.
///
/// Every line containing `@route` followed by a payload yields exactly one
/// directive, in source order. Text with no markers yields an empty vec.
pub fn parse_doc_comment(doc_comment: &str) -> Vec<RoutingDirective> {
    let mut directives = Vec::new();
    for line in doc_comment.lines() {
        let Some(position) = line.find(ROUTE_MARKER) else {
            continue;
        };
        let payload = line[position + ROUTE_MARKER.len()..].trim();
        if payload.is_empty() {
            continue;
        }
        directives.push(parse_payload(payload));
    }
    directives
}

/// Parse one payload: an optional `$argument` scope prefix followed by an
/// instruction such as `NoMatch(...)` or `Redirect(...)`.
fn parse_payload(payload: &str) -> RoutingDirective {
    let (scope, instruction) = match payload.strip_prefix('$') {
        Some(rest) => {
            let (name, tail) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            (Some(name.to_string()), tail.trim())
        }
        None => (None, payload),
    };
    RoutingDirective {
        scope,
        kind: parse_instruction(instruction),
    }
}

fn parse_instruction(instruction: &str) -> DirectiveKind {
    let Some((name, rest)) = instruction.split_once('(') else {
        return DirectiveKind::Unknown(instruction.to_string());
    };
    let Some(inner) = rest.trim_end().strip_suffix(')') else {
        return DirectiveKind::Unknown(instruction.to_string());
    };
    match name.trim() {
        "NoMatch" => DirectiveKind::NoMatch(parse_rule_value(inner)),
        "Redirect" => match parse_redirect(inner) {
            Some(rule) => DirectiveKind::Redirect(rule),
            None => DirectiveKind::Unknown(instruction.to_string()),
        },
        _ => DirectiveKind::Unknown(instruction.to_string()),
    }
}

/// `NULL` and the empty payload both mean "no rule value".
fn parse_rule_value(inner: &str) -> Option<String> {
    let value = unquote(inner.trim());
    if value.is_empty() || value == "NULL" {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_redirect(inner: &str) -> Option<RedirectRule> {
    let mut parts = inner.splitn(2, ',');
    let target = unquote(parts.next()?.trim());
    if target.is_empty() {
        return None;
    }
    let status = parts
        .next()
        .and_then(|raw| unquote(raw.trim()).parse::<u16>().ok());
    Some(RedirectRule {
        target: target.to_string(),
        status,
    })
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .or_else(|| value.strip_prefix('"').and_then(|v| v.strip_suffix('"')))
        .unwrap_or(value)
}
