//! Segment definitions and the argument binding builder.
//!
//! One segment definition is emitted per clean-URL path component: the
//! controller segment, the action segment, and one per declared action
//! argument. Argument segments carry the parameters the execution-time
//! value translator is invoked with.

use serde::{Deserialize, Serialize};

use crate::annotation::parser::{RedirectRule, RoutingDirective};
use crate::annotation::policy::{no_match_rule, redirect_rule};
use crate::registry::snapshot::ParameterDescriptor;
use crate::schema::{SchemaCache, SchemaLoader};

/// Handler id of the external execution-time value translator that consumes
/// argument segment parameters at request time.
pub const SEGMENT_VALUE_TRANSLATOR: &str = "SegmentValueProcessor::translateSegmentValue";

/// How an incoming segment value is converted to an argument value.
///
/// Selection matches declared type names exactly; the reserved list is
/// closed. Any other identifier is treated as an entity reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionMethod {
    /// No declared type; the value is passed through by position.
    None,
    /// `DateTime`: the value is parsed as a date.
    Date,
    /// `float`, `integer`, `string`: scalar passthrough.
    Scalar,
    /// Any other type name: resolved as a structured entity by identifier.
    Entity,
}

/// One segment definition in the emitted rule table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentDefinition {
    /// GET variable the segment value binds to, e.g. `tx_news_pi1[action]`.
    #[serde(rename = "GETvar")]
    pub get_var: String,

    /// Fallback rule when the segment value cannot be matched.
    #[serde(rename = "noMatch", skip_serializing_if = "Option::is_none")]
    pub no_match: Option<String>,

    /// Execution-time translator invoked for argument segments.
    #[serde(rename = "userFunc", skip_serializing_if = "Option::is_none")]
    pub user_func: Option<String>,

    /// Parameters passed to the translator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<SegmentParameters>,

    /// Set when the argument declares a default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
}

/// Parameter bag for the execution-time value translator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentParameters {
    #[serde(rename = "conversionMethod")]
    pub conversion_method: ConversionMethod,

    /// Declared type name as written in the action signature.
    #[serde(rename = "className")]
    pub class_name: String,

    /// Entity table name (entity conversion only).
    #[serde(rename = "tableName", skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,

    /// Label field of the entity table, when the schema provides one.
    #[serde(rename = "labelField", skip_serializing_if = "Option::is_none")]
    pub label_field: Option<String>,

    #[serde(rename = "noMatch", skip_serializing_if = "Option::is_none")]
    pub no_match: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<RedirectRule>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
}

/// Segment binding the controller name, with the class-level noMatch rule.
pub fn controller_segment(
    url_prefix: &str,
    class_directives: &[RoutingDirective],
) -> SegmentDefinition {
    SegmentDefinition {
        get_var: format!("{url_prefix}[controller]"),
        no_match: no_match_rule(class_directives, None),
        user_func: None,
        parameters: None,
        optional: None,
    }
}

/// Segment binding the action name, with the method-level noMatch rule.
pub fn action_segment(
    url_prefix: &str,
    method_directives: &[RoutingDirective],
) -> SegmentDefinition {
    SegmentDefinition {
        get_var: format!("{url_prefix}[action]"),
        no_match: no_match_rule(method_directives, None),
        user_func: None,
        parameters: None,
        optional: None,
    }
}

/// Build the segment definition for one declared action argument.
///
/// The conversion strategy follows the declared type name; entity types
/// additionally resolve their table's label field through the schema cache.
/// noMatch/redirect rules are taken from the method's directives scoped to
/// the argument name.
pub fn argument_segment<L: SchemaLoader>(
    parameter: &ParameterDescriptor,
    method_directives: &[RoutingDirective],
    url_prefix: &str,
    extension: &str,
    schema: &mut SchemaCache<L>,
) -> SegmentDefinition {
    let mut table_name = None;
    let mut label_field = None;
    let conversion_method = match parameter.type_name.as_str() {
        "" => ConversionMethod::None,
        "DateTime" => ConversionMethod::Date,
        "float" | "integer" | "string" => ConversionMethod::Scalar,
        other => {
            let table = other.to_lowercase();
            label_field = schema.label_field(extension, &table);
            table_name = Some(table);
            ConversionMethod::Entity
        }
    };

    let no_match = no_match_rule(method_directives, Some(&parameter.name));
    let redirect = redirect_rule(method_directives, Some(&parameter.name));
    let optional = parameter.has_default.then_some(true);

    SegmentDefinition {
        get_var: format!("{url_prefix}[{}]", parameter.name),
        no_match: no_match.clone(),
        user_func: Some(SEGMENT_VALUE_TRANSLATOR.to_string()),
        parameters: Some(SegmentParameters {
            conversion_method,
            class_name: parameter.type_name.clone(),
            table_name,
            label_field,
            no_match,
            redirect,
            optional,
        }),
        optional,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::parser::parse_doc_comment;

    struct StaticLoader(Option<&'static str>);

    impl SchemaLoader for StaticLoader {
        fn load_table_schema(&self, _extension: &str, _table: &str) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    fn cache(label: Option<&'static str>) -> SchemaCache<StaticLoader> {
        SchemaCache::new(StaticLoader(label))
    }

    fn parameter(name: &str, type_name: &str, has_default: bool) -> ParameterDescriptor {
        ParameterDescriptor {
            name: name.to_string(),
            type_name: type_name.to_string(),
            has_default,
        }
    }

    #[test]
    fn test_controller_segment_shape() {
        let directives = parse_doc_comment("@route NoMatch(bypass)");
        let segment = controller_segment("tx_news_pi1", &directives);
        assert_eq!(segment.get_var, "tx_news_pi1[controller]");
        assert_eq!(segment.no_match.as_deref(), Some("bypass"));
        assert!(segment.parameters.is_none());
    }

    #[test]
    fn test_untyped_argument_has_no_conversion() {
        let segment = argument_segment(
            &parameter("raw", "", false),
            &[],
            "tx_x",
            "X",
            &mut cache(None),
        );
        let params = segment.parameters.unwrap();
        assert_eq!(params.conversion_method, ConversionMethod::None);
        assert_eq!(params.class_name, "");
        assert!(params.table_name.is_none());
    }

    #[test]
    fn test_datetime_argument_converts_as_date() {
        let segment = argument_segment(
            &parameter("dateFrom", "DateTime", true),
            &[],
            "tx_news_pi1",
            "News",
            &mut cache(None),
        );
        assert_eq!(segment.get_var, "tx_news_pi1[dateFrom]");
        assert_eq!(segment.optional, Some(true));
        let params = segment.parameters.unwrap();
        assert_eq!(params.conversion_method, ConversionMethod::Date);
        assert_eq!(params.optional, Some(true));
    }

    #[test]
    fn test_scalar_types_pass_through() {
        for type_name in ["float", "integer", "string"] {
            let segment = argument_segment(
                &parameter("value", type_name, false),
                &[],
                "tx_x",
                "X",
                &mut cache(None),
            );
            let params = segment.parameters.unwrap();
            assert_eq!(params.conversion_method, ConversionMethod::Scalar);
            assert!(params.table_name.is_none());
            assert!(params.optional.is_none());
        }
    }

    #[test]
    fn test_reserved_names_are_case_sensitive() {
        // "datetime" is not the reserved "DateTime" and resolves as entity.
        let segment = argument_segment(
            &parameter("when", "datetime", false),
            &[],
            "tx_x",
            "X",
            &mut cache(None),
        );
        let params = segment.parameters.unwrap();
        assert_eq!(params.conversion_method, ConversionMethod::Entity);
        assert_eq!(params.table_name.as_deref(), Some("datetime"));
    }

    #[test]
    fn test_entity_argument_resolves_label_field() {
        let segment = argument_segment(
            &parameter("newsItem", "Tx_News_Domain_Model_News", false),
            &[],
            "tx_news_pi1",
            "News",
            &mut cache(Some("title")),
        );
        let params = segment.parameters.unwrap();
        assert_eq!(params.conversion_method, ConversionMethod::Entity);
        assert_eq!(
            params.table_name.as_deref(),
            Some("tx_news_domain_model_news")
        );
        assert_eq!(params.label_field.as_deref(), Some("title"));
        assert_eq!(
            segment.user_func.as_deref(),
            Some(SEGMENT_VALUE_TRANSLATOR)
        );
    }

    #[test]
    fn test_missing_schema_leaves_label_unset() {
        let segment = argument_segment(
            &parameter("item", "SomeModel", false),
            &[],
            "tx_x",
            "X",
            &mut cache(None),
        );
        let params = segment.parameters.unwrap();
        assert_eq!(params.table_name.as_deref(), Some("somemodel"));
        assert!(params.label_field.is_none());
    }

    #[test]
    fn test_argument_scoped_rules_attach() {
        let directives =
            parse_doc_comment("@route $item NoMatch(bypass)\n@route $item Redirect('/x', 301)");
        let segment = argument_segment(
            &parameter("item", "string", false),
            &directives,
            "tx_x",
            "X",
            &mut cache(None),
        );
        assert_eq!(segment.no_match.as_deref(), Some("bypass"));
        let params = segment.parameters.unwrap();
        assert_eq!(params.no_match.as_deref(), Some("bypass"));
        assert_eq!(params.redirect.unwrap().target, "/x");
    }

    #[test]
    fn test_serialized_field_names() {
        let segment = argument_segment(
            &parameter("dateFrom", "DateTime", true),
            &[],
            "tx_news_pi1",
            "News",
            &mut cache(None),
        );
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(json["GETvar"], "tx_news_pi1[dateFrom]");
        assert_eq!(json["parameters"]["conversionMethod"], "date");
        assert_eq!(json["parameters"]["className"], "DateTime");
        assert_eq!(json["optional"], true);
        assert!(json.get("noMatch").is_none());
    }
}
