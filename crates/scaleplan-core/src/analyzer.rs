//! Static metric dependency extraction from plan item expressions.
//!
//! Expressions are end-user authored JavaScript snippets such as
//!
//! ```text
//! get({metric_id: 'cpu_usage', stats: 'max', period_sec: 5}) > 80
//! ```
//!
//! They are never evaluated here. The analyzer parses the text as an
//! ECMAScript script and collects every object literal carrying a literal
//! `metric_id` property. The parser is an implementation detail of this module;
//! the rest of the crate only sees [`MetricReference`].
//!
//! Both the parser and the AST walk recurse once per nesting level, so input
//! longer than [`MAX_EXPRESSION_LEN`] bytes or nested deeper than
//! [`MAX_NESTING_DEPTH`] brackets is reported unresolved without parsing.
//!
//! Only string, number, boolean and substitution-free template literals
//! count as literal values; `null`, regular expressions and computed values
//! do not. When a key repeats inside one object literal, its first
//! occurrence wins.
//!
//! # Examples
//!
//! ```rust
//! use scaleplan_core::analyzer;
//!
//! let references = analyzer::analyze("get({metric_id: 'cpu_usage'}) > 80");
//! assert_eq!(references.len(), 1);
//! assert_eq!(references[0].metric_id, "cpu_usage");
//!
//! let broken = analyzer::analyze("get({metric_id: ");
//! assert!(broken[0].is_unresolved());
//! ```

use std::collections::HashSet;

use indexmap::IndexMap;
use log::debug;
use oxc_allocator::Allocator;
use oxc_ast::{
    ast::{Expression, ObjectExpression, ObjectPropertyKind, PropertyKey},
    visit::walk,
    Visit,
};
use oxc_parser::Parser;
use oxc_span::SourceType;
use serde::Serialize;

/// Display id of the reference returned for unparsable expressions.
pub const UNRESOLVED_METRIC_ID: &str = "Not found";

/// Longest expression handed to the parser, in bytes.
pub const MAX_EXPRESSION_LEN: usize = 2048;

/// Deepest `(`, `[` or `{` nesting handed to the parser.
pub const MAX_NESTING_DEPTH: usize = 64;

/// How a [`MetricReference`] was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// Read from a `metric_id` literal
    Literal,
    /// The expression did not parse; `reason` is the parser message
    Unresolved { reason: String },
}

/// A metric referenced by an expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricReference {
    pub metric_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub tags: IndexMap<String, String>,
    pub resolution: Resolution,
}

impl MetricReference {
    /// A reference read from the AST.
    pub fn literal(metric_id: impl Into<String>) -> Self {
        Self {
            metric_id: metric_id.into(),
            name: None,
            tags: IndexMap::new(),
            resolution: Resolution::Literal,
        }
    }

    /// The marker returned when the expression fails to parse.
    pub fn unresolved(reason: impl Into<String>) -> Self {
        Self {
            metric_id: UNRESOLVED_METRIC_ID.to_string(),
            name: None,
            tags: IndexMap::new(),
            resolution: Resolution::Unresolved {
                reason: reason.into(),
            },
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self.resolution, Resolution::Unresolved { .. })
    }
}

/// Deduplicated dependencies of one expression.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpressionDependencies {
    /// Metric ids in first-seen order
    pub metric_ids: Vec<String>,
    /// Parser message when the expression could not be analyzed
    pub unresolved: Option<String>,
}

/// Extracts every metric reference of `expression`, in source order and
/// without deduplication. Never fails: unparsable input yields a single
/// unresolved reference.
pub fn analyze(expression: &str) -> Vec<MetricReference> {
    if let Some(reason) = exceeds_limits(expression) {
        debug!("Expression not analyzed: {reason}");
        return vec![MetricReference::unresolved(reason)];
    }

    let allocator = Allocator::default();
    let source_type = SourceType::default().with_module(false);
    let parsed = Parser::new(&allocator, expression, source_type).parse();

    if parsed.panicked || !parsed.errors.is_empty() {
        let reason = parsed
            .errors
            .first()
            .map(ToString::to_string)
            .unwrap_or_else(|| "unparsable expression".to_string());
        debug!("Expression did not parse: {reason}");
        return vec![MetricReference::unresolved(reason)];
    }

    let mut collector = ReferenceCollector::default();
    collector.visit_program(&parsed.program);
    collector.references
}

/// Metric ids of `expression` deduplicated in first-seen order.
pub fn metric_ids(expression: &str) -> Vec<String> {
    dependencies(expression).metric_ids
}

/// Splits the analysis into resolved metric ids and the parse failure, if any.
pub fn dependencies(expression: &str) -> ExpressionDependencies {
    let mut result = ExpressionDependencies::default();
    for reference in analyze(expression) {
        match reference.resolution {
            Resolution::Unresolved { reason } => result.unresolved = Some(reason),
            Resolution::Literal => {
                if !result.metric_ids.contains(&reference.metric_id) {
                    result.metric_ids.push(reference.metric_id);
                }
            }
        }
    }
    result
}

/// Rejects input whose parse could exhaust the stack. Brackets inside string
/// literals are counted too.
fn exceeds_limits(expression: &str) -> Option<String> {
    let mut depth = 0usize;
    for byte in expression.bytes() {
        match byte {
            b'(' | b'[' | b'{' => {
                depth += 1;
                if depth > MAX_NESTING_DEPTH {
                    return Some("expression nested too deeply".to_string());
                }
            }
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    (expression.len() > MAX_EXPRESSION_LEN)
        .then(|| format!("expression longer than {MAX_EXPRESSION_LEN} bytes"))
}

#[derive(Default)]
struct ReferenceCollector {
    references: Vec<MetricReference>,
}

impl<'a> Visit<'a> for ReferenceCollector {
    fn visit_object_expression(&mut self, object: &ObjectExpression<'a>) {
        if let Some(reference) = reference_from_object(object) {
            self.references.push(reference);
        }
        walk::walk_object_expression(self, object);
    }
}

fn reference_from_object(object: &ObjectExpression<'_>) -> Option<MetricReference> {
    // The outer option records that the key was seen, the inner one whether
    // its value was a literal.
    let mut metric_id: Option<Option<String>> = None;
    let mut name: Option<Option<String>> = None;
    let mut tags = IndexMap::new();
    let mut tags_seen = false;

    for (key, value) in static_properties(object) {
        match key {
            "metric_id" => {
                metric_id.get_or_insert_with(|| literal_text(value));
            }
            "name" => {
                name.get_or_insert_with(|| literal_text(value));
            }
            "tags" if !tags_seen => {
                tags_seen = true;
                if let Expression::ObjectExpression(tag_object) = value {
                    let mut seen = HashSet::new();
                    for (tag, tag_value) in static_properties(tag_object) {
                        if !seen.insert(tag) {
                            continue;
                        }
                        if let Some(text) = literal_text(tag_value) {
                            tags.insert(tag.to_string(), text);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    metric_id.flatten().map(|metric_id| MetricReference {
        metric_id,
        name: name.flatten(),
        tags,
        resolution: Resolution::Literal,
    })
}

/// Non-computed `key: value` pairs of an object literal; spreads and
/// computed keys are skipped.
fn static_properties<'b, 'a>(
    object: &'b ObjectExpression<'a>,
) -> impl Iterator<Item = (&'b str, &'b Expression<'a>)> {
    object.properties.iter().filter_map(|property| match property {
        ObjectPropertyKind::ObjectProperty(property) if !property.computed => {
            let key = match &property.key {
                PropertyKey::StaticIdentifier(identifier) => identifier.name.as_str(),
                PropertyKey::StringLiteral(literal) => literal.value.as_str(),
                _ => return None,
            };
            Some((key, &property.value))
        }
        _ => None,
    })
}

fn literal_text(expression: &Expression<'_>) -> Option<String> {
    match expression {
        Expression::StringLiteral(literal) => Some(literal.value.to_string()),
        Expression::NumericLiteral(literal) => Some(format_number(literal.value)),
        Expression::BooleanLiteral(literal) => Some(literal.value.to_string()),
        Expression::TemplateLiteral(template) if template.expressions.is_empty() => template
            .quasis
            .first()
            .and_then(|quasi| quasi.value.cooked.as_ref())
            .map(ToString::to_string),
        _ => None,
    }
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
