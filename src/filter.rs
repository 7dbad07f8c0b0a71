// 🔍 Filter Predicate Evaluator - ad-hoc queries over record collections
// Filter specs arrive from an external natural-language translation service
// and are untrusted: unknown operators parse to an explicit no-op arm and
// missing fields read as null, so a malformed filter degrades to "no
// filtering" instead of hiding data.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::Record;
use crate::normalize::{coerce_string, to_f64};

// ============================================================================
// WIRE TYPES
// ============================================================================

/// One field/operator/value triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub field: String,
    pub operator: String,
    #[serde(default)]
    pub value: Value,
}

/// Structured filter spec keyed by table name. Tables absent from the spec
/// are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub entities: FilterEntities,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterEntities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Vec<Predicate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker: Option<Vec<Predicate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<Vec<Predicate>>,
}

// ============================================================================
// OPERATORS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    Includes,
    NotIncludes,
    Range,
    Exists,
    NotExists,
    StartsWith,
    EndsWith,
    Contains,
    /// Fail-open arm: an unrecognized operator never excludes a record.
    NoOp,
}

impl FilterOp {
    pub fn parse(op: &str) -> FilterOp {
        match op {
            "==" => FilterOp::Eq,
            "!=" => FilterOp::Ne,
            ">" => FilterOp::Gt,
            "<" => FilterOp::Lt,
            ">=" => FilterOp::Ge,
            "<=" => FilterOp::Le,
            "includes" => FilterOp::Includes,
            "notIncludes" => FilterOp::NotIncludes,
            "range" => FilterOp::Range,
            "exists" => FilterOp::Exists,
            "notExists" => FilterOp::NotExists,
            "startsWith" => FilterOp::StartsWith,
            "endsWith" => FilterOp::EndsWith,
            "contains" => FilterOp::Contains,
            _ => FilterOp::NoOp,
        }
    }
}

// ============================================================================
// EVALUATION
// ============================================================================

/// Pure match decision for one record against one predicate.
pub fn matches<R: Record>(record: &R, predicate: &Predicate) -> bool {
    let field = record.field(&predicate.field).unwrap_or(&Value::Null);
    let wanted = &predicate.value;

    match FilterOp::parse(&predicate.operator) {
        FilterOp::Eq => value_eq(field, wanted),
        FilterOp::Ne => !value_eq(field, wanted),
        FilterOp::Gt => num_cmp(field, wanted, |a, b| a > b),
        FilterOp::Lt => num_cmp(field, wanted, |a, b| a < b),
        FilterOp::Ge => num_cmp(field, wanted, |a, b| a >= b),
        FilterOp::Le => num_cmp(field, wanted, |a, b| a <= b),
        FilterOp::Includes => includes(field, wanted),
        // A field that cannot hold members does not include anything
        FilterOp::NotIncludes => match field {
            Value::Array(_) | Value::String(_) => !includes(field, wanted),
            _ => true,
        },
        FilterOp::Range => in_range(field, wanted),
        FilterOp::Exists => !field.is_null(),
        FilterOp::NotExists => field.is_null(),
        FilterOp::StartsWith => coerce_string(field).starts_with(&coerce_string(wanted)),
        FilterOp::EndsWith => coerce_string(field).ends_with(&coerce_string(wanted)),
        FilterOp::Contains => coerce_string(field)
            .to_lowercase()
            .contains(&coerce_string(wanted).to_lowercase()),
        FilterOp::NoOp => true,
    }
}

/// Keep the records matching every predicate. An empty predicate list keeps
/// everything.
pub fn apply<R: Record + Clone>(records: &[R], predicates: &[Predicate]) -> Vec<R> {
    records
        .iter()
        .filter(|record| predicates.iter().all(|p| matches(*record, p)))
        .cloned()
        .collect()
}

/// Value equality with numbers compared by numeric value, so 5 == 5.0.
fn value_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn num_cmp(field: &Value, wanted: &Value, cmp: fn(f64, f64) -> bool) -> bool {
    match (to_f64(field), to_f64(wanted)) {
        (Some(a), Some(b)) => cmp(a, b),
        // NaN comparisons are false
        _ => false,
    }
}

fn includes(field: &Value, wanted: &Value) -> bool {
    match field {
        Value::Array(items) => items.iter().any(|item| value_eq(item, wanted)),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .any(|tok| value_eq(&Value::String(tok.to_string()), wanted)),
        _ => false,
    }
}

fn in_range(field: &Value, wanted: &Value) -> bool {
    let bounds = match wanted {
        Value::Array(pair) if pair.len() == 2 => (to_f64(&pair[0]), to_f64(&pair[1])),
        _ => (None, None),
    };
    match (to_f64(field), bounds) {
        (Some(v), (Some(min), Some(max))) => v >= min && v <= max,
        _ => false,
    }
}

// ============================================================================
// TESTS
// ============================================================================
