// 🧹 Cell Normalization - one shared routine for duck-typed spreadsheet cells
// Raw cells arrive as arrays, delimited strings, numbers, or nothing at all.
// Every validator and the filter evaluator normalize through this module so
// the same cell always parses the same way.

use serde_json::Value;

/// Why a raw cell could not be normalized into a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListError {
    /// Neither an array nor a string.
    NotAList,
    /// An array element was not a string.
    NonString,
}

/// Why a raw cell could not be normalized into a phase list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseError {
    NotAList,
    /// Dash-range syntax present but unparsable, or start > end.
    BadRange,
}

/// Null, or a string that is empty after trimming.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Coerce a scalar cell to a display string. Null becomes "".
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

/// Numeric coercion for comparisons: numbers pass through, strings parse as
/// floats. Anything else has no numeric value.
pub fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Integer coercion: integral numbers and integer-shaped strings. Fractional
/// values do not silently truncate.
pub fn to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0)
                    .map(|f| f as i64)
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// String-or-array → trimmed tag list. Strict on array elements: every one
/// must already be a string.
///
/// A blank cell is a valid empty list; required-ness is someone else's check.
pub fn tag_list(value: &Value) -> Result<Vec<String>, ListError> {
    if is_blank(value) {
        return Ok(Vec::new());
    }
    match value {
        Value::String(s) => Ok(split_csv(s)),
        Value::Array(items) => {
            let mut tags = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => {
                        let tag = s.trim();
                        if !tag.is_empty() {
                            tags.push(tag.to_string());
                        }
                    }
                    _ => return Err(ListError::NonString),
                }
            }
            Ok(tags)
        }
        _ => Err(ListError::NotAList),
    }
}

/// String-or-array → trimmed ID list. Lenient on array elements: anything
/// scalar is coerced to its string form.
pub fn id_list(value: &Value) -> Result<Vec<String>, ListError> {
    if is_blank(value) {
        return Ok(Vec::new());
    }
    match value {
        Value::String(s) => Ok(split_csv(s)),
        Value::Array(items) => Ok(items
            .iter()
            .map(coerce_string)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()),
        _ => Err(ListError::NotAList),
    }
}

/// Bracketed or bare comma-delimited integers → element-wise parse results.
/// `None` marks a token that failed integer parsing; the caller decides how
/// loudly to complain.
pub fn int_list(value: &Value) -> Result<Vec<Option<i64>>, ListError> {
    if is_blank(value) {
        return Ok(Vec::new());
    }
    match value {
        Value::String(s) => {
            let cleaned = s.replace('[', "").replace(']', "");
            if cleaned.trim().is_empty() {
                return Ok(Vec::new());
            }
            Ok(cleaned
                .split(',')
                .map(|tok| tok.trim().parse::<i64>().ok())
                .collect())
        }
        Value::Array(items) => Ok(items.iter().map(to_int).collect()),
        _ => Err(ListError::NotAList),
    }
}

/// PreferredPhases cell → element-wise parse results. Accepts a dash-range
/// "a-b" (expanded inclusively) or the same bracketed/bare list syntax as
/// [`int_list`].
pub fn phase_list(value: &Value) -> Result<Vec<Option<i64>>, PhaseError> {
    if is_blank(value) {
        return Ok(Vec::new());
    }
    if let Value::String(s) = value {
        if s.contains('-') {
            let mut parts = s.split('-');
            let start = parts.next().and_then(|p| p.trim().parse::<i64>().ok());
            let end = parts.next().and_then(|p| p.trim().parse::<i64>().ok());
            return match (start, end) {
                (Some(a), Some(b)) if a <= b => Ok((a..=b).map(Some).collect()),
                _ => Err(PhaseError::BadRange),
            };
        }
    }
    int_list(value).map_err(|_| PhaseError::NotAList)
}

fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|tok| !tok.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
