// ✅ Field Validators - single-cell shape/range/format checks
// Each validator takes one raw cell and returns structured errors, never
// panics, never mutates. A blank cell is only ever reported by
// required_field; the shape checks stay quiet on absent input.

use std::collections::HashSet;

use serde_json::Value;

use crate::model::{ErrorKind, TableKind, ValidationError};
use crate::normalize::{self, ListError, PhaseError};

/// Missing when the cell is null, blank, an empty array, or an empty object.
pub fn required_field(
    table: TableKind,
    value: &Value,
    name: &str,
    row: usize,
) -> Option<ValidationError> {
    let missing = match value {
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        other => normalize::is_blank(other),
    };

    if missing {
        Some(ValidationError::new(
            table,
            row,
            name,
            ErrorKind::Missing,
            format!("Missing {}", name),
        ))
    } else {
        None
    }
}

/// PriorityLevel must be a number in [1, 5].
pub fn priority_level(value: &Value, row: usize) -> Option<ValidationError> {
    if normalize::is_blank(value) {
        return None;
    }

    let priority = match value {
        Value::Number(n) => n.as_f64()?,
        _ => {
            return Some(ValidationError::new(
                TableKind::Clients,
                row,
                "PriorityLevel",
                ErrorKind::Invalid,
                "PriorityLevel must be a number",
            ))
        }
    };

    if !(1.0..=5.0).contains(&priority) {
        return Some(ValidationError::new(
            TableKind::Clients,
            row,
            "PriorityLevel",
            ErrorKind::OutOfRange,
            "PriorityLevel must be between 1 and 5",
        ));
    }

    None
}

/// Duration parses as a float and must be ≥ 1.
pub fn duration(value: &Value, row: usize) -> Option<ValidationError> {
    if normalize::is_blank(value) {
        return None;
    }

    match normalize::to_f64(value) {
        Some(d) if d >= 1.0 => None,
        _ => Some(ValidationError::new(
            TableKind::Tasks,
            row,
            "Duration",
            ErrorKind::Invalid,
            "Duration must be a number ≥ 1",
        )),
    }
}

/// AttributesJSON must hold a parsable serialized object. Cells that already
/// arrived structured (or empty) are fine.
pub fn attributes_json(value: &Value, row: usize) -> Option<ValidationError> {
    match value {
        Value::String(s) => {
            if s.trim().is_empty() {
                return None;
            }
            match serde_json::from_str::<Value>(s) {
                Ok(_) => None,
                Err(_) => Some(ValidationError::new(
                    TableKind::Clients,
                    row,
                    "AttributesJSON",
                    ErrorKind::Format,
                    "Invalid JSON in AttributesJSON",
                )),
            }
        }
        _ => None,
    }
}

/// Skills is a comma-delimited string or an array of strings.
pub fn worker_skills(value: &Value, row: usize) -> Option<ValidationError> {
    match normalize::tag_list(value) {
        Ok(_) => None,
        Err(ListError::NonString) => Some(ValidationError::new(
            TableKind::Workers,
            row,
            "Skills",
            ErrorKind::Invalid,
            "All skills must be strings",
        )),
        Err(ListError::NotAList) => Some(ValidationError::new(
            TableKind::Workers,
            row,
            "Skills",
            ErrorKind::Invalid,
            "Skills must be a comma-separated string or array",
        )),
    }
}

/// AvailableSlots is a list of distinct positive phase numbers. Bad elements
/// and repeats are reported separately; both can fire on the same cell.
pub fn available_slots(value: &Value, row: usize) -> Vec<ValidationError> {
    let items = match normalize::int_list(value) {
        Ok(items) => items,
        Err(_) => {
            return vec![ValidationError::new(
                TableKind::Workers,
                row,
                "AvailableSlots",
                ErrorKind::Invalid,
                "AvailableSlots must be an array or comma-separated string",
            )]
        }
    };

    int_item_errors(
        TableKind::Workers,
        row,
        "AvailableSlots",
        &items,
        "All AvailableSlots must be positive integers",
        "AvailableSlots cannot contain duplicate phase numbers",
    )
}

/// PreferredPhases accepts a dash-range "a-b" or a list, then the same
/// positive/distinct checks as AvailableSlots. An unparsable range yields one
/// invalid error and an empty normalized sequence.
pub fn preferred_phases(value: &Value, row: usize) -> Vec<ValidationError> {
    let items = match normalize::phase_list(value) {
        Ok(items) => items,
        Err(PhaseError::BadRange) => {
            return vec![ValidationError::new(
                TableKind::Tasks,
                row,
                "PreferredPhases",
                ErrorKind::Invalid,
                "Invalid range format in PreferredPhases",
            )]
        }
        Err(PhaseError::NotAList) => {
            return vec![ValidationError::new(
                TableKind::Tasks,
                row,
                "PreferredPhases",
                ErrorKind::Invalid,
                "PreferredPhases must be a range (1-3), list (1,3,5), or array",
            )]
        }
    };

    int_item_errors(
        TableKind::Tasks,
        row,
        "PreferredPhases",
        &items,
        "All PreferredPhases must be positive integers",
        "PreferredPhases cannot contain duplicate phase numbers",
    )
}

fn int_item_errors(
    table: TableKind,
    row: usize,
    column: &str,
    items: &[Option<i64>],
    invalid_msg: &str,
    duplicate_msg: &str,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let has_invalid = items.iter().any(|item| match item {
        Some(n) => *n < 1,
        None => true,
    });
    if has_invalid {
        errors.push(ValidationError::new(
            table,
            row,
            column,
            ErrorKind::Invalid,
            invalid_msg,
        ));
    }

    let mut seen = HashSet::new();
    let has_duplicate = items
        .iter()
        .flatten()
        .any(|n| !seen.insert(*n));
    if has_duplicate {
        errors.push(ValidationError::new(
            table,
            row,
            column,
            ErrorKind::Duplicate,
            duplicate_msg,
        ));
    }

    errors
}

// ============================================================================
// TESTS
// ============================================================================
