// 🔗 Cross-Reference Validators - checks spanning a whole table or two
// All reference checks use set semantics; ordering of skills and IDs never
// matters. Unknown references aggregate into one error per row so error
// volume stays proportional to rows, not to dangling tokens.

use std::collections::HashSet;

use serde_json::Value;

use crate::model::{ErrorKind, TableKind, ValidationError, Worker};
use crate::normalize;

/// Flags every row whose ID occurs more than once — including the first
/// occurrence. Blank IDs are left to the required-field check.
pub fn duplicate_ids(
    all_ids: &[String],
    current_id: &str,
    table: TableKind,
    row: usize,
    field_name: &str,
) -> Option<ValidationError> {
    if current_id.is_empty() {
        return None;
    }

    let count = all_ids.iter().filter(|id| *id == current_id).count();
    if count > 1 {
        Some(ValidationError::new(
            table,
            row,
            field_name,
            ErrorKind::Duplicate,
            format!("Duplicate {}: {}", field_name, current_id),
        ))
    } else {
        None
    }
}

/// Every RequestedTaskIDs entry must reference an existing task. All unknown
/// IDs for a row land in a single reference error.
pub fn requested_task_ids(
    value: &Value,
    valid_task_ids: &HashSet<String>,
    row: usize,
) -> Vec<ValidationError> {
    let ids = match normalize::id_list(value) {
        Ok(ids) => ids,
        Err(_) => {
            return vec![ValidationError::new(
                TableKind::Clients,
                row,
                "RequestedTaskIDs",
                ErrorKind::Invalid,
                "RequestedTaskIDs must be an array or comma-separated string",
            )]
        }
    };

    let unknown: Vec<&str> = ids
        .iter()
        .filter(|id| !valid_task_ids.contains(*id))
        .map(String::as_str)
        .collect();

    if unknown.is_empty() {
        Vec::new()
    } else {
        vec![ValidationError::new(
            TableKind::Clients,
            row,
            "RequestedTaskIDs",
            ErrorKind::Reference,
            format!("Unknown TaskIDs: {}", unknown.join(", ")),
        )]
    }
}

/// MaxLoadPerPhase must be a positive integer no greater than the number of
/// AvailableSlots entries. When the slots cell cannot be counted the capacity
/// check is skipped — soft, not silently wrong.
pub fn max_load_per_phase(
    max_load: &Value,
    available_slots: &Value,
    row: usize,
) -> Vec<ValidationError> {
    if normalize::is_blank(max_load) {
        return Vec::new();
    }

    let load = match normalize::to_int(max_load) {
        Some(n) if n >= 1 => n,
        _ => {
            return vec![ValidationError::new(
                TableKind::Workers,
                row,
                "MaxLoadPerPhase",
                ErrorKind::Invalid,
                "MaxLoadPerPhase must be a positive integer (≥1)",
            )]
        }
    };

    // Token count, not parsed count: an unparsable slot still occupies a slot
    let slot_count = match available_slots {
        Value::String(s) => {
            let cleaned = s.replace('[', "").replace(']', "");
            if cleaned.trim().is_empty() {
                return Vec::new();
            }
            cleaned.split(',').count()
        }
        Value::Array(items) => items.len(),
        _ => return Vec::new(),
    };

    if load as usize > slot_count {
        vec![ValidationError::new(
            TableKind::Workers,
            row,
            "MaxLoadPerPhase",
            ErrorKind::OutOfRange,
            format!(
                "MaxLoadPerPhase ({}) cannot exceed available slots ({})",
                load, slot_count
            ),
        )]
    } else {
        Vec::new()
    }
}

/// Every RequiredSkills tag must be covered by at least one worker's Skills.
pub fn required_skills(value: &Value, workers: &[Worker], row: usize) -> Vec<ValidationError> {
    let skills = match normalize::id_list(value) {
        Ok(skills) => skills,
        Err(_) => {
            return vec![ValidationError::new(
                TableKind::Tasks,
                row,
                "RequiredSkills",
                ErrorKind::Invalid,
                "RequiredSkills must be a comma-separated string or array",
            )]
        }
    };

    if skills.is_empty() {
        return Vec::new();
    }

    let pool = skill_pool(workers);
    let unmatched: Vec<&str> = skills
        .iter()
        .filter(|skill| !pool.contains(*skill))
        .map(String::as_str)
        .collect();

    if unmatched.is_empty() {
        Vec::new()
    } else {
        vec![ValidationError::new(
            TableKind::Tasks,
            row,
            "RequiredSkills",
            ErrorKind::Reference,
            format!(
                "RequiredSkills [{}] not covered by any worker",
                unmatched.join(", ")
            ),
        )]
    }
}

/// MaxConcurrent must be a positive integer no greater than the number of
/// workers qualified for all the task's RequiredSkills.
pub fn max_concurrent(
    value: &Value,
    required: &Value,
    workers: &[Worker],
    row: usize,
) -> Option<ValidationError> {
    if normalize::is_blank(value) {
        return None;
    }

    let concurrent = match normalize::to_int(value) {
        Some(n) if n >= 1 => n,
        _ => {
            return Some(ValidationError::new(
                TableKind::Tasks,
                row,
                "MaxConcurrent",
                ErrorKind::Invalid,
                "MaxConcurrent must be a positive integer (≥1)",
            ))
        }
    };

    let qualified = qualified_workers(required, workers).len();
    if concurrent as usize > qualified {
        Some(ValidationError::new(
            TableKind::Tasks,
            row,
            "MaxConcurrent",
            ErrorKind::OutOfRange,
            format!(
                "MaxConcurrent ({}) exceeds available qualified workers ({})",
                concurrent, qualified
            ),
        ))
    } else {
        None
    }
}

/// Workers whose skill set is a superset of the task's RequiredSkills. An
/// empty (or unparsable) requirement qualifies every worker.
pub fn qualified_workers<'a>(required: &Value, workers: &'a [Worker]) -> Vec<&'a Worker> {
    let skills = normalize::id_list(required).unwrap_or_default();
    if skills.is_empty() {
        return workers.iter().collect();
    }

    workers
        .iter()
        .filter(|worker| {
            let owned: HashSet<String> = normalize::tag_list(&worker.skills)
                .unwrap_or_default()
                .into_iter()
                .collect();
            skills.iter().all(|skill| owned.contains(skill))
        })
        .collect()
}

/// Union of every worker's skill tags. Unparsable Skills cells contribute
/// nothing.
fn skill_pool(workers: &[Worker]) -> HashSet<String> {
    let mut pool = HashSet::new();
    for worker in workers {
        pool.extend(normalize::tag_list(&worker.skills).unwrap_or_default());
    }
    pool
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn worker(skills: Value) -> Worker {
        serde_json::from_value(json!({
            "WorkerID": "W1",
            "WorkerName": "w",
            "Skills": skills,
            "AvailableSlots": [1, 2],
            "MaxLoadPerPhase": 1
        }))
        .unwrap()
    }

    #[test]
    fn test_duplicate_ids_flags_every_occurrence() {
        let ids: Vec<String> = vec!["C1".into(), "C2".into(), "C1".into()];

        assert!(duplicate_ids(&ids, "C1", TableKind::Clients, 0, "ClientID").is_some());
        assert!(duplicate_ids(&ids, "C2", TableKind::Clients, 1, "ClientID").is_none());
        let err = duplicate_ids(&ids, "C1", TableKind::Clients, 2, "ClientID").unwrap();
        assert_eq!(err.kind, ErrorKind::Duplicate);
        assert_eq!(err.message, "Duplicate ClientID: C1");
    }

    #[test]
    fn test_duplicate_ids_skips_blank() {
        let ids: Vec<String> = vec!["".into(), "".into()];
        assert!(duplicate_ids(&ids, "", TableKind::Workers, 0, "WorkerID").is_none());
    }

    #[test]
    fn test_requested_task_ids_aggregates_unknowns() {
        let valid: HashSet<String> = ["T1".to_string(), "T2".to_string()].into();

        let errors = requested_task_ids(&json!("T1, T9, T8"), &valid, 0);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Reference);
        assert_eq!(errors[0].message, "Unknown TaskIDs: T9, T8");

        assert!(requested_task_ids(&json!(["T1", "T2"]), &valid, 0).is_empty());
        assert!(requested_task_ids(&Value::Null, &valid, 0).is_empty());
    }

    #[test]
    fn test_requested_task_ids_bad_shape() {
        let valid = HashSet::new();
        let errors = requested_task_ids(&json!(42), &valid, 0);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Invalid);
    }

    #[test]
    fn test_max_load_within_slot_count() {
        assert!(max_load_per_phase(&json!(2), &json!("[1,2,3]"), 0).is_empty());
        assert!(max_load_per_phase(&json!(3), &json!([4, 5, 6]), 0).is_empty());
    }

    #[test]
    fn test_max_load_exceeds_slot_count() {
        let errors = max_load_per_phase(&json!(4), &json!("[1,2,3]"), 0);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::OutOfRange);
        assert_eq!(
            errors[0].message,
            "MaxLoadPerPhase (4) cannot exceed available slots (3)"
        );
    }

    #[test]
    fn test_max_load_soft_skip_on_unparsable_slots() {
        // Capacity check skipped entirely when slots cannot be counted
        assert!(max_load_per_phase(&json!(4), &json!(7), 0).is_empty());
        assert!(max_load_per_phase(&json!(4), &Value::Null, 0).is_empty());
    }

    #[test]
    fn test_max_load_rejects_non_positive() {
        let errors = max_load_per_phase(&json!(0), &json!([1]), 0);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Invalid);
    }

    #[test]
    fn test_required_skills_coverage_union() {
        let workers = vec![worker(json!("rust, sql")), worker(json!(["go"]))];

        assert!(required_skills(&json!("rust, go"), &workers, 0).is_empty());

        let errors = required_skills(&json!("rust, ml, k8s"), &workers, 0);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Reference);
        assert_eq!(
            errors[0].message,
            "RequiredSkills [ml, k8s] not covered by any worker"
        );
    }

    #[test]
    fn test_qualified_workers_superset_semantics() {
        let workers = vec![
            worker(json!("rust, sql, go")),
            worker(json!("rust")),
            worker(json!("sql")),
        ];

        assert_eq!(qualified_workers(&json!("rust, sql"), &workers).len(), 1);
        assert_eq!(qualified_workers(&json!("rust"), &workers).len(), 2);
        // Ordering is irrelevant, these are sets
        assert_eq!(qualified_workers(&json!("sql, rust"), &workers).len(), 1);
        // No requirement qualifies everyone
        assert_eq!(qualified_workers(&Value::Null, &workers).len(), 3);
    }

    #[test]
    fn test_max_concurrent_against_qualified_pool() {
        let workers = vec![worker(json!("rust")), worker(json!("rust, sql"))];

        assert!(max_concurrent(&json!(2), &json!("rust"), &workers, 0).is_none());

        let err = max_concurrent(&json!(3), &json!("rust"), &workers, 0).unwrap();
        assert_eq!(err.kind, ErrorKind::OutOfRange);
        assert_eq!(
            err.message,
            "MaxConcurrent (3) exceeds available qualified workers (2)"
        );

        let err = max_concurrent(&json!("x"), &Value::Null, &workers, 0).unwrap();
        assert_eq!(err.kind, ErrorKind::Invalid);
    }
}
