// 🧪 Validation Orchestrator - one pass, one ordered error list
// Tables run Clients → Workers → Tasks; within a table rows run in order and
// fields in declaration order: required fields, duplicate ID, then the
// type-specific and cross-reference checks. Each run produces the complete
// list; callers replace their error collection, never merge into it.

use std::collections::HashSet;

use serde_json::Value;

use crate::cross_checks;
use crate::field_checks;
use crate::model::{Client, Record, TableKind, Task, ValidationError, Worker};
use crate::normalize::coerce_string;

const CLIENT_REQUIRED: [&str; 3] = ["ClientID", "ClientName", "PriorityLevel"];
const WORKER_REQUIRED: [&str; 4] = ["WorkerID", "WorkerName", "AvailableSlots", "MaxLoadPerPhase"];
const TASK_REQUIRED: [&str; 4] = ["TaskID", "TaskName", "Duration", "MaxConcurrent"];

/// Run every check across all three tables and assemble the full error list.
pub fn validate_all(
    clients: &[Client],
    workers: &[Worker],
    tasks: &[Task],
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    validate_clients(clients, tasks, &mut errors);
    validate_workers(workers, &mut errors);
    validate_tasks(tasks, workers, &mut errors);
    errors
}

pub fn validate_clients(clients: &[Client], tasks: &[Task], out: &mut Vec<ValidationError>) {
    let task_ids: HashSet<String> = tasks
        .iter()
        .map(|task| cell_id(&task.task_id))
        .filter(|id| !id.is_empty())
        .collect();
    let client_ids: Vec<String> = clients.iter().map(|c| cell_id(&c.client_id)).collect();

    for (row, client) in clients.iter().enumerate() {
        for field in CLIENT_REQUIRED {
            if let Some(v) = client.field(field) {
                out.extend(field_checks::required_field(TableKind::Clients, v, field, row));
            }
        }

        out.extend(cross_checks::duplicate_ids(
            &client_ids,
            &client_ids[row],
            TableKind::Clients,
            row,
            "ClientID",
        ));

        out.extend(field_checks::priority_level(&client.priority_level, row));
        out.extend(cross_checks::requested_task_ids(
            &client.requested_task_ids,
            &task_ids,
            row,
        ));
        out.extend(field_checks::attributes_json(&client.attributes_json, row));
    }
}

pub fn validate_workers(workers: &[Worker], out: &mut Vec<ValidationError>) {
    let worker_ids: Vec<String> = workers.iter().map(|w| cell_id(&w.worker_id)).collect();

    for (row, worker) in workers.iter().enumerate() {
        for field in WORKER_REQUIRED {
            if let Some(v) = worker.field(field) {
                out.extend(field_checks::required_field(TableKind::Workers, v, field, row));
            }
        }

        out.extend(cross_checks::duplicate_ids(
            &worker_ids,
            &worker_ids[row],
            TableKind::Workers,
            row,
            "WorkerID",
        ));

        out.extend(field_checks::worker_skills(&worker.skills, row));
        out.extend(field_checks::available_slots(&worker.available_slots, row));
        out.extend(cross_checks::max_load_per_phase(
            &worker.max_load_per_phase,
            &worker.available_slots,
            row,
        ));
    }
}

pub fn validate_tasks(tasks: &[Task], workers: &[Worker], out: &mut Vec<ValidationError>) {
    let task_ids: Vec<String> = tasks.iter().map(|t| cell_id(&t.task_id)).collect();

    for (row, task) in tasks.iter().enumerate() {
        for field in TASK_REQUIRED {
            if let Some(v) = task.field(field) {
                out.extend(field_checks::required_field(TableKind::Tasks, v, field, row));
            }
        }

        out.extend(cross_checks::duplicate_ids(
            &task_ids,
            &task_ids[row],
            TableKind::Tasks,
            row,
            "TaskID",
        ));

        out.extend(field_checks::duration(&task.duration, row));
        out.extend(cross_checks::required_skills(
            &task.required_skills,
            workers,
            row,
        ));
        out.extend(field_checks::preferred_phases(&task.preferred_phases, row));
        out.extend(cross_checks::max_concurrent(
            &task.max_concurrent,
            &task.required_skills,
            workers,
            row,
        ));
    }
}

fn cell_id(value: &Value) -> String {
    coerce_string(value).trim().to_string()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ErrorKind;
    use serde_json::json;

    fn clients(v: serde_json::Value) -> Vec<Client> {
        serde_json::from_value(v).unwrap()
    }

    fn workers(v: serde_json::Value) -> Vec<Worker> {
        serde_json::from_value(v).unwrap()
    }

    fn tasks(v: serde_json::Value) -> Vec<Task> {
        serde_json::from_value(v).unwrap()
    }

    fn valid_fixture() -> (Vec<Client>, Vec<Worker>, Vec<Task>) {
        let c = clients(json!([{
            "ClientID": "C1",
            "ClientName": "Acme",
            "PriorityLevel": 3,
            "RequestedTaskIDs": "T1",
            "AttributesJSON": "{\"vip\": true}"
        }]));
        let w = workers(json!([{
            "WorkerID": "W1",
            "WorkerName": "Ada",
            "Skills": "rust, sql",
            "AvailableSlots": "[1,2,3]",
            "MaxLoadPerPhase": 2
        }]));
        let t = tasks(json!([{
            "TaskID": "T1",
            "TaskName": "Build",
            "Duration": 2,
            "RequiredSkills": "rust",
            "PreferredPhases": "1-2",
            "MaxConcurrent": 1
        }]));
        (c, w, t)
    }

    #[test]
    fn test_clean_data_produces_no_errors() {
        let (c, w, t) = valid_fixture();
        assert!(validate_all(&c, &w, &t).is_empty());
    }

    #[test]
    fn test_priority_out_of_range_single_error() {
        let c = clients(json!([{
            "ClientID": "C1",
            "ClientName": "Acme",
            "PriorityLevel": 6
        }]));

        let errors = validate_all(&c, &[], &[]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::OutOfRange);
        assert_eq!(errors[0].column, "PriorityLevel");
        assert_eq!(errors[0].row, 0);
    }

    #[test]
    fn test_duplicate_detection_is_symmetric() {
        // All N rows sharing an ID get flagged, never N-1
        let t = tasks(json!([
            {"TaskID": "T1", "TaskName": "a", "Duration": 1, "MaxConcurrent": 1},
            {"TaskID": "T1", "TaskName": "b", "Duration": 1, "MaxConcurrent": 1},
            {"TaskID": "T1", "TaskName": "c", "Duration": 1, "MaxConcurrent": 1}
        ]));
        // One qualified worker so MaxConcurrent(1) passes
        let w = workers(json!([{
            "WorkerID": "W1", "WorkerName": "Ada", "Skills": "rust",
            "AvailableSlots": [1], "MaxLoadPerPhase": 1
        }]));

        let errors = validate_all(&[], &w, &t);
        let dupes: Vec<_> = errors
            .iter()
            .filter(|e| e.kind == ErrorKind::Duplicate && e.column == "TaskID")
            .collect();
        assert_eq!(dupes.len(), 3);
        let rows: Vec<usize> = dupes.iter().map(|e| e.row).collect();
        assert_eq!(rows, vec![0, 1, 2]);
    }

    #[test]
    fn test_table_order_clients_workers_tasks() {
        let c = clients(json!([{"ClientID": "C1", "ClientName": "x", "PriorityLevel": 9}]));
        let w = workers(json!([{
            "WorkerID": "W1", "WorkerName": "y",
            "AvailableSlots": "[1,1]", "MaxLoadPerPhase": 1
        }]));
        let t = tasks(json!([{
            "TaskID": "T1", "TaskName": "z", "Duration": 0, "MaxConcurrent": 1
        }]));

        let errors = validate_all(&c, &w, &t);
        let tables: Vec<TableKind> = errors.iter().map(|e| e.table).collect();
        let first_worker = tables.iter().position(|t| *t == TableKind::Workers).unwrap();
        let first_task = tables.iter().position(|t| *t == TableKind::Tasks).unwrap();
        assert!(tables[..first_worker].iter().all(|t| *t == TableKind::Clients));
        assert!(first_worker < first_task);
    }

    #[test]
    fn test_requested_task_ids_round_trip() {
        let t = tasks(json!([
            {"TaskID": "T1", "TaskName": "a", "Duration": 1, "MaxConcurrent": 1},
            {"TaskID": "T2", "TaskName": "b", "Duration": 1, "MaxConcurrent": 1}
        ]));
        let w = workers(json!([{
            "WorkerID": "W1", "WorkerName": "Ada", "Skills": "rust",
            "AvailableSlots": [1], "MaxLoadPerPhase": 1
        }]));
        let c = clients(json!([
            {"ClientID": "C1", "ClientName": "x", "PriorityLevel": 1, "RequestedTaskIDs": "T1, T9"},
            {"ClientID": "C2", "ClientName": "y", "PriorityLevel": 2, "RequestedTaskIDs": "T2"}
        ]));

        let errors = validate_all(&c, &w, &t);
        assert!(errors
            .iter()
            .any(|e| e.kind == ErrorKind::Reference && e.row == 0));

        // Keep only clients whose references all resolve; re-validating is clean
        let kept: Vec<Client> = c
            .into_iter()
            .filter(|client| {
                !errors.iter().any(|e| {
                    e.table == TableKind::Clients
                        && e.column == "RequestedTaskIDs"
                        && client.client_id == json!(format!("C{}", e.row + 1))
                })
            })
            .collect();
        let errors = validate_all(&kept, &w, &t);
        assert!(!errors.iter().any(|e| e.column == "RequestedTaskIDs"));
    }

    #[test]
    fn test_missing_required_fields_reported_per_field() {
        let w = workers(json!([{"Skills": "rust"}]));

        let mut out = Vec::new();
        validate_workers(&w, &mut out);

        let missing: Vec<&str> = out
            .iter()
            .filter(|e| e.kind == ErrorKind::Missing)
            .map(|e| e.column.as_str())
            .collect();
        assert_eq!(
            missing,
            vec!["WorkerID", "WorkerName", "AvailableSlots", "MaxLoadPerPhase"]
        );
    }

    #[test]
    fn test_each_run_is_complete_and_replayable() {
        let (c, w, mut t) = valid_fixture();
        t[0].duration = json!(0);

        let first = validate_all(&c, &w, &t);
        let second = validate_all(&c, &w, &t);
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }
}
