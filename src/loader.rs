// 📂 CSV Loader - spreadsheet rows → loosely-typed records
// The loader only gets cells as far as "scalar or null"; list shapes like
// "[1,2,3]" and "rust, sql" stay strings for the normalization layer to
// interpret. Validation decides what is wrong, not ingestion.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::model::{Client, Task, Worker};

pub fn load_clients(path: &Path) -> Result<Vec<Client>> {
    records_from_reader(open(path)?)
        .with_context(|| format!("Failed to load clients from {:?}", path))
}

pub fn load_workers(path: &Path) -> Result<Vec<Worker>> {
    records_from_reader(open(path)?)
        .with_context(|| format!("Failed to load workers from {:?}", path))
}

pub fn load_tasks(path: &Path) -> Result<Vec<Task>> {
    records_from_reader(open(path)?)
        .with_context(|| format!("Failed to load tasks from {:?}", path))
}

/// CSV → one key/value map per row, headers as keys, cells scalar-inferred.
pub fn rows_from_reader<R: Read>(reader: R) -> Result<Vec<Map<String, Value>>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers().context("Failed to read CSV headers")?.clone();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.context("Failed to read CSV row")?;
        let mut row = Map::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            row.insert(header.trim().to_string(), infer_cell(cell));
        }
        rows.push(row);
    }

    Ok(rows)
}

/// CSV → typed records via the rows' JSON-object form.
pub fn records_from_reader<T, R>(reader: R) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    rows_from_reader(reader)?
        .into_iter()
        .map(|row| {
            serde_json::from_value(Value::Object(row)).context("Failed to deserialize row")
        })
        .collect()
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("Failed to open CSV file {:?}", path))
}

/// Blank cells become null, numeric cells become numbers, the rest stay
/// strings.
fn infer_cell(raw: &str) -> Value {
    let cell = raw.trim();
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = cell.parse::<f64>() {
        if f.is_finite() {
            return Value::from(f);
        }
    }
    Value::String(cell.to_string())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_inference() {
        assert_eq!(infer_cell(""), Value::Null);
        assert_eq!(infer_cell("  "), Value::Null);
        assert_eq!(infer_cell("3"), json!(3));
        assert_eq!(infer_cell("2.5"), json!(2.5));
        assert_eq!(infer_cell("C1"), json!("C1"));
        // List shapes stay strings for the normalization layer
        assert_eq!(infer_cell("[1,2,3]"), json!("[1,2,3]"));
        assert_eq!(infer_cell("rust, sql"), json!("rust, sql"));
    }

    #[test]
    fn test_rows_from_reader_keys_by_header() {
        let csv = "ClientID,ClientName,PriorityLevel\nC1,Acme,3\nC2,Birch,\n";
        let rows = rows_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["ClientID"], json!("C1"));
        assert_eq!(rows[0]["PriorityLevel"], json!(3));
        assert_eq!(rows[1]["PriorityLevel"], Value::Null);
    }

    #[test]
    fn test_records_from_reader_collects_extras() {
        let csv = "WorkerID,WorkerName,Skills,AvailableSlots,MaxLoadPerPhase,WorkerGroup\n\
                   W1,Ada,\"rust, sql\",\"[1,2]\",2,backend\n";
        let workers: Vec<Worker> = records_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(workers.len(), 1);
        assert_eq!(workers[0].worker_id, json!("W1"));
        assert_eq!(workers[0].skills, json!("rust, sql"));
        assert_eq!(workers[0].available_slots, json!("[1,2]"));
        assert_eq!(workers[0].extra.get("WorkerGroup"), Some(&json!("backend")));
    }

    #[test]
    fn test_loaded_rows_validate_end_to_end() {
        let tasks_csv = "TaskID,TaskName,Duration,RequiredSkills,PreferredPhases,MaxConcurrent\n\
                         T1,Build,2,rust,1-2,1\n\
                         T1,Ship,0,,\"[1,1]\",1\n";
        let tasks: Vec<Task> = records_from_reader(tasks_csv.as_bytes()).unwrap();
        let workers_csv = "WorkerID,WorkerName,Skills,AvailableSlots,MaxLoadPerPhase\n\
                           W1,Ada,rust,\"[1,2]\",1\n";
        let workers: Vec<Worker> = records_from_reader(workers_csv.as_bytes()).unwrap();

        let errors = crate::validation::validate_all(&[], &workers, &tasks);
        // Duplicate TaskID on both rows, bad Duration and duplicate phases on row 1
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.column == "TaskID")
                .count(),
            2
        );
        assert!(errors.iter().any(|e| e.column == "Duration" && e.row == 1));
        assert!(errors
            .iter()
            .any(|e| e.column == "PreferredPhases" && e.row == 1));
    }
}
