// 📋 Record Model - Clients, Workers, Tasks as loosely-typed rows
// Core fields are fixed, extra spreadsheet columns can grow without breaking changes

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// TABLES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Clients,
    Workers,
    Tasks,
}

impl TableKind {
    pub fn name(&self) -> &'static str {
        match self {
            TableKind::Clients => "clients",
            TableKind::Workers => "workers",
            TableKind::Tasks => "tasks",
        }
    }
}

// ============================================================================
// VALIDATION ERROR
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Duplicate,
    Missing,
    Invalid,
    Reference,
    Format,
    OutOfRange,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Duplicate => "duplicate",
            ErrorKind::Missing => "missing",
            ErrorKind::Invalid => "invalid",
            ErrorKind::Reference => "reference",
            ErrorKind::Format => "format",
            ErrorKind::OutOfRange => "out-of-range",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Error
    }
}

/// One structured finding from a validation pass.
///
/// `row` is 0-based within its table. Errors carry their `table` so that
/// corrections can be matched by `(table, row, column)` — a column name like
/// "Skills" on row 3 of workers must never clear a clients error that happens
/// to share the same coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub table: TableKind,
    pub row: usize,
    pub column: String,
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default)]
    pub severity: Severity,
}

impl ValidationError {
    pub fn new(
        table: TableKind,
        row: usize,
        column: impl Into<String>,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        ValidationError {
            table,
            row,
            column: column.into(),
            kind,
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] row {} {} ({}): {}",
            self.table.name(),
            self.row,
            self.column,
            self.kind.as_str(),
            self.message
        )
    }
}

// ============================================================================
// RECORDS
// ============================================================================

/// By-name field access over a record.
///
/// Raw spreadsheet rows are duck-typed: a cell may hold a number, a string,
/// an array, or nothing at all. Known columns are kept as `Value` so that
/// validators can report shape problems instead of failing to deserialize;
/// unknown columns land in the flattened `extra` map.
pub trait Record {
    fn field(&self, name: &str) -> Option<&Value>;
    fn set_field(&mut self, name: &str, value: Value);
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(rename = "ClientID", default)]
    pub client_id: Value,

    #[serde(rename = "ClientName", default)]
    pub client_name: Value,

    #[serde(rename = "PriorityLevel", default)]
    pub priority_level: Value,

    #[serde(rename = "RequestedTaskIDs", default)]
    pub requested_task_ids: Value,

    #[serde(rename = "AttributesJSON", default)]
    pub attributes_json: Value,

    /// Extra spreadsheet columns (GroupTag, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Client {
    fn field(&self, name: &str) -> Option<&Value> {
        match name {
            "ClientID" => Some(&self.client_id),
            "ClientName" => Some(&self.client_name),
            "PriorityLevel" => Some(&self.priority_level),
            "RequestedTaskIDs" => Some(&self.requested_task_ids),
            "AttributesJSON" => Some(&self.attributes_json),
            _ => self.extra.get(name),
        }
    }

    fn set_field(&mut self, name: &str, value: Value) {
        match name {
            "ClientID" => self.client_id = value,
            "ClientName" => self.client_name = value,
            "PriorityLevel" => self.priority_level = value,
            "RequestedTaskIDs" => self.requested_task_ids = value,
            "AttributesJSON" => self.attributes_json = value,
            _ => {
                self.extra.insert(name.to_string(), value);
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    #[serde(rename = "WorkerID", default)]
    pub worker_id: Value,

    #[serde(rename = "WorkerName", default)]
    pub worker_name: Value,

    /// Comma-delimited string or array of tags.
    #[serde(rename = "Skills", default)]
    pub skills: Value,

    /// Distinct positive phase numbers, "[1,2,3]", "1,2,3", or an array.
    #[serde(rename = "AvailableSlots", default)]
    pub available_slots: Value,

    #[serde(rename = "MaxLoadPerPhase", default)]
    pub max_load_per_phase: Value,

    /// Extra spreadsheet columns (WorkerGroup, QualificationLevel, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Worker {
    fn field(&self, name: &str) -> Option<&Value> {
        match name {
            "WorkerID" => Some(&self.worker_id),
            "WorkerName" => Some(&self.worker_name),
            "Skills" => Some(&self.skills),
            "AvailableSlots" => Some(&self.available_slots),
            "MaxLoadPerPhase" => Some(&self.max_load_per_phase),
            _ => self.extra.get(name),
        }
    }

    fn set_field(&mut self, name: &str, value: Value) {
        match name {
            "WorkerID" => self.worker_id = value,
            "WorkerName" => self.worker_name = value,
            "Skills" => self.skills = value,
            "AvailableSlots" => self.available_slots = value,
            "MaxLoadPerPhase" => self.max_load_per_phase = value,
            _ => {
                self.extra.insert(name.to_string(), value);
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "TaskID", default)]
    pub task_id: Value,

    #[serde(rename = "TaskName", default)]
    pub task_name: Value,

    #[serde(rename = "Duration", default)]
    pub duration: Value,

    #[serde(rename = "RequiredSkills", default)]
    pub required_skills: Value,

    /// Range "a-b" or a bracketed/bare list of positive phase numbers.
    #[serde(rename = "PreferredPhases", default)]
    pub preferred_phases: Value,

    #[serde(rename = "MaxConcurrent", default)]
    pub max_concurrent: Value,

    /// Extra spreadsheet columns (Category, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Task {
    fn field(&self, name: &str) -> Option<&Value> {
        match name {
            "TaskID" => Some(&self.task_id),
            "TaskName" => Some(&self.task_name),
            "Duration" => Some(&self.duration),
            "RequiredSkills" => Some(&self.required_skills),
            "PreferredPhases" => Some(&self.preferred_phases),
            "MaxConcurrent" => Some(&self.max_concurrent),
            _ => self.extra.get(name),
        }
    }

    fn set_field(&mut self, name: &str, value: Value) {
        match name {
            "TaskID" => self.task_id = value,
            "TaskName" => self.task_name = value,
            "Duration" => self.duration = value,
            "RequiredSkills" => self.required_skills = value,
            "PreferredPhases" => self.preferred_phases = value,
            "MaxConcurrent" => self.max_concurrent = value,
            _ => {
                self.extra.insert(name.to_string(), value);
            }
        }
    }
}

// ============================================================================
// CORRECTIONS
// ============================================================================

/// One proposed cell fix from the external suggestion service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub table: TableKind,
    pub row: usize,
    pub column: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// ============================================================================
// BUSINESS RULES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    CoRun,
    PhaseRestriction,
    LoadLimit,
    Dependency,
}

/// User-authored rule, owned by the store. The validators and the filter
/// evaluator never read these; they only travel with the store state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRule {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: RuleKind,

    pub name: String,

    /// Free-form key/value configuration bag.
    #[serde(default)]
    pub config: Map<String, Value>,

    pub enabled: bool,
}

impl BusinessRule {
    pub fn new(kind: RuleKind, name: impl Into<String>) -> Self {
        BusinessRule {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            name: name.into(),
            config: Map::new(),
            enabled: true,
        }
    }

    /// Builder: set a config entry
    pub fn with_config(mut self, key: impl Into<String>, value: Value) -> Self {
        self.config.insert(key.into(), value);
        self
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_kind_wire_spelling() {
        let err = ValidationError::new(
            TableKind::Clients,
            0,
            "PriorityLevel",
            ErrorKind::OutOfRange,
            "PriorityLevel must be between 1 and 5",
        );

        let encoded = serde_json::to_value(&err).unwrap();
        assert_eq!(encoded["type"], json!("out-of-range"));
        assert_eq!(encoded["table"], json!("clients"));
        assert_eq!(encoded["severity"], json!("error"));
    }

    #[test]
    fn test_severity_defaults_to_error() {
        let err: ValidationError = serde_json::from_value(json!({
            "table": "workers",
            "row": 2,
            "column": "Skills",
            "type": "invalid",
            "message": "All skills must be strings"
        }))
        .unwrap();

        assert_eq!(err.severity, Severity::Error);
        assert_eq!(err.kind, ErrorKind::Invalid);
    }

    #[test]
    fn test_client_extra_columns_flatten() {
        let client: Client = serde_json::from_value(json!({
            "ClientID": "C1",
            "ClientName": "Acme",
            "PriorityLevel": 3,
            "GroupTag": "enterprise"
        }))
        .unwrap();

        assert_eq!(client.client_id, json!("C1"));
        assert_eq!(client.extra.get("GroupTag"), Some(&json!("enterprise")));
        // Absent known columns come back as null, not a deserialize failure
        assert_eq!(client.requested_task_ids, Value::Null);
    }

    #[test]
    fn test_record_field_access() {
        let mut worker: Worker = serde_json::from_value(json!({
            "WorkerID": "W1",
            "Skills": "rust, sql",
            "WorkerGroup": "backend"
        }))
        .unwrap();

        assert_eq!(worker.field("Skills"), Some(&json!("rust, sql")));
        assert_eq!(worker.field("WorkerGroup"), Some(&json!("backend")));
        assert_eq!(worker.field("NoSuchColumn"), None);

        worker.set_field("MaxLoadPerPhase", json!(2));
        worker.set_field("QualificationLevel", json!("senior"));
        assert_eq!(worker.max_load_per_phase, json!(2));
        assert_eq!(
            worker.field("QualificationLevel"),
            Some(&json!("senior"))
        );
    }

    #[test]
    fn test_business_rule_ids_are_unique() {
        let a = BusinessRule::new(RuleKind::CoRun, "run together");
        let b = BusinessRule::new(RuleKind::CoRun, "run together");

        assert_ne!(a.id, b.id);
        assert!(a.enabled);
    }

    #[test]
    fn test_business_rule_wire_spelling() {
        let rule = BusinessRule::new(RuleKind::PhaseRestriction, "phase window")
            .with_config("phases", json!([1, 2]));

        let encoded = serde_json::to_value(&rule).unwrap();
        assert_eq!(encoded["type"], json!("phase-restriction"));
        assert_eq!(encoded["config"]["phases"], json!([1, 2]));
    }
}
