// 🗄️ Data Store - mutable holder for the three collections
// The core stays stateless; this is the one port that owns state between
// invocations: the current collections, the load-time snapshot used by
// reset, the replace-only validation error list, and user-authored business
// rules. Callers hand the pure validators and the filter evaluator stable
// snapshots taken from here.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::filter::{self, FilterSpec};
use crate::model::{
    BusinessRule, Client, Correction, Record, TableKind, Task, ValidationError, Worker,
};
use crate::validation;

/// The unfiltered collections as they looked when data was last loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub clients: Vec<Client>,
    pub workers: Vec<Worker>,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone)]
pub struct DataStore {
    clients: Vec<Client>,
    workers: Vec<Worker>,
    tasks: Vec<Task>,
    validation_errors: Vec<ValidationError>,
    business_rules: Vec<BusinessRule>,
    auto_validate: bool,
    original: Snapshot,
}

impl DataStore {
    pub fn new() -> Self {
        DataStore {
            clients: Vec::new(),
            workers: Vec::new(),
            tasks: Vec::new(),
            validation_errors: Vec::new(),
            business_rules: Vec::new(),
            auto_validate: true,
            original: Snapshot::default(),
        }
    }

    // ========================================================================
    // LOADING & ACCESS
    // ========================================================================

    /// Install freshly-ingested collections, capture the reset snapshot, and
    /// (when auto-validation is on) produce the initial error list.
    pub fn load(&mut self, clients: Vec<Client>, workers: Vec<Worker>, tasks: Vec<Task>) {
        self.clients = clients;
        self.workers = workers;
        self.tasks = tasks;
        self.snapshot_original();
        if self.auto_validate {
            self.run_validations();
        }
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn set_clients(&mut self, clients: Vec<Client>) {
        self.clients = clients;
        if self.auto_validate {
            self.run_validations();
        }
    }

    pub fn set_workers(&mut self, workers: Vec<Worker>) {
        self.workers = workers;
        if self.auto_validate {
            self.run_validations();
        }
    }

    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        if self.auto_validate {
            self.run_validations();
        }
    }

    pub fn set_auto_validate(&mut self, enabled: bool) {
        self.auto_validate = enabled;
    }

    /// Recapture the reset snapshot from the current collections.
    pub fn snapshot_original(&mut self) {
        self.original = Snapshot {
            clients: self.clients.clone(),
            workers: self.workers.clone(),
            tasks: self.tasks.clone(),
        };
    }

    pub fn original(&self) -> &Snapshot {
        &self.original
    }

    /// Edit one cell in place. Fails on an out-of-range row, leaving the
    /// store untouched.
    pub fn update_cell(
        &mut self,
        table: TableKind,
        row: usize,
        column: &str,
        value: Value,
    ) -> Result<()> {
        match table {
            TableKind::Clients => set_cell(&mut self.clients, table, row, column, value),
            TableKind::Workers => set_cell(&mut self.workers, table, row, column, value),
            TableKind::Tasks => set_cell(&mut self.tasks, table, row, column, value),
        }
    }

    // ========================================================================
    // VALIDATION
    // ========================================================================

    /// Run all validators and replace the whole error collection — never a
    /// merge, so no stale errors survive a run.
    pub fn run_validations(&mut self) -> &[ValidationError] {
        self.validation_errors = validation::validate_all(&self.clients, &self.workers, &self.tasks);
        &self.validation_errors
    }

    pub fn validation_errors(&self) -> &[ValidationError] {
        &self.validation_errors
    }

    /// Apply externally-proposed cell corrections transactionally: either
    /// every proposal lands or none does. Conflicting proposals for the same
    /// cell resolve last-write-wins. Errors matching an applied proposal by
    /// `(table, row, column)` are dropped from the collection; the rest stay.
    pub fn apply_corrections(&mut self, corrections: &[Correction]) -> Result<usize> {
        for c in corrections {
            let rows = match c.table {
                TableKind::Clients => self.clients.len(),
                TableKind::Workers => self.workers.len(),
                TableKind::Tasks => self.tasks.len(),
            };
            if c.row >= rows {
                bail!(
                    "correction out of range: {} row {} (table has {} rows)",
                    c.table.name(),
                    c.row,
                    rows
                );
            }
        }

        for c in corrections {
            match c.table {
                TableKind::Clients => self.clients[c.row].set_field(&c.column, c.value.clone()),
                TableKind::Workers => self.workers[c.row].set_field(&c.column, c.value.clone()),
                TableKind::Tasks => self.tasks[c.row].set_field(&c.column, c.value.clone()),
            }
        }

        self.validation_errors.retain(|e| {
            !corrections
                .iter()
                .any(|c| c.table == e.table && c.row == e.row && c.column == e.column)
        });

        Ok(corrections.len())
    }

    // ========================================================================
    // FILTERING
    // ========================================================================

    /// Keep, per table named in the spec, only the records matching all of
    /// that table's predicates. Tables the spec does not mention are left
    /// alone.
    pub fn apply_filters(&mut self, spec: &FilterSpec) {
        if let Some(preds) = &spec.entities.client {
            self.clients = filter::apply(&self.clients, preds);
        }
        if let Some(preds) = &spec.entities.worker {
            self.workers = filter::apply(&self.workers, preds);
        }
        if let Some(preds) = &spec.entities.task {
            self.tasks = filter::apply(&self.tasks, preds);
        }
    }

    /// Unconditionally restore the snapshot captured at load time, however
    /// many filter/reset cycles happened since.
    pub fn reset_filters(&mut self) {
        self.clients = self.original.clients.clone();
        self.workers = self.original.workers.clone();
        self.tasks = self.original.tasks.clone();
    }

    // ========================================================================
    // BUSINESS RULES
    // ========================================================================

    pub fn business_rules(&self) -> &[BusinessRule] {
        &self.business_rules
    }

    pub fn add_rule(&mut self, rule: BusinessRule) {
        self.business_rules.push(rule);
    }

    /// Apply an edit to the rule with the given id. Returns false when no
    /// such rule exists.
    pub fn update_rule(&mut self, id: &str, edit: impl FnOnce(&mut BusinessRule)) -> bool {
        match self.business_rules.iter_mut().find(|r| r.id == id) {
            Some(rule) => {
                edit(rule);
                true
            }
            None => false,
        }
    }

    /// Flip the enabled flag, returning the new state.
    pub fn toggle_rule(&mut self, id: &str) -> Option<bool> {
        let rule = self.business_rules.iter_mut().find(|r| r.id == id)?;
        rule.enabled = !rule.enabled;
        Some(rule.enabled)
    }

    pub fn remove_rule(&mut self, id: &str) -> bool {
        let before = self.business_rules.len();
        self.business_rules.retain(|r| r.id != id);
        self.business_rules.len() != before
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

fn set_cell<R: Record>(
    rows: &mut [R],
    table: TableKind,
    row: usize,
    column: &str,
    value: Value,
) -> Result<()> {
    match rows.get_mut(row) {
        Some(record) => {
            record.set_field(column, value);
            Ok(())
        }
        None => bail!(
            "row {} out of range for {} ({} rows)",
            row,
            table.name(),
            rows.len()
        ),
    }
}

// ============================================================================
// TESTS
// ============================================================================
