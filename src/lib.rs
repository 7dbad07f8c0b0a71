// Data Alchemist - Core Library
// Rule-driven integrity checking and ad-hoc query filtering over the three
// related tables (clients, workers, tasks). Exposes all modules for use in
// the CLI and tests.

pub mod cross_checks;
pub mod field_checks;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use filter::{FilterEntities, FilterOp, FilterSpec, Predicate};
pub use loader::{load_clients, load_tasks, load_workers, rows_from_reader};
pub use model::{
    BusinessRule, Client, Correction, ErrorKind, Record, RuleKind, Severity, TableKind, Task,
    ValidationError, Worker,
};
pub use store::{DataStore, Snapshot};
pub use validation::{validate_all, validate_clients, validate_tasks, validate_workers};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
