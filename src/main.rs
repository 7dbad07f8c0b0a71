use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use data_alchemist::{loader, DataStore, FilterSpec, Severity};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("validate") if args.len() == 5 => run_validate(&args[2], &args[3], &args[4]),
        Some("filter") if args.len() == 6 => run_filter(&args[2], &args[3], &args[4], &args[5]),
        _ => {
            print_usage();
            std::process::exit(2);
        }
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  data-alchemist validate <clients.csv> <workers.csv> <tasks.csv>");
    eprintln!("  data-alchemist filter <filters.json> <clients.csv> <workers.csv> <tasks.csv>");
}

fn load_store(clients: &str, workers: &str, tasks: &str) -> Result<DataStore> {
    let clients = loader::load_clients(Path::new(clients))?;
    let workers = loader::load_workers(Path::new(workers))?;
    let tasks = loader::load_tasks(Path::new(tasks))?;

    println!(
        "✓ Loaded {} clients, {} workers, {} tasks",
        clients.len(),
        workers.len(),
        tasks.len()
    );

    let mut store = DataStore::new();
    store.load(clients, workers, tasks);
    Ok(store)
}

fn run_validate(clients: &str, workers: &str, tasks: &str) -> Result<()> {
    println!("📂 Loading data...");
    let store = load_store(clients, workers, tasks)?;

    let errors = store.validation_errors();
    if errors.is_empty() {
        println!("✅ No validation errors");
        return Ok(());
    }

    let warnings = errors
        .iter()
        .filter(|e| e.severity == Severity::Warning)
        .count();
    println!(
        "\n❌ {} validation issues ({} errors, {} warnings):",
        errors.len(),
        errors.len() - warnings,
        warnings
    );
    for error in errors {
        println!("  {}", error);
    }

    std::process::exit(1);
}

fn run_filter(spec_path: &str, clients: &str, workers: &str, tasks: &str) -> Result<()> {
    let content = fs::read_to_string(spec_path)
        .with_context(|| format!("Failed to read filter spec: {}", spec_path))?;
    let spec: FilterSpec =
        serde_json::from_str(&content).context("Failed to parse filter spec JSON")?;

    println!("📂 Loading data...");
    let mut store = load_store(clients, workers, tasks)?;

    store.apply_filters(&spec);
    println!(
        "✓ Filtered to {} clients, {} workers, {} tasks",
        store.clients().len(),
        store.workers().len(),
        store.tasks().len()
    );

    let output = serde_json::json!({
        "clients": store.clients(),
        "workers": store.workers(),
        "tasks": store.tasks(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
