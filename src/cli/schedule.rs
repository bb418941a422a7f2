//! Schedule commands (list, validate, reschedule, cascade, order)

use anyhow::{bail, Result};

use super::output::Output;
use crate::domain::{self, ScheduleGraph, Task, TaskId, TaskSet};
use crate::storage::TaskStore;

/// Show tasks with dates and predecessor counts
pub fn list(output: &Output, store: &TaskStore) -> Result<()> {
    let tasks = store.read_all()?;
    output.verbose(&format!("Loaded {} tasks", tasks.len()));

    if output.is_json() {
        output.data(&tasks);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks.");
        return Ok(());
    }

    println!("{:<16} {:<12} {:<12} {:>6} NAME", "ID", "START", "END", "DEPS");
    println!("{}", "-".repeat(64));
    for task in &tasks {
        println!(
            "{:<16} {:<12} {:<12} {:>6} {}",
            task.id,
            task.start_date,
            task.end_date,
            task.predecessors.len(),
            task.name
        );
    }

    Ok(())
}

/// Check stored schedules against predecessor constraints
pub fn validate(output: &Output, store: &TaskStore, id: Option<&str>) -> Result<()> {
    let tasks = store.read_all()?;
    let set = TaskSet::new(&tasks);

    let selected: Vec<&Task> = match id {
        Some(id) => vec![find_task(&tasks, id)?],
        None => tasks.iter().collect(),
    };

    output.verbose(&format!("Validating {} task(s)", selected.len()));

    let checks: Vec<_> = selected
        .iter()
        .map(|task| (*task, domain::validate_schedule(task, &set)))
        .collect();

    if output.is_json() {
        let items: Vec<_> = checks
            .iter()
            .map(|(task, check)| {
                serde_json::json!({
                    "id": task.id,
                    "name": task.name,
                    "valid": check.is_valid(),
                    "violations": check.messages(),
                    "unresolved": check.unresolved,
                })
            })
            .collect();
        output.data(&items);
        return Ok(());
    }

    let mut violation_count = 0;
    for (task, check) in &checks {
        for message in check.messages() {
            violation_count += 1;
            println!("{}: {}", task.id, message);
        }
        for missing in &check.unresolved {
            println!(
                "{}: warning: predecessor '{}' not found in task file (ignored)",
                task.id, missing
            );
        }
    }

    if violation_count == 0 {
        println!("All schedules valid ({} task(s) checked).", checks.len());
    } else {
        println!(
            "{} violation(s) across {} task(s).",
            violation_count,
            checks.len()
        );
    }

    Ok(())
}

/// Compute (and optionally persist) the corrected dates for one task
pub fn reschedule(output: &Output, store: &TaskStore, id: &str, write: bool) -> Result<()> {
    let tasks = store.read_all()?;
    let task = find_task(&tasks, id)?;
    let set = TaskSet::new(&tasks);

    let Some(moved) = domain::auto_schedule(task, &set) else {
        output.success(&format!("'{}' has no schedulable predecessors; nothing to do.", task.id));
        return Ok(());
    };

    if moved.start_date == task.start_date && moved.end_date == task.end_date {
        output.success(&format!("'{}' already satisfies its predecessors.", task.id));
        return Ok(());
    }

    if write {
        store.update_dates(&task.id, moved.start_date, moved.end_date)?;
        output.verbose("Corrected dates written to task file");
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": task.id,
            "start_date": moved.start_date,
            "end_date": moved.end_date,
            "written": write,
        }));
    } else {
        println!(
            "{}: {} -> {} ({}{})",
            task.id,
            moved.start_date,
            moved.end_date,
            if write { "written" } else { "dry run, " },
            if write { "" } else { "use --write to persist" }
        );
    }

    Ok(())
}

/// Propagate corrections across the whole file in dependency order
pub fn cascade(output: &Output, store: &TaskStore, write: bool) -> Result<()> {
    let mut tasks = store.read_all()?;
    let graph = ScheduleGraph::from_tasks(&tasks);
    let changes = graph.propagate(&tasks)?;

    output.verbose(&format!("{} task(s) need to move", changes.len()));

    if write && !changes.is_empty() {
        for change in &changes {
            if let Some(task) = tasks.iter_mut().find(|t| t.id == change.id) {
                task.start_date = change.start_date;
                task.end_date = change.end_date;
            }
        }
        store.write_all(&tasks)?;
        output.verbose("Corrected dates written to task file");
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "changes": changes,
            "written": write,
        }));
        return Ok(());
    }

    if changes.is_empty() {
        println!("All tasks already satisfy their predecessors.");
        return Ok(());
    }

    for change in &changes {
        println!("{}: {} -> {}", change.id, change.start_date, change.end_date);
    }
    if write {
        println!("{} task(s) rescheduled.", changes.len());
    } else {
        println!("{} task(s) would move (use --write to persist).", changes.len());
    }

    Ok(())
}

/// Print tasks in dependency order (predecessors first)
pub fn order(output: &Output, store: &TaskStore) -> Result<()> {
    let tasks = store.read_all()?;
    let graph = ScheduleGraph::from_tasks(&tasks);
    let order = graph.topological_order()?;

    if output.is_json() {
        output.data(&order);
        return Ok(());
    }

    for id in &order {
        println!("{}", id);
    }

    Ok(())
}

fn find_task<'a>(tasks: &'a [Task], id: &str) -> Result<&'a Task> {
    // FromStr trims, so copy-pasted ids with stray whitespace still match.
    let id: TaskId = id.parse()?;
    match tasks.iter().find(|t| t.id == id) {
        Some(task) => Ok(task),
        None => bail!("Task not found: {}", id),
    }
}
