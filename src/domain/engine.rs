//! Scheduling engine
//!
//! Pure constraint evaluation over an immutable snapshot of the task
//! set. Three operations: translating one dependency into a concrete
//! constraint date, folding all of a task's predecessors into its
//! earliest legal start (optionally as a full rescheduled date pair),
//! and checking a stored schedule against those constraints.
//!
//! The engine owns no state and performs no I/O; every call reads the
//! snapshot it is handed and returns new values. Dependencies whose
//! predecessor id is missing from the snapshot are skipped silently —
//! snapshots come from editing layers that may be mid-load, and a
//! partial answer beats a failed one there. Callers that care can read
//! the skipped ids off [`ScheduleCheck::unresolved`].
//!
//! Nothing here walks dependency chains: each call resolves exactly one
//! hop, so cycles neither break nor get detected. Multi-task passes
//! live in [`super::graph`].

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use super::id::TaskId;
use super::task::{add_days_saturating, DependencyKind, Task};

/// Borrowed id-to-task lookup over one snapshot of the task list
///
/// Built once per engine call from whatever slice the caller holds.
/// Later duplicates of an id win, matching last-write semantics of the
/// snapshot formats this is loaded from.
#[derive(Debug)]
pub struct TaskSet<'a> {
    by_id: HashMap<&'a TaskId, &'a Task>,
}

impl<'a> TaskSet<'a> {
    /// Indexes a task slice by id
    pub fn new(tasks: &'a [Task]) -> Self {
        Self {
            by_id: tasks.iter().map(|t| (&t.id, t)).collect(),
        }
    }

    /// Looks up a task by id
    pub fn get(&self, id: &TaskId) -> Option<&'a Task> {
        self.by_id.get(id).copied()
    }

    /// Returns the number of tasks in the snapshot
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if the snapshot holds no tasks
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Computes the date that one dependency imposes on its successor.
///
/// The base date comes from the predecessor per the dependency kind
/// (finish for FS/FF, start for SS/SF); `lag_days` then shifts it,
/// negative values producing a lead. Lag is unbounded; shifts past the
/// calendar's representable range saturate at `NaiveDate::MIN`/`MAX`
/// rather than failing.
pub fn constraint_date(predecessor: &Task, kind: DependencyKind, lag_days: i64) -> NaiveDate {
    add_days_saturating(kind.base_date(predecessor), lag_days)
}

/// Computes the earliest date the task may legally start.
///
/// Folds every resolvable predecessor constraint with max: all
/// predecessors must hold simultaneously, so the latest constraint date
/// is the binding one. Returns `None` for a task with no predecessors,
/// or whose predecessors all fail to resolve against the snapshot —
/// both mean "unconstrained".
pub fn earliest_start(task: &Task, tasks: &TaskSet<'_>) -> Option<NaiveDate> {
    task.predecessors
        .iter()
        .filter_map(|dep| {
            let predecessor = tasks.get(&dep.predecessor)?;
            Some(constraint_date(predecessor, dep.kind, dep.lag_days))
        })
        .max()
}

/// A corrected start/end pair produced by [`auto_schedule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reschedule {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Computes a schedule that satisfies all of the task's predecessors.
///
/// Places the task at its earliest legal start and preserves its
/// current duration exactly; only the position in time moves. Returns
/// `None` when the task is unconstrained (no change recommended).
///
/// Single-hop by contract: tasks that depend on this one are not
/// examined or moved. Rescheduling a chain means calling this per
/// affected task, dependency order first (see [`super::graph`]).
pub fn auto_schedule(task: &Task, tasks: &TaskSet<'_>) -> Option<Reschedule> {
    let start_date = earliest_start(task, tasks)?;
    Some(Reschedule {
        start_date,
        end_date: add_days_saturating(start_date, task.duration_days()),
    })
}

/// One detected conflict between a stored schedule and a predecessor
/// constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// The predecessor whose constraint is violated
    pub predecessor: TaskId,
    /// Predecessor display name, for messages
    pub predecessor_name: String,
    /// The dependency kind that produced the constraint
    pub kind: DependencyKind,
    /// The date the constraint requires
    pub constraint_date: NaiveDate,
    /// The successor date that breaks it (start for FS/SS, end for FF/SF)
    pub scheduled_date: NaiveDate,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (verb, edge) = match self.kind {
            DependencyKind::Fs => ("start", "finishes"),
            DependencyKind::Ss => ("start", "starts"),
            DependencyKind::Ff => ("finish", "finishes"),
            DependencyKind::Sf => ("finish", "starts"),
        };
        write!(
            f,
            "Task cannot {} before '{}' {} (requires {}, scheduled {})",
            verb, self.predecessor_name, edge, self.constraint_date, self.scheduled_date
        )
    }
}

/// Result of checking a task's stored schedule against its predecessors
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScheduleCheck {
    /// Constraints the stored schedule breaks
    pub violations: Vec<Violation>,
    /// Predecessor ids that did not resolve against the snapshot.
    /// Diagnostic only: unresolved dependencies never count as
    /// violations.
    pub unresolved: Vec<TaskId>,
}

impl ScheduleCheck {
    /// Returns true if no constraint is violated
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Renders the violations as plain warning strings
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.to_string()).collect()
    }
}

/// Checks whether the task's current dates satisfy every predecessor
/// constraint, without changing anything.
///
/// The comparison is inclusive: a date exactly equal to its constraint
/// is valid, only strictly earlier dates violate. FS and SS bind the
/// task's start date, FF and SF its end date. A task with no
/// predecessors is always valid.
pub fn validate_schedule(task: &Task, tasks: &TaskSet<'_>) -> ScheduleCheck {
    let mut check = ScheduleCheck::default();

    for dep in &task.predecessors {
        let Some(predecessor) = tasks.get(&dep.predecessor) else {
            check.unresolved.push(dep.predecessor.clone());
            continue;
        };

        let required = constraint_date(predecessor, dep.kind, dep.lag_days);
        let scheduled = if dep.kind.binds_start() {
            task.start_date
        } else {
            task.end_date
        };

        if scheduled < required {
            check.violations.push(Violation {
                predecessor: predecessor.id.clone(),
                predecessor_name: predecessor.name.clone(),
                kind: dep.kind,
                constraint_date: required,
                scheduled_date: scheduled,
            });
        }
    }

    check
}
