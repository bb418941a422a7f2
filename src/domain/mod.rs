//! Domain models and scheduling logic
//!
//! Pure in-memory logic with no I/O concerns: task/dependency models,
//! the single-task scheduling engine, and the opt-in full-graph
//! propagation pass.

mod engine;
mod graph;
mod id;
mod task;

pub use engine::{
    auto_schedule, constraint_date, earliest_start, validate_schedule, Reschedule, ScheduleCheck,
    TaskSet, Violation,
};
pub use graph::{GraphError, ScheduleChange, ScheduleGraph};
pub use id::TaskId;
pub use task::{Dependency, DependencyKind, Predecessors, Task};
