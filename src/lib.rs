//! Taskplan - dependency-aware schedule checking for project task lists
//!
//! Taskplan models tasks with calendar dates and typed predecessor links
//! (FS/SS/FF/SF with signed lag) and answers three questions about them:
//! what date a dependency imposes, where a task may legally sit, and
//! whether its stored dates already break a constraint. A separate
//! graph pass cascades corrections across whole task files.

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{Dependency, DependencyKind, Task, TaskId, TaskSet};
