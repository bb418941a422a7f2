//! Full-graph schedule propagation
//!
//! The core engine in [`super::engine`] is single-hop by contract:
//! rescheduling a task never touches its successors. This module is the
//! opt-in multi-task pass built on top of it. It materializes the
//! dependency graph with petgraph, detects cycles, and replays
//! [`auto_schedule`](super::engine::auto_schedule) in topological order
//! so corrections cascade down chains.
//!
//! Dangling predecessor ids are skipped when building the graph, the
//! same best-effort policy the engine applies per call.

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

use super::engine::{auto_schedule, TaskSet};
use super::id::TaskId;
use super::task::Task;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Dependency cycle detected involving task: {0}")]
    CycleDetected(TaskId),
}

/// A date correction for one task, produced by [`ScheduleGraph::propagate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleChange {
    pub id: TaskId,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
}

/// Directed dependency graph over one task snapshot
///
/// Edges run predecessor -> successor.
#[derive(Debug, Default)]
pub struct ScheduleGraph {
    graph: DiGraph<TaskId, ()>,
    node_map: HashMap<TaskId, NodeIndex>,
}

impl ScheduleGraph {
    /// Builds the graph from a task slice
    ///
    /// Dependencies whose predecessor is absent from the slice get no
    /// edge; they cannot influence propagation anyway.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut graph = Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        };

        for task in tasks {
            graph.add_node(task.id.clone());
        }

        for task in tasks {
            for dep in &task.predecessors {
                let (Some(&pred_idx), Some(&succ_idx)) = (
                    graph.node_map.get(&dep.predecessor),
                    graph.node_map.get(&task.id),
                ) else {
                    continue;
                };
                if graph.graph.find_edge(pred_idx, succ_idx).is_none() {
                    graph.graph.add_edge(pred_idx, succ_idx, ());
                }
            }
        }

        graph
    }

    fn add_node(&mut self, id: TaskId) {
        if !self.node_map.contains_key(&id) {
            let idx = self.graph.add_node(id.clone());
            self.node_map.insert(id, idx);
        }
    }

    /// Returns true if the graph contains the task
    pub fn contains(&self, id: &TaskId) -> bool {
        self.node_map.contains_key(id)
    }

    /// Returns the number of tasks in the graph
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }

    /// Returns the direct successors of a task (tasks that name it as a
    /// predecessor)
    pub fn successors(&self, id: &TaskId) -> Vec<TaskId> {
        let Some(&idx) = self.node_map.get(id) else {
            return vec![];
        };
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .filter_map(|n| self.graph.node_weight(n).cloned())
            .collect()
    }

    /// Returns every task id in dependency order (predecessors before
    /// successors), or the cycle participant that makes ordering
    /// impossible
    pub fn topological_order(&self) -> Result<Vec<TaskId>, GraphError> {
        match toposort(&self.graph, None) {
            Ok(order) => Ok(order
                .into_iter()
                .filter_map(|idx| self.graph.node_weight(idx).cloned())
                .collect()),
            Err(cycle) => {
                let id = self
                    .graph
                    .node_weight(cycle.node_id())
                    .cloned()
                    .unwrap_or_else(|| TaskId::new("?"));
                Err(GraphError::CycleDetected(id))
            }
        }
    }

    /// Cascades `auto_schedule` across the whole snapshot.
    ///
    /// Visits tasks in topological order, rescheduling each one against
    /// the dates already corrected upstream, and collects every task
    /// whose dates actually move. The input slice is left untouched;
    /// applying the changes is the caller's decision.
    pub fn propagate(&self, tasks: &[Task]) -> Result<Vec<ScheduleChange>, GraphError> {
        let order = self.topological_order()?;

        let mut working: Vec<Task> = tasks.to_vec();
        let index: HashMap<TaskId, usize> = working
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.clone(), i))
            .collect();

        let mut changes = Vec::new();

        for id in order {
            let Some(&i) = index.get(&id) else { continue };

            let proposed = {
                let set = TaskSet::new(&working);
                auto_schedule(&working[i], &set)
            };

            if let Some(moved) = proposed {
                let task = &mut working[i];
                if moved.start_date != task.start_date || moved.end_date != task.end_date {
                    task.start_date = moved.start_date;
                    task.end_date = moved.end_date;
                    changes.push(ScheduleChange {
                        id: task.id.clone(),
                        start_date: moved.start_date,
                        end_date: moved.end_date,
                    });
                }
            }
        }

        Ok(changes)
    }
}
