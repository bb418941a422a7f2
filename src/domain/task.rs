//! Task domain model
//!
//! Tasks are schedulable units of work with calendar start/end dates and
//! typed predecessor links. The engine treats every task as the *successor*
//! of its own predecessor list and never mutates it.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::id::TaskId;

/// Scheduling relationship between a predecessor and a successor
///
/// The four classical dependency kinds. Each one binds a date taken from
/// the predecessor (start or finish) to a date of the successor (start
/// or finish).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DependencyKind {
    /// Finish-to-Start: successor starts after the predecessor finishes
    #[default]
    Fs,
    /// Start-to-Start: successor starts after the predecessor starts
    Ss,
    /// Finish-to-Finish: successor finishes after the predecessor finishes
    Ff,
    /// Start-to-Finish: successor finishes after the predecessor starts
    Sf,
}

impl DependencyKind {
    /// Parses a kind from its wire form, case-insensitively.
    ///
    /// Unrecognized values fall back to finish-to-start. Task snapshots
    /// come from editing layers that may carry stale or foreign kind
    /// strings; degrading to FS keeps the engine total over such input.
    pub fn parse_lossy(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "FS" => DependencyKind::Fs,
            "SS" => DependencyKind::Ss,
            "FF" => DependencyKind::Ff,
            "SF" => DependencyKind::Sf,
            _ => DependencyKind::Fs,
        }
    }

    /// Returns the canonical wire label
    pub fn label(&self) -> &'static str {
        match self {
            DependencyKind::Fs => "FS",
            DependencyKind::Ss => "SS",
            DependencyKind::Ff => "FF",
            DependencyKind::Sf => "SF",
        }
    }

    /// Returns true when the constraint binds the successor's start date
    /// (FS, SS); false when it binds the finish date (FF, SF)
    pub fn binds_start(&self) -> bool {
        matches!(self, DependencyKind::Fs | DependencyKind::Ss)
    }

    /// Returns the predecessor date this kind anchors on: finish for
    /// FS/FF, start for SS/SF
    pub fn base_date(&self, predecessor: &Task) -> NaiveDate {
        match self {
            DependencyKind::Fs | DependencyKind::Ff => predecessor.end_date,
            DependencyKind::Ss | DependencyKind::Sf => predecessor.start_date,
        }
    }
}

/// Adds a signed day offset to a date, saturating at the calendar's
/// representable bounds.
///
/// Lag values are unbounded, so shifted dates can leave the range
/// `NaiveDate` can hold; pinning them to `NaiveDate::MIN`/`MAX` keeps
/// every date computation total.
pub(crate) fn add_days_saturating(date: NaiveDate, days: i64) -> NaiveDate {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(if days >= 0 {
            NaiveDate::MAX
        } else {
            NaiveDate::MIN
        })
}

impl From<String> for DependencyKind {
    fn from(s: String) -> Self {
        Self::parse_lossy(&s)
    }
}

impl From<DependencyKind> for String {
    fn from(kind: DependencyKind) -> Self {
        kind.label().to_string()
    }
}

impl std::fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A typed scheduling dependency on another task
///
/// The owning task is always the successor. `lag_days` is a signed
/// calendar-day offset applied after the base constraint date: positive
/// delays the successor, negative lets it lead. No bounds are enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    /// The task that must be resolved first
    pub predecessor: TaskId,

    /// The dependency kind (FS when absent)
    #[serde(rename = "type", default)]
    pub kind: DependencyKind,

    /// Signed lag in calendar days (0 when absent)
    #[serde(rename = "lag", default)]
    pub lag_days: i64,
}

impl Dependency {
    /// Creates a dependency of the given kind with zero lag
    pub fn new(predecessor: impl Into<TaskId>, kind: DependencyKind) -> Self {
        Self {
            predecessor: predecessor.into(),
            kind,
            lag_days: 0,
        }
    }

    /// Creates a finish-to-start dependency with zero lag
    pub fn finish_to_start(predecessor: impl Into<TaskId>) -> Self {
        Self::new(predecessor, DependencyKind::Fs)
    }

    /// Sets the lag in calendar days
    pub fn with_lag(mut self, lag_days: i64) -> Self {
        self.lag_days = lag_days;
        self
    }
}

/// Ordered collection of predecessor dependencies
///
/// Order is the editing order and is preserved; diagnostics iterate it
/// as given. Duplicate (predecessor, kind) pairs are rejected on add.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Predecessors(Vec<Dependency>);

impl Predecessors {
    /// Creates an empty predecessor list
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds a dependency, returning false if the same predecessor and
    /// kind are already present
    pub fn add(&mut self, dep: Dependency) -> bool {
        if self
            .0
            .iter()
            .any(|d| d.predecessor == dep.predecessor && d.kind == dep.kind)
        {
            false
        } else {
            self.0.push(dep);
            true
        }
    }

    /// Removes every dependency on the given predecessor
    pub fn remove(&mut self, predecessor: &TaskId) -> bool {
        let before = self.0.len();
        self.0.retain(|d| &d.predecessor != predecessor);
        self.0.len() != before
    }

    /// Returns true if there are no dependencies
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of dependencies
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the dependencies in editing order
    pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
        self.0.iter()
    }

    /// Checks whether the given task is referenced as a predecessor
    pub fn contains(&self, predecessor: &TaskId) -> bool {
        self.0.iter().any(|d| &d.predecessor == predecessor)
    }
}

impl<'a> IntoIterator for &'a Predecessors {
    type Item = &'a Dependency;
    type IntoIter = std::slice::Iter<'a, Dependency>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A schedulable task
///
/// `start_date <= end_date` is expected but not enforced here; the
/// editing layer that owns the task list is responsible for handing the
/// engine well-formed dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Display name, used in violation messages
    pub name: String,

    /// First calendar day of the task
    pub start_date: NaiveDate,

    /// Last calendar day of the task
    pub end_date: NaiveDate,

    /// Predecessor dependencies (this task is the successor)
    #[serde(default, skip_serializing_if = "Predecessors::is_empty")]
    pub predecessors: Predecessors,
}

impl Task {
    /// Creates a task with no predecessors
    pub fn new(
        id: impl Into<TaskId>,
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_date,
            end_date,
            predecessors: Predecessors::new(),
        }
    }

    /// Adds a predecessor dependency (builder form)
    pub fn with_predecessor(mut self, dep: Dependency) -> Self {
        self.predecessors.add(dep);
        self
    }

    /// Duration in whole calendar days (0 for a single-day task)
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Moves the task so it starts on the given date, keeping its
    /// duration unchanged (saturating at the calendar bounds)
    pub fn shift_to(&mut self, start_date: NaiveDate) {
        let duration = self.duration_days();
        self.start_date = start_date;
        self.end_date = add_days_saturating(start_date, duration);
    }
}
