//! Dependency resolution over a full task list.
//!
//! Each round walks the list in order and pushes every task later until its
//! predecessor constraints hold, reading predecessors as already updated in
//! the same round. Propagation is push-only: a predecessor moving earlier
//! never pulls its successors back.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::model::task::{shift_days, Constraint, DependencyKind, Task};

/// Upper bound on propagation rounds. Cyclic graphs stop here.
pub const MAX_ROUNDS: usize = 10;

/// A dependency edge whose constraint does not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub successor: Uuid,
    pub predecessor: Uuid,
    pub kind: DependencyKind,
    pub lag: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The last round changed nothing.
    Settled,
    /// The round cap was reached while dates were still moving.
    RoundLimit { unsatisfied: Vec<Violation> },
}

/// Resolved schedule plus how the resolution went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub tasks: Vec<Task>,
    pub rounds: usize,
    pub outcome: Outcome,
}

impl Resolution {
    pub fn is_settled(&self) -> bool {
        matches!(self.outcome, Outcome::Settled)
    }
}

/// Adjust task dates until every dependency with a present predecessor holds,
/// or until [`MAX_ROUNDS`] rounds have run.
pub fn resolve(tasks: &[Task]) -> Vec<Task> {
    resolve_with_report(tasks).tasks
}

/// Same as [`resolve`], but also reports rounds used and any edges left unsatisfied.
pub fn resolve_with_report(tasks: &[Task]) -> Resolution {
    let mut schedule = tasks.to_vec();
    let index = index_by_id(&schedule);

    let mut rounds = 0;
    let mut settled = false;
    while rounds < MAX_ROUNDS {
        rounds += 1;
        let mut changed = false;
        for i in 0..schedule.len() {
            if let Some((start, end)) = constrained_dates(&schedule, &index, i) {
                schedule[i].start = start;
                schedule[i].end = end;
                changed = true;
            }
        }
        if !changed {
            settled = true;
            break;
        }
    }

    let outcome = if settled {
        debug!(tasks = schedule.len(), rounds, "schedule settled");
        Outcome::Settled
    } else {
        let unsatisfied = unsatisfied(&schedule);
        warn!(
            tasks = schedule.len(),
            unsatisfied = unsatisfied.len(),
            "schedule still moving after {} rounds; dependency graph may contain a cycle",
            MAX_ROUNDS
        );
        Outcome::RoundLimit { unsatisfied }
    };

    Resolution {
        tasks: schedule,
        rounds,
        outcome,
    }
}

/// Every dependency edge whose constraint fails against the given dates.
/// Edges to tasks missing from the list are ignored.
pub fn unsatisfied(tasks: &[Task]) -> Vec<Violation> {
    let index = index_by_id(tasks);
    let mut violations = Vec::new();
    for task in tasks {
        for dep in &task.dependencies {
            let Some(&j) = index.get(&dep.task_id) else {
                continue;
            };
            if !dep.kind.constraint(&tasks[j], dep.lag).is_met_by(task.start, task.end) {
                violations.push(Violation {
                    successor: task.id,
                    predecessor: dep.task_id,
                    kind: dep.kind,
                    lag: dep.lag,
                });
            }
        }
    }
    violations
}

fn index_by_id(tasks: &[Task]) -> HashMap<Uuid, usize> {
    let mut index = HashMap::with_capacity(tasks.len());
    for (i, task) in tasks.iter().enumerate() {
        index.entry(task.id).or_insert(i);
    }
    index
}

/// New dates for task `i`, or `None` when it already satisfies its constraints.
fn constrained_dates(
    schedule: &[Task],
    index: &HashMap<Uuid, usize>,
    i: usize,
) -> Option<(NaiveDate, NaiveDate)> {
    let task = &schedule[i];
    let (start, end) = (task.start, task.end);
    let mut new_start = start;
    let mut new_end = end;

    for dep in &task.dependencies {
        let Some(&j) = index.get(&dep.task_id) else {
            continue;
        };
        match dep.kind.constraint(&schedule[j], dep.lag) {
            Constraint::StartNoEarlierThan(bound) if bound > new_start => new_start = bound,
            Constraint::EndNoEarlierThan(bound) if bound > new_end => new_end = bound,
            _ => {}
        }
    }

    let (new_start, mut new_end) = match (new_start != start, new_end != end) {
        (true, false) => (new_start, shift_days(end, (new_start - start).num_days())),
        (false, true) if new_end < start => {
            let duration = (end - start).num_days().max(0);
            (shift_days(new_end, -duration), new_end)
        }
        (true, true) if new_end < new_start => (new_start, shift_days(new_start, 1)),
        _ => (new_start, new_end),
    };
    if new_end < new_start {
        new_end = new_start;
    }

    if (new_start, new_end) == (start, end) {
        None
    } else {
        Some((new_start, new_end))
    }
}
