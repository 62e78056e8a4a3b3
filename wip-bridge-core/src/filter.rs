//! Eligibility: which todos are new and public in this run.
//!
//! Novelty is inferred from a sliding lookback window instead of a stored
//! "seen" set. A todo completed while the bridge was not running for longer
//! than the window is never published.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::contract::{Project, Todo};

/// The closed interval `[start, end]` a completion time must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl LookbackWindow {
    pub fn ending_at(now: DateTime<Utc>, lookback: Duration) -> Self {
        Self {
            start: now - lookback,
            end: now,
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }
}

/// A todo selected for publication, borrowed together with its project.
#[derive(Debug, Clone, Copy)]
pub struct EligibleTodo<'a> {
    pub project: &'a Project,
    pub todo: &'a Todo,
}

pub fn is_private_project(project: &Project, marker: &str) -> bool {
    project.pitch.contains(marker)
}

pub fn is_private_todo(todo: &Todo, marker: &str) -> bool {
    todo.body.contains(marker)
}

/// Select the todos to publish, preserving project order and in-project todo order.
pub fn eligible_todos<'a>(
    projects: &'a [Project],
    window: &LookbackWindow,
    marker: &str,
) -> Vec<EligibleTodo<'a>> {
    let mut selected = Vec::new();
    for project in projects {
        if is_private_project(project, marker) {
            debug!(project_id = %project.id, "[FILTER] Skipping private project");
            continue;
        }
        for todo in &project.todos {
            if !window.contains(todo.completed_at) {
                continue;
            }
            if is_private_todo(todo, marker) {
                debug!(todo_id = %todo.id, "[FILTER] Skipping private todo");
                continue;
            }
            selected.push(EligibleTodo { project, todo });
        }
    }
    selected
}
