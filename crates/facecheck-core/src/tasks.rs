//! Batched task lookup for customers matched during a check-in batch.

use crate::backend::{Backend, BackendError};
use crate::types::Task;

/// Result of looking up the tasks of matched customers.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskLookup {
    /// Nobody was matched, so no request was made.
    Skipped,
    /// The backend answered with an empty list.
    NoTasks,
    Found(Vec<Task>),
    Failed(BackendError),
}

impl TaskLookup {
    pub fn tasks(&self) -> &[Task] {
        match self {
            TaskLookup::Found(tasks) => tasks,
            _ => &[],
        }
    }
}

/// Drop repeated names, keeping the first occurrence of each.
pub fn dedup_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let name = name.into();
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

/// Look up the tasks of all `names` with one backend request.
///
/// Lookup failures are logged and returned as [`TaskLookup::Failed`]; the
/// check-ins that produced the names are already persisted at this point.
pub async fn lookup_tasks<B: Backend + ?Sized>(backend: &B, names: &[String]) -> TaskLookup {
    if names.is_empty() {
        tracing::debug!("no matched customers; skipping task lookup");
        return TaskLookup::Skipped;
    }

    match backend.tasks_for_customers(names).await {
        Ok(tasks) if tasks.is_empty() => {
            tracing::info!(customers = ?names, "no tasks found for matched customers");
            TaskLookup::NoTasks
        }
        Ok(tasks) => {
            tracing::info!(customers = ?names, count = tasks.len(), "tasks found for matched customers");
            TaskLookup::Found(tasks)
        }
        Err(err) => {
            tracing::error!(customers = ?names, error = %err, "task lookup failed");
            TaskLookup::Failed(err)
        }
    }
}
