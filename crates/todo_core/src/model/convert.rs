//! Field-by-field conversions between task shapes.
//!
//! All conversions are total; the only non-trivial mapping is
//! `NetworkTaskStatus::Complete <-> is_completed == true`.

use super::task::{LocalTask, NetworkTask, NetworkTaskStatus, Task};

fn status_from_flag(is_completed: bool) -> NetworkTaskStatus {
    if is_completed {
        NetworkTaskStatus::Complete
    } else {
        NetworkTaskStatus::Active
    }
}

fn flag_from_status(status: NetworkTaskStatus) -> bool {
    status == NetworkTaskStatus::Complete
}

impl From<&Task> for LocalTask {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            is_completed: task.is_completed,
        }
    }
}

impl From<Task> for LocalTask {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            is_completed: task.is_completed,
        }
    }
}

impl From<&LocalTask> for Task {
    fn from(local: &LocalTask) -> Self {
        Self {
            id: local.id.clone(),
            title: local.title.clone(),
            description: local.description.clone(),
            is_completed: local.is_completed,
        }
    }
}

impl From<LocalTask> for Task {
    fn from(local: LocalTask) -> Self {
        Self {
            id: local.id,
            title: local.title,
            description: local.description,
            is_completed: local.is_completed,
        }
    }
}

impl From<&NetworkTask> for Task {
    fn from(remote: &NetworkTask) -> Self {
        Self {
            id: remote.id.clone(),
            title: remote.title.clone(),
            description: remote.short_description.clone(),
            is_completed: flag_from_status(remote.status),
        }
    }
}

impl From<&Task> for NetworkTask {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            short_description: task.description.clone(),
            status: status_from_flag(task.is_completed),
        }
    }
}

impl From<&NetworkTask> for LocalTask {
    fn from(remote: &NetworkTask) -> Self {
        Self {
            id: remote.id.clone(),
            title: remote.title.clone(),
            description: remote.short_description.clone(),
            is_completed: flag_from_status(remote.status),
        }
    }
}

impl From<NetworkTask> for LocalTask {
    fn from(remote: NetworkTask) -> Self {
        Self {
            is_completed: flag_from_status(remote.status),
            id: remote.id,
            title: remote.title,
            description: remote.short_description,
        }
    }
}

impl From<&LocalTask> for NetworkTask {
    fn from(local: &LocalTask) -> Self {
        Self {
            id: local.id.clone(),
            title: local.title.clone(),
            short_description: local.description.clone(),
            status: status_from_flag(local.is_completed),
        }
    }
}

impl From<LocalTask> for NetworkTask {
    fn from(local: LocalTask) -> Self {
        Self {
            status: status_from_flag(local.is_completed),
            id: local.id,
            title: local.title,
            short_description: local.description,
        }
    }
}

/// Converts any slice of task shapes into domain tasks.
pub fn to_tasks<'a, T>(items: &'a [T]) -> Vec<Task>
where
    Task: From<&'a T>,
{
    items.iter().map(Task::from).collect()
}

/// Converts any slice of task shapes into persisted rows.
pub fn to_local_tasks<'a, T>(items: &'a [T]) -> Vec<LocalTask>
where
    LocalTask: From<&'a T>,
{
    items.iter().map(LocalTask::from).collect()
}

/// Converts any slice of task shapes into remote records.
pub fn to_network_tasks<'a, T>(items: &'a [T]) -> Vec<NetworkTask>
where
    NetworkTask: From<&'a T>,
{
    items.iter().map(NetworkTask::from).collect()
}
