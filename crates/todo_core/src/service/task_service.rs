//! Task list use-case service.
//!
//! # Responsibility
//! - Expose filtered task observation for list views.
//! - Bundle multi-step flows (clear completed, then refresh).
//!
//! # Invariants
//! - Service APIs never bypass repository persistence or sync contracts.
//! - Errors from the repository are returned unchanged.

use crate::model::task::{Task, TaskFilter, TaskId};
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoResult;
use futures::stream::{BoxStream, StreamExt};

/// Use-case service wrapper over a task repository.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Observes the task list through `filter`.
    pub fn observe_tasks(&self, filter: TaskFilter) -> BoxStream<'static, RepoResult<Vec<Task>>> {
        self.repo
            .get_tasks_stream()
            .map(move |tasks| tasks.map(|tasks| filter.apply(tasks)))
            .boxed()
    }

    /// Point-in-time filtered read.
    pub async fn list_tasks(
        &self,
        filter: TaskFilter,
        force_update: bool,
    ) -> RepoResult<Vec<Task>> {
        let tasks = self.repo.get_tasks(force_update).await?;
        Ok(filter.apply(tasks))
    }

    pub async fn add_task(&self, title: &str, description: &str) -> RepoResult<TaskId> {
        self.repo.create_task(title, description).await
    }

    pub async fn edit_task(&self, id: &str, title: &str, description: &str) -> RepoResult<()> {
        self.repo.update_task(id, title, description).await
    }

    /// Completes or re-activates one task.
    pub async fn set_task_completed(&self, id: &str, completed: bool) -> RepoResult<()> {
        if completed {
            self.repo.complete_task(id).await
        } else {
            self.repo.activate_task(id).await
        }
    }

    pub async fn remove_task(&self, id: &str) -> RepoResult<()> {
        self.repo.delete_task(id).await
    }

    /// Clears completed tasks, then reloads the local set from the remote.
    pub async fn clear_completed_and_refresh(&self) -> RepoResult<()> {
        self.repo.clear_completed_tasks().await?;
        self.repo.refresh().await
    }

    pub async fn refresh(&self) -> RepoResult<()> {
        self.repo.refresh().await
    }
}
