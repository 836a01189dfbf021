//! Task repository contract and local-first implementation.
//!
//! # Responsibility
//! - Serve reads and change streams from the local store.
//! - Apply mutations locally, then mirror the full local set to the remote
//!   in a detached best-effort push.
//! - Replace the local set wholesale from the remote on refresh.
//!
//! # Invariants
//! - A mutation is committed locally before its push is scheduled; push
//!   failures never reach the caller and never roll the mutation back.
//! - A push runs on the repository's runtime and outlives both the caller's
//!   future and the repository itself.
//! - `refresh` swaps the table in one store transaction.
//! - Store calls run on the runtime's blocking pool.

use crate::model::convert::{to_local_tasks, to_network_tasks, to_tasks};
use crate::model::task::{new_task_id, LocalTask, Task, TaskId};
use crate::network::NetworkDataSource;
use crate::repo::{RepoError, RepoResult};
use crate::store::{observe_all_tasks, observe_task, run_store, TaskStore};
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Handle;

/// Repository interface for task reads, writes and remote reconciliation.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Current task list, then a new list after every local commit.
    fn get_tasks_stream(&self) -> BoxStream<'static, RepoResult<Vec<Task>>>;

    /// Current state of one task (`None` while absent), then updates.
    fn get_task_stream(&self, id: &str) -> BoxStream<'static, RepoResult<Option<Task>>>;

    /// Reads all tasks, refreshing from the remote first when `force_update`.
    async fn get_tasks(&self, force_update: bool) -> RepoResult<Vec<Task>>;

    async fn get_task(&self, id: &str, force_update: bool) -> RepoResult<Option<Task>>;

    /// Replaces every local task with the remote collection.
    async fn refresh(&self) -> RepoResult<()>;

    /// Persists a new active task and returns its generated id.
    async fn create_task(&self, title: &str, description: &str) -> RepoResult<TaskId>;

    /// Fails with `RepoError::NotFound` when `id` does not exist.
    async fn update_task(&self, id: &str, title: &str, description: &str) -> RepoResult<()>;

    async fn complete_task(&self, id: &str) -> RepoResult<()>;

    async fn activate_task(&self, id: &str) -> RepoResult<()>;

    async fn clear_completed_tasks(&self) -> RepoResult<()>;

    async fn delete_all_tasks(&self) -> RepoResult<()>;

    async fn delete_task(&self, id: &str) -> RepoResult<()>;
}

/// Local-first repository over a task store and a remote mirror.
pub struct DefaultTaskRepository<S, N> {
    store: Arc<S>,
    network: Arc<N>,
    runtime: Handle,
}

impl<S, N> DefaultTaskRepository<S, N>
where
    S: TaskStore + 'static,
    N: NetworkDataSource + 'static,
{
    /// Builds a repository; store calls and sync pushes run on `runtime`.
    pub fn new(store: Arc<S>, network: Arc<N>, runtime: Handle) -> Self {
        Self {
            store,
            network,
            runtime,
        }
    }

    async fn run_store<T, F>(&self, op: F) -> RepoResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&S) -> RepoResult<T> + Send + 'static,
    {
        run_store(&self.runtime, &self.store, op).await
    }

    async fn set_completed(&self, id: &str, is_completed: bool) -> RepoResult<()> {
        let op = if is_completed { "complete" } else { "activate" };
        let id = id.to_string();
        let existed = self
            .run_store(move |store| store.update_completed(&id, is_completed))
            .await?;
        debug!("event=task_mutation module=repo op={op} status=ok found={existed}");
        self.schedule_sync(op);
        Ok(())
    }

    /// Spawns a detached push of the whole local set to the remote.
    ///
    /// Failures are dropped silently; only completed pushes are recorded.
    fn schedule_sync(&self, op: &'static str) {
        let store = Arc::clone(&self.store);
        let network = Arc::clone(&self.network);
        let runtime = self.runtime.clone();
        self.runtime.spawn(async move {
            let started_at = Instant::now();
            if let Ok(count) = push_local_tasks(&runtime, &store, &*network).await {
                debug!(
                    "event=remote_sync module=repo status=ok trigger={op} count={count} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
            }
        });
    }
}

async fn push_local_tasks<S, N>(
    runtime: &Handle,
    store: &Arc<S>,
    network: &N,
) -> RepoResult<usize>
where
    S: TaskStore + ?Sized + 'static,
    N: NetworkDataSource + ?Sized,
{
    let rows = run_store(runtime, store, |store: &S| store.get_all_tasks()).await?;
    let tasks = to_network_tasks(&rows);
    let count = tasks.len();
    network.upload_tasks(tasks).await?;
    Ok(count)
}

#[async_trait]
impl<S, N> TaskRepository for DefaultTaskRepository<S, N>
where
    S: TaskStore + 'static,
    N: NetworkDataSource + 'static,
{
    fn get_tasks_stream(&self) -> BoxStream<'static, RepoResult<Vec<Task>>> {
        observe_all_tasks(self.runtime.clone(), Arc::clone(&self.store))
            .map(|rows| {
                rows.map(|rows| rows.into_iter().map(Task::from).collect::<Vec<_>>())
            })
            .boxed()
    }

    fn get_task_stream(&self, id: &str) -> BoxStream<'static, RepoResult<Option<Task>>> {
        observe_task(self.runtime.clone(), Arc::clone(&self.store), id)
            .map(|row| row.map(|row| row.map(Task::from)))
            .boxed()
    }

    async fn get_tasks(&self, force_update: bool) -> RepoResult<Vec<Task>> {
        if force_update {
            self.refresh().await?;
        }
        let rows = self.run_store(|store| store.get_all_tasks()).await?;
        Ok(to_tasks(&rows))
    }

    async fn get_task(&self, id: &str, force_update: bool) -> RepoResult<Option<Task>> {
        if force_update {
            self.refresh().await?;
        }
        let id = id.to_string();
        let row = self.run_store(move |store| store.get_task(&id)).await?;
        Ok(row.map(Task::from))
    }

    async fn refresh(&self) -> RepoResult<()> {
        let started_at = Instant::now();
        info!("event=task_refresh module=repo status=start");

        let remote = match self.network.fetch_tasks().await {
            Ok(remote) => remote,
            Err(err) => {
                error!(
                    "event=task_refresh module=repo status=error duration_ms={} error_code=remote_fetch_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        let rows = to_local_tasks(&remote);
        let count = rows.len();
        self.run_store(move |store| store.replace_all_tasks(&rows)).await?;
        info!(
            "event=task_refresh module=repo status=ok count={count} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    async fn create_task(&self, title: &str, description: &str) -> RepoResult<TaskId> {
        let task = LocalTask {
            id: new_task_id(),
            title: title.to_string(),
            description: description.to_string(),
            is_completed: false,
        };
        let id = task.id.clone();
        self.run_store(move |store| store.upsert_task(&task)).await?;
        debug!("event=task_mutation module=repo op=create status=ok");
        self.schedule_sync("create");
        Ok(id)
    }

    async fn update_task(&self, id: &str, title: &str, description: &str) -> RepoResult<()> {
        let key = id.to_string();
        let title = title.to_string();
        let description = description.to_string();
        let existed = self
            .run_store(move |store| store.update_text(&key, &title, &description))
            .await?;
        if !existed {
            return Err(RepoError::NotFound(id.to_string()));
        }

        debug!("event=task_mutation module=repo op=update status=ok");
        self.schedule_sync("update");
        Ok(())
    }

    async fn complete_task(&self, id: &str) -> RepoResult<()> {
        self.set_completed(id, true).await
    }

    async fn activate_task(&self, id: &str) -> RepoResult<()> {
        self.set_completed(id, false).await
    }

    async fn clear_completed_tasks(&self) -> RepoResult<()> {
        let removed = self.run_store(|store| store.delete_completed_tasks()).await?;
        debug!("event=task_mutation module=repo op=clear_completed status=ok count={removed}");
        self.schedule_sync("clear_completed");
        Ok(())
    }

    async fn delete_all_tasks(&self) -> RepoResult<()> {
        self.run_store(|store| store.delete_all_tasks()).await?;
        debug!("event=task_mutation module=repo op=delete_all status=ok");
        self.schedule_sync("delete_all");
        Ok(())
    }

    async fn delete_task(&self, id: &str) -> RepoResult<()> {
        let id = id.to_string();
        self.run_store(move |store| store.delete_task(&id)).await?;
        debug!("event=task_mutation module=repo op=delete status=ok");
        self.schedule_sync("delete");
        Ok(())
    }
}
