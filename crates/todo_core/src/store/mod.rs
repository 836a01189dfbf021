//! Local task store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide keyed row access over the persisted `tasks` table.
//! - Publish a change version after every committed mutation so observers
//!   can re-read current state.
//!
//! # Invariants
//! - Full scans return rows in insertion order; upserts keep a row's slot.
//! - Every mutating call bumps the change version exactly once after commit,
//!   including calls that touched zero rows.
//! - `replace_all_tasks` is one transaction and one notification.
//! - Async callers reach the store through `run_store`, never inline on a
//!   runtime worker.

mod observe;
mod schema;
mod sqlite;

pub use observe::{observe_all_tasks, observe_task};
pub use schema::{open_db, open_db_in_memory, SCHEMA_VERSION};
pub use sqlite::SqliteTaskStore;

use crate::model::task::LocalTask;
use crate::repo::{RepoError, RepoResult};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;

/// Monotonic counter of committed store mutations.
pub type ChangeVersion = u64;

/// Keyed task table with change notification.
///
/// Calls are synchronous and short; implementations serialize access
/// internally, callers hold no extra lock.
pub trait TaskStore: Send + Sync {
    fn get_task(&self, id: &str) -> RepoResult<Option<LocalTask>>;
    fn get_all_tasks(&self) -> RepoResult<Vec<LocalTask>>;
    fn upsert_task(&self, task: &LocalTask) -> RepoResult<()>;
    fn upsert_all_tasks(&self, tasks: &[LocalTask]) -> RepoResult<()>;
    /// Deletes every row and inserts `tasks` as one logical operation.
    fn replace_all_tasks(&self, tasks: &[LocalTask]) -> RepoResult<()>;
    fn delete_task(&self, id: &str) -> RepoResult<()>;
    fn delete_all_tasks(&self) -> RepoResult<()>;
    /// Returns the number of completed rows removed.
    fn delete_completed_tasks(&self) -> RepoResult<usize>;
    /// Rewrites title and description in one statement, leaving the
    /// completion flag alone. Returns whether a row with `id` existed.
    fn update_text(&self, id: &str, title: &str, description: &str) -> RepoResult<bool>;
    /// Returns whether a row with `id` existed.
    fn update_completed(&self, id: &str, is_completed: bool) -> RepoResult<bool>;
    /// Subscribes to the change version. The receiver starts at the current
    /// version.
    fn subscribe(&self) -> watch::Receiver<ChangeVersion>;
}

/// Runs one store call on the blocking pool of `runtime`.
///
/// A panic inside `op` surfaces as `RepoError::StoreUnavailable`.
pub async fn run_store<S, T, F>(runtime: &Handle, store: &Arc<S>, op: F) -> RepoResult<T>
where
    S: TaskStore + ?Sized + 'static,
    T: Send + 'static,
    F: FnOnce(&S) -> RepoResult<T> + Send + 'static,
{
    let store = Arc::clone(store);
    runtime
        .spawn_blocking(move || op(&*store))
        .await
        .map_err(|_| RepoError::StoreUnavailable)?
}
