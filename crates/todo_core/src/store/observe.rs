//! Change-notification streams built on `TaskStore::subscribe`.
//!
//! Each stream yields the current state first, then re-queries after every
//! observed version bump. Bursts of commits may coalesce into one item that
//! reflects the latest state. Queries run on the runtime's blocking pool.

use super::{run_store, TaskStore};
use crate::model::task::LocalTask;
use crate::repo::RepoResult;
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;
use tokio::runtime::Handle;

/// Watches the whole table.
pub fn observe_all_tasks<S>(
    runtime: Handle,
    store: Arc<S>,
) -> BoxStream<'static, RepoResult<Vec<LocalTask>>>
where
    S: TaskStore + ?Sized + 'static,
{
    watch_query(runtime, store, |store: &S| store.get_all_tasks())
}

/// Watches one row; yields `None` while the row is absent.
pub fn observe_task<S>(
    runtime: Handle,
    store: Arc<S>,
    id: impl Into<String>,
) -> BoxStream<'static, RepoResult<Option<LocalTask>>>
where
    S: TaskStore + ?Sized + 'static,
{
    let id = id.into();
    watch_query(runtime, store, move |store: &S| store.get_task(&id))
}

fn watch_query<S, T, F>(
    runtime: Handle,
    store: Arc<S>,
    query: F,
) -> BoxStream<'static, RepoResult<T>>
where
    S: TaskStore + ?Sized + 'static,
    T: Send + 'static,
    F: Fn(&S) -> RepoResult<T> + Send + Sync + 'static,
{
    let mut changes = store.subscribe();
    changes.mark_changed();
    let query = Arc::new(query);

    stream::unfold(
        (runtime, store, changes, query),
        |(runtime, store, mut changes, query)| async move {
            // Sender lives inside the store, which this state keeps alive.
            changes.changed().await.ok()?;
            let shared = Arc::clone(&query);
            let snapshot = run_store(&runtime, &store, move |store: &S| (*shared)(store)).await;
            Some((snapshot, (runtime, store, changes, query)))
        },
    )
    .boxed()
}
