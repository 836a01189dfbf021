#![allow(dead_code)]

use async_trait::async_trait;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use todo_core::store::open_db_in_memory;
use todo_core::{
    DefaultTaskRepository, LocalTask, NetworkDataSource, NetworkTask, RemoteError, RemoteResult,
    SqliteTaskStore, Task,
};
use tokio::runtime::Handle;
use tokio::sync::Mutex;

/// Zero-latency remote with switchable failures.
pub struct FakeNetworkDataSource {
    tasks: Mutex<Vec<NetworkTask>>,
    unavailable: AtomicBool,
    uploads: AtomicUsize,
}

impl FakeNetworkDataSource {
    pub fn new(tasks: Vec<NetworkTask>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            unavailable: AtomicBool::new(false),
            uploads: AtomicUsize::new(0),
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> Vec<NetworkTask> {
        self.tasks.lock().await.clone()
    }

    pub async fn replace(&self, tasks: Vec<NetworkTask>) {
        *self.tasks.lock().await = tasks;
    }

    fn check_available(&self) -> RemoteResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable("fake outage".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl NetworkDataSource for FakeNetworkDataSource {
    async fn fetch_tasks(&self) -> RemoteResult<Vec<NetworkTask>> {
        self.check_available()?;
        Ok(self.tasks.lock().await.clone())
    }

    async fn upload_tasks(&self, tasks: Vec<NetworkTask>) -> RemoteResult<()> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        *self.tasks.lock().await = tasks;
        Ok(())
    }
}

pub type TestRepository = DefaultTaskRepository<SqliteTaskStore, FakeNetworkDataSource>;

pub struct Fixture {
    pub repo: TestRepository,
    pub store: Arc<SqliteTaskStore>,
    pub network: Arc<FakeNetworkDataSource>,
}

/// Builds a repository over an in-memory store seeded with `local` and a
/// fake remote seeded with `remote`.
pub fn fixture(local: &[Task], remote: &[Task]) -> Fixture {
    use todo_core::TaskStore;

    let store = Arc::new(SqliteTaskStore::new(open_db_in_memory().unwrap()));
    let rows: Vec<LocalTask> = local.iter().map(LocalTask::from).collect();
    store.upsert_all_tasks(&rows).unwrap();

    let network = Arc::new(FakeNetworkDataSource::new(
        remote.iter().map(NetworkTask::from).collect(),
    ));
    let repo =
        DefaultTaskRepository::new(Arc::clone(&store), Arc::clone(&network), Handle::current());

    Fixture {
        repo,
        store,
        network,
    }
}

pub fn task(id: &str, n: u32) -> Task {
    Task::with_id(id, format!("title{n}"), format!("description{n}"))
}

pub fn sorted_by_id(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(|a, b| a.id.cmp(&b.id));
    tasks
}

/// Polls `check` until it holds; background pushes run between polls.
pub async fn wait_until<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..400 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition was not reached in time");
}
