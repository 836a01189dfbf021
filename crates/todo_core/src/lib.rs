//! Local-first task core.
//! Owns the task model, the SQLite-backed local store, the simulated remote
//! mirror and the repository that reconciles them.

pub mod config;
pub mod logging;
pub mod model;
pub mod network;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{ConfigError, CoreConfig};
pub use logging::{
    default_log_level, init_from_config, init_logging, logging_status, LoggingError,
};
pub use model::task::{LocalTask, NetworkTask, NetworkTaskStatus, Task, TaskFilter, TaskId};
pub use network::{NetworkDataSource, RemoteError, RemoteResult, SimulatedNetworkDataSource};
pub use repo::task_repo::{DefaultTaskRepository, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use service::task_service::TaskService;
pub use store::{SqliteTaskStore, TaskStore};
