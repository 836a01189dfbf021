//! Remote task data source.
//!
//! # Responsibility
//! - Define the wholesale fetch/upload contract of the remote mirror.
//! - Provide a simulated in-process mirror with artificial latency.
//!
//! # Invariants
//! - `fetch_tasks` and `upload_tasks` are each atomic and never interleave.

mod simulated;

pub use simulated::{SimulatedNetworkDataSource, DEFAULT_SERVICE_LATENCY};

use crate::model::task::NetworkTask;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Failure talking to the remote mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    Unavailable(String),
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "remote data source unavailable: {message}"),
        }
    }
}

impl Error for RemoteError {}

/// Wholesale remote task collection.
#[async_trait]
pub trait NetworkDataSource: Send + Sync {
    /// Returns the full remote collection.
    async fn fetch_tasks(&self) -> RemoteResult<Vec<NetworkTask>>;
    /// Replaces the full remote collection.
    async fn upload_tasks(&self, tasks: Vec<NetworkTask>) -> RemoteResult<()>;
}
