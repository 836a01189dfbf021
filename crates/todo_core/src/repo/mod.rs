//! Repository layer: the single authority reconciling local and remote tasks.
//!
//! # Responsibility
//! - Define the task repository contract consumed by services and the CLI.
//! - Keep store/remote details away from callers.
//!
//! # Invariants
//! - Local store is authoritative for reads.
//! - Repository APIs return semantic errors (`NotFound`) in addition to
//!   SQLite and remote transport errors.

pub mod task_repo;

use crate::model::task::TaskId;
use crate::network::RemoteError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error returned by store and repository operations.
#[derive(Debug)]
pub enum RepoError {
    Sqlite(rusqlite::Error),
    /// The database was written by a newer build.
    UnsupportedSchemaVersion {
        found: u32,
        supported: u32,
    },
    NotFound(TaskId),
    InvalidData(String),
    Remote(RemoteError),
    /// The store lock was poisoned by a panicking writer.
    StoreUnavailable,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "task database schema version {found} is newer than supported {supported}"
            ),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
            Self::Remote(err) => write!(f, "{err}"),
            Self::StoreUnavailable => write!(f, "task store is unavailable"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Remote(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. }
            | Self::NotFound(_)
            | Self::InvalidData(_)
            | Self::StoreUnavailable => None,
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<RemoteError> for RepoError {
    fn from(value: RemoteError) -> Self {
        Self::Remote(value)
    }
}
