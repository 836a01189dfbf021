//! Task model in its three shapes: domain, persisted and remote.
//!
//! # Responsibility
//! - Define the domain `Task` consumed by callers of the repository.
//! - Define the row shape stored locally and the wire shape used remotely.
//! - Provide total conversions between the three shapes.
//!
//! # Invariants
//! - `id` is assigned once and never changes.
//! - `id` is the only correlation key across domain/local/network shapes.

pub mod convert;
pub mod task;
