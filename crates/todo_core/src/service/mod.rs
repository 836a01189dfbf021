//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep CLI/presentation callers decoupled from storage details.

pub mod task_service;
