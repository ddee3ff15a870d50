//! Port contracts for task scheduling and execution.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod executor;
pub mod repository;
pub mod trigger;

pub use executor::TaskExecutor;
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
pub use trigger::{DispatchTrigger, DispatchTriggerError, DispatchTriggerResult};
