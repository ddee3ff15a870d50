//! Fermata: deferred task scheduling and execution.
//!
//! A client submits a task naming an action, a JSON payload, and a run-at
//! instant. The task is persisted as `scheduled` and a one-shot dispatch
//! trigger is armed. When the trigger fires, the execution service claims the
//! task, runs the registered action handler, and records the terminal status:
//!
//! ```text
//! scheduled -> running -> completed | failed
//! ```
//!
//! # Architecture
//!
//! Fermata follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, timers, HTTP)
//!
//! # Modules
//!
//! - [`task`]: Task records, the status state machine, submission, and
//!   execution
//! - [`action`]: Action handler registry and the built-in webhook handler
//! - [`api`]: HTTP routes over the task services
//! - [`config`]: Environment configuration
//! - [`telemetry`]: Tracing subscriber set-up

pub mod action;
pub mod api;
pub mod config;
pub mod task;
pub mod telemetry;
