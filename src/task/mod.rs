//! Task scheduling and lifecycle management.
//!
//! Submission validates a request, persists a `scheduled` task, and registers
//! a one-shot dispatch trigger for its `run_at` instant. Execution claims the
//! task with a conditional `scheduled -> running` write, runs the action
//! handler registered for the task's action tag, and records `completed` or
//! `failed`. Duplicate trigger deliveries observe the claim and do nothing.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
