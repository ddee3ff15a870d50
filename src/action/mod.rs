//! Pluggable action execution for scheduled tasks.
//!
//! An action handler receives a task payload and reports success or a
//! failure reason; it never sees task status or storage. Handlers are looked
//! up by action tag in the [`services::ActionRegistry`]. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Registry and built-in handlers in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
