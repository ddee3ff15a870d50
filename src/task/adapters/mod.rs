//! Adapter implementations for task persistence and dispatch trigger ports.

pub mod memory;
pub mod postgres;
pub mod timer;
