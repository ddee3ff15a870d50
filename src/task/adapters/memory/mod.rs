//! In-memory adapter implementations for testing and single-process use.

mod task;
mod trigger;

pub use task::InMemoryTaskRepository;
pub use trigger::RecordingDispatchTrigger;
