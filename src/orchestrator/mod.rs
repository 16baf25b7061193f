//! Sequencing of the task lifecycle against the vendor API.
//!
//! Every operation needs a builder token first; `start` additionally
//! derives the two channel-scoped media tokens and assembles the task
//! descriptor before submitting it.

mod task;

pub use task::{TaskHandle, TaskOrchestrator};
