mod command;
mod command_queue;

pub use command::QueuedCommand;
pub use command_queue::{CommandQueue, DrainOutcome};
