mod movement_start;
mod object_event;
mod object_message;

pub use movement_start::MovementStart;
pub use object_event::ObjectEvent;
pub use object_message::ObjectMessage;
