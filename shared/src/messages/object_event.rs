use naia_serde::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr, UnsignedInteger};

use crate::{Attachment, Direction, MovementStart, Position, Speed};

/// Content of an object message. Each variant is one wire message kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectEvent {
    Attached(Attachment),
    Detached,
    MovementStarted(MovementStart),
    MovementCancelled(Position),
    MovementRejected(Position),
    MovementFinished(Position),
    Teleported(Position),
    SpeedChanged(Speed),
    OrientationChanged(Direction),
}

impl ObjectEvent {
    /// The wire name of this message kind
    pub fn name(&self) -> &'static str {
        match self {
            ObjectEvent::Attached(_) => "Object:Attached",
            ObjectEvent::Detached => "Object:Detached",
            ObjectEvent::MovementStarted(_) => "Object:Movement:Started",
            ObjectEvent::MovementCancelled(_) => "Object:Movement:Cancelled",
            ObjectEvent::MovementRejected(_) => "Object:Movement:Rejected",
            ObjectEvent::MovementFinished(_) => "Object:Movement:Finished",
            ObjectEvent::Teleported(_) => "Object:Teleported",
            ObjectEvent::SpeedChanged(_) => "Object:Speed:Changed",
            ObjectEvent::OrientationChanged(_) => "Object:Orientation:Changed",
        }
    }

    /// The grid position carried by positional messages.
    ///
    /// Speed, orientation and detach messages carry none.
    pub fn position(&self) -> Option<Position> {
        match self {
            ObjectEvent::Attached(attachment) => Some(attachment.position),
            ObjectEvent::MovementStarted(start) => Some(start.position),
            ObjectEvent::MovementCancelled(position)
            | ObjectEvent::MovementRejected(position)
            | ObjectEvent::MovementFinished(position)
            | ObjectEvent::Teleported(position) => Some(*position),
            ObjectEvent::Detached
            | ObjectEvent::SpeedChanged(_)
            | ObjectEvent::OrientationChanged(_) => None,
        }
    }

    fn to_index(&self) -> u8 {
        match self {
            ObjectEvent::Attached(_) => 0,
            ObjectEvent::Detached => 1,
            ObjectEvent::MovementStarted(_) => 2,
            ObjectEvent::MovementCancelled(_) => 3,
            ObjectEvent::MovementRejected(_) => 4,
            ObjectEvent::MovementFinished(_) => 5,
            ObjectEvent::Teleported(_) => 6,
            ObjectEvent::SpeedChanged(_) => 7,
            ObjectEvent::OrientationChanged(_) => 8,
        }
    }
}

impl Serde for ObjectEvent {
    fn ser(&self, writer: &mut dyn BitWrite) {
        UnsignedInteger::<4>::new(self.to_index()).ser(writer);

        match self {
            ObjectEvent::Attached(attachment) => attachment.ser(writer),
            ObjectEvent::Detached => {}
            ObjectEvent::MovementStarted(start) => start.ser(writer),
            ObjectEvent::MovementCancelled(position)
            | ObjectEvent::MovementRejected(position)
            | ObjectEvent::MovementFinished(position)
            | ObjectEvent::Teleported(position) => position.ser(writer),
            ObjectEvent::SpeedChanged(speed) => speed.ser(writer),
            ObjectEvent::OrientationChanged(direction) => direction.ser(writer),
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match UnsignedInteger::<4>::de(reader)?.get() {
            0 => Ok(ObjectEvent::Attached(Attachment::de(reader)?)),
            1 => Ok(ObjectEvent::Detached),
            2 => Ok(ObjectEvent::MovementStarted(MovementStart::de(reader)?)),
            3 => Ok(ObjectEvent::MovementCancelled(Position::de(reader)?)),
            4 => Ok(ObjectEvent::MovementRejected(Position::de(reader)?)),
            5 => Ok(ObjectEvent::MovementFinished(Position::de(reader)?)),
            6 => Ok(ObjectEvent::Teleported(Position::de(reader)?)),
            7 => Ok(ObjectEvent::SpeedChanged(Speed::de(reader)?)),
            8 => Ok(ObjectEvent::OrientationChanged(Direction::de(reader)?)),
            // unknown tag
            _ => Err(SerdeErr),
        }
    }

    fn bit_length(&self) -> u32 {
        let mut output = <UnsignedInteger<4> as ConstBitLength>::const_bit_length();

        output += match self {
            ObjectEvent::Attached(attachment) => attachment.bit_length(),
            ObjectEvent::Detached => 0,
            ObjectEvent::MovementStarted(start) => start.bit_length(),
            ObjectEvent::MovementCancelled(position)
            | ObjectEvent::MovementRejected(position)
            | ObjectEvent::MovementFinished(position)
            | ObjectEvent::Teleported(position) => position.bit_length(),
            ObjectEvent::SpeedChanged(speed) => speed.bit_length(),
            ObjectEvent::OrientationChanged(direction) => direction.bit_length(),
        };

        output
    }
}
