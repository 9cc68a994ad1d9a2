use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{Direction, Position};

/// Payload of `Object:Movement:Started`: where the movement began and where
/// it is heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MovementStart {
    pub position: Position,
    pub direction: Direction,
}

impl MovementStart {
    pub fn new(position: Position, direction: Direction) -> Self {
        Self {
            position,
            direction,
        }
    }
}

impl Serde for MovementStart {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.position.ser(writer);
        self.direction.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let position = Position::de(reader)?;
        let direction = Direction::de(reader)?;
        Ok(Self {
            position,
            direction,
        })
    }

    fn bit_length(&self) -> u32 {
        self.position.bit_length() + self.direction.bit_length()
    }
}
