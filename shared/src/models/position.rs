use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::Direction;

/// A cell on a grid map
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// The adjacent cell in the given direction, or `None` if the step would
    /// leave the `u16` coordinate space.
    pub fn step(&self, direction: Direction) -> Option<Self> {
        let (x, y) = match direction {
            Direction::Down => (Some(self.x), self.y.checked_add(1)),
            Direction::Up => (Some(self.x), self.y.checked_sub(1)),
            Direction::Left => (self.x.checked_sub(1), Some(self.y)),
            Direction::Right => (self.x.checked_add(1), Some(self.y)),
        };
        Some(Self::new(x?, y?))
    }
}

impl Serde for Position {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.x.ser(writer);
        self.y.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let x = u16::de(reader)?;
        let y = u16::de(reader)?;
        Ok(Self { x, y })
    }

    fn bit_length(&self) -> u32 {
        self.x.bit_length() + self.y.bit_length()
    }
}
