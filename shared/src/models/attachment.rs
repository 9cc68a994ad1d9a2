use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{MapIndex, Position};

/// Which map of a scope an object sits on, and where
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Attachment {
    pub map_index: MapIndex,
    pub position: Position,
}

impl Attachment {
    pub fn new(map_index: MapIndex, position: Position) -> Self {
        Self {
            map_index,
            position,
        }
    }
}

impl Serde for Attachment {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.map_index.ser(writer);
        self.position.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let map_index = MapIndex::de(reader)?;
        let position = Position::de(reader)?;
        Ok(Self {
            map_index,
            position,
        })
    }

    fn bit_length(&self) -> u32 {
        self.map_index.bit_length() + self.position.bit_length()
    }
}
