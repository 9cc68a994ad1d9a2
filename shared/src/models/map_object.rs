use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{Direction, Speed, Status};

/// Wire wrapper for the full or refresh snapshot of a synchronized object.
///
/// `data` is the object-specific payload produced by the game; the rest is
/// the movement state known by the server when the snapshot was taken.
#[derive(Clone, Debug, PartialEq)]
pub struct MapObjectModel<D: Serde> {
    pub status: Option<Status>,
    pub orientation: Direction,
    pub speed: Speed,
    pub data: D,
}

impl<D: Serde> MapObjectModel<D> {
    pub fn new(status: Option<Status>, orientation: Direction, speed: Speed, data: D) -> Self {
        Self {
            status,
            orientation,
            speed,
            data,
        }
    }
}

impl<D: Serde> Serde for MapObjectModel<D> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.status.ser(writer);
        self.orientation.ser(writer);
        self.speed.ser(writer);
        self.data.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let status = Option::<Status>::de(reader)?;
        let orientation = Direction::de(reader)?;
        let speed = Speed::de(reader)?;
        let data = D::de(reader)?;
        Ok(Self {
            status,
            orientation,
            speed,
            data,
        })
    }

    fn bit_length(&self) -> u32 {
        self.status.bit_length()
            + self.orientation.bit_length()
            + self.speed.bit_length()
            + self.data.bit_length()
    }
}
