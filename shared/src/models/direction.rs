use naia_serde::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr, UnsignedInteger};

/// Orientation of a grid object, and the direction of its movement
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Down,
    Left,
    Right,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::Up,
    ];

    fn to_index(self) -> u8 {
        match self {
            Direction::Down => 0,
            Direction::Left => 1,
            Direction::Right => 2,
            Direction::Up => 3,
        }
    }
}

impl Serde for Direction {
    fn ser(&self, writer: &mut dyn BitWrite) {
        UnsignedInteger::<2>::new(self.to_index()).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match UnsignedInteger::<2>::de(reader)?.get() {
            0 => Ok(Direction::Down),
            1 => Ok(Direction::Left),
            2 => Ok(Direction::Right),
            3 => Ok(Direction::Up),
            _ => Err(SerdeErr),
        }
    }

    fn bit_length(&self) -> u32 {
        <UnsignedInteger<2> as ConstBitLength>::const_bit_length()
    }
}
