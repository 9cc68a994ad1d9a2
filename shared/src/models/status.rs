use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{Attachment, Direction};

/// Authoritative placement and motion of an object at a point in time
///
/// A detached object has no `Status` at all (it is carried as
/// `Option<Status>`), so a movement can never exist without an attachment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Status {
    pub attachment: Attachment,
    pub movement: Option<Direction>,
}

impl Status {
    pub fn new(attachment: Attachment, movement: Option<Direction>) -> Self {
        Self {
            attachment,
            movement,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.movement.is_some()
    }
}

impl Serde for Status {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.attachment.ser(writer);
        self.movement.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let attachment = Attachment::de(reader)?;
        let movement = Option::<Direction>::de(reader)?;
        Ok(Self {
            attachment,
            movement,
        })
    }

    fn bit_length(&self) -> u32 {
        self.attachment.bit_length() + self.movement.bit_length()
    }
}
