use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{ObjectEvent, ObjectId, ScopeId};

/// An event addressed to one object inside one scope
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectMessage {
    pub scope_id: ScopeId,
    pub object_id: ObjectId,
    pub event: ObjectEvent,
}

impl ObjectMessage {
    pub fn new(scope_id: ScopeId, object_id: ObjectId, event: ObjectEvent) -> Self {
        Self {
            scope_id,
            object_id,
            event,
        }
    }
}

impl Serde for ObjectMessage {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.scope_id.ser(writer);
        self.object_id.ser(writer);
        self.event.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let scope_id = ScopeId::de(reader)?;
        let object_id = ObjectId::de(reader)?;
        let event = ObjectEvent::de(reader)?;
        Ok(Self {
            scope_id,
            object_id,
            event,
        })
    }

    fn bit_length(&self) -> u32 {
        self.scope_id.bit_length() + self.object_id.bit_length() + self.event.bit_length()
    }
}
