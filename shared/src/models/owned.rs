use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

/// Snapshot payload that also tells the receiving connection whether the
/// object is its own principal.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedModel<D: Serde> {
    pub owned: bool,
    pub data: D,
}

impl<D: Serde> OwnedModel<D> {
    pub fn as_owned(data: D) -> Self {
        Self { owned: true, data }
    }

    pub fn as_not_owned(data: D) -> Self {
        Self { owned: false, data }
    }
}

impl<D: Serde> Serde for OwnedModel<D> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.owned.ser(writer);
        self.data.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let owned = bool::de(reader)?;
        let data = D::de(reader)?;
        Ok(Self { owned, data })
    }

    fn bit_length(&self) -> u32 {
        self.owned.bit_length() + self.data.bit_length()
    }
}
