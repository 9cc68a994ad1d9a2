use naia_serde::{BitReader, BitWriter, Serde, SerdeErr};

use crate::{ObjectMessage, SyncError};

/// Serializes any wire value into a standalone payload
pub fn encode<T: Serde>(value: &T) -> Box<[u8]> {
    let mut writer = BitWriter::new();
    value.ser(&mut writer);
    writer.to_bytes()
}

/// Reads a wire value back from a payload produced by [`encode`]
pub fn decode<T: Serde>(payload: &[u8]) -> Result<T, SerdeErr> {
    let mut reader = BitReader::new(payload);
    T::de(&mut reader)
}

pub fn write_message(message: &ObjectMessage) -> Box<[u8]> {
    encode(message)
}

pub fn read_message(payload: &[u8]) -> Result<ObjectMessage, SyncError> {
    decode(payload).map_err(|_| SyncError::MalformedMessage)
}
