use thiserror::Error;

use crate::{MapIndex, ObjectId, ScopeId};

/// Errors raised while validating or decoding an inbound object message
///
/// Every variant maps to a stable [`code`](SyncError::code), which is what a
/// client reports back to the server when it drops a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The message addresses a scope other than the current one
    #[error("Message for scope {received} does not match current scope {current:?}")]
    ScopeMismatch {
        current: Option<ScopeId>,
        received: ScopeId,
    },

    /// The current scope does not take part in movement synchronization
    #[error("Scope {scope_id} is not synchronized")]
    ScopeIsNotSynchronized { scope_id: ScopeId },

    /// No object with this id exists in the current scope
    #[error("Object {object_id} is unknown in scope {scope_id}")]
    UnknownObject {
        scope_id: ScopeId,
        object_id: ObjectId,
    },

    /// The object exists but exposes no synchronization capability
    #[error("Object {object_id} is not synchronized")]
    ObjectIsNotSynchronized { object_id: ObjectId },

    /// The map index is not part of the current scope
    #[error("Map {map_index} is unknown in scope {scope_id}")]
    UnknownMap {
        scope_id: ScopeId,
        map_index: MapIndex,
    },

    /// A positional message arrived for an object that is not attached
    #[error("Object {object_id} is not attached to any map")]
    ObjectNotInMap { object_id: ObjectId },

    /// The position falls outside of the target map
    #[error("Position ({x}, {y}) of object {object_id} is out of bounds for a {width}x{height} map")]
    ObjectPositionOutOfBounds {
        object_id: ObjectId,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    },

    /// The payload could not be decoded into an object message
    #[error("Malformed object message")]
    MalformedMessage,
}

impl SyncError {
    /// Wire code reported as a local error
    pub fn code(&self) -> &'static str {
        match self {
            SyncError::ScopeMismatch { .. } => "ScopeMismatch",
            SyncError::ScopeIsNotSynchronized { .. } => "ScopeIsNotSynchronized",
            SyncError::UnknownObject { .. } => "UnknownObject",
            SyncError::ObjectIsNotSynchronized { .. } => "ObjectIsNotSynchronized",
            SyncError::UnknownMap { .. } => "UnknownMap",
            SyncError::ObjectNotInMap { .. } => "ObjectNotInMap",
            SyncError::ObjectPositionOutOfBounds { .. } => "ObjectPositionOutOfBounds",
            SyncError::MalformedMessage => "MalformedMessage",
        }
    }
}
