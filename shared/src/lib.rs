//! # Tilesync Shared
//! Movement-synchronization types shared between tilesync-server & tilesync-client crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use naia_serde::{BitReader, BitWrite, BitWriter, ConstBitLength, Serde, SerdeErr, UnsignedInteger};

mod codec;
mod config;
mod error;
mod grid;
mod messages;
mod models;
mod types;

pub use codec::{decode, encode, read_message, write_message};
pub use config::{SyncConfig, MIN_LAG_TOLERANCE};
pub use error::SyncError;
pub use grid::GridObject;
pub use messages::{MovementStart, ObjectEvent, ObjectMessage};
pub use models::{
    attachment::Attachment, direction::Direction, map_bounds::MapBounds,
    map_object::MapObjectModel, owned::OwnedModel, position::Position, status::Status,
};
pub use types::{ConnectionId, MapIndex, ObjectId, ScopeId, Speed};
