//! # Tilesync Client
//! Validates movement messages for the scope the client observes and
//! replays them on local grid objects through a lag-tolerant command queue.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use tilesync_shared::{
        Direction, GridObject, MapBounds, MapIndex, MapObjectModel, ObjectEvent, ObjectId,
        ObjectMessage, OwnedModel, Position, ScopeId, Serde, Speed, Status, SyncConfig, SyncError,
    };
}

mod config;
mod object;
mod protocol;
mod queue;
mod scope;

pub use config::ClientConfig;
pub use object::{ClientObject, ObjectState};
pub use protocol::{ClientProtocol, Inbox, LocalErrorSink};
pub use queue::{CommandQueue, DrainOutcome, QueuedCommand};
pub use scope::{ClientScope, ScopeObject, SyncedObject};
