//! # Tilesync Server
//! Detects movement of grid objects, broadcasts it to every connection
//! observing the object's scope, and tracks which object each connection
//! owns.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod transport;
pub mod shared {
    pub use tilesync_shared::{
        ConnectionId, Direction, GridObject, MapBounds, MapIndex, MapObjectModel, ObjectId,
        OwnedModel, Position, ScopeId, Serde, Speed, Status,
    };
}

mod broadcaster;
mod error;
mod notification;
mod object;
mod principal;
mod scope;
mod server;

pub use broadcaster::{BroadcastReport, ScopeBroadcaster};
pub use error::{OwnershipError, PrincipalError, ScopeError};
pub use notification::{GridEvent, GridNotification, NotificationSender};
pub use object::{ObjectAddress, ObjectKey, OwnedSnapshot, ServerObject, SnapshotProvider};
pub use principal::{
    HookError, MoveOutcome, Prefab, PrefabSelector, PrincipalHooks, PrincipalObject,
    PrincipalRegistry, PrincipalSpawner,
};
pub use scope::{
    ScopeConnectionsMut, ScopeConnectionsRef, ScopeKind, ScopeRegistry, ScopeTransfer, SyncScope,
};
pub use server::{ServerConfig, SyncServer};
