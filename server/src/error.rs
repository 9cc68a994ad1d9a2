use thiserror::Error;

use tilesync_shared::{ConnectionId, ScopeId};

use crate::ObjectKey;

/// Errors raised by the principal registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrincipalError {
    /// The connection already has a live principal
    #[error("Connection {connection_id} already has an object instantiated as its principal")]
    AlreadyOwnsPrincipal { connection_id: ConnectionId },

    /// The connection has no principal
    #[error("Connection {connection_id} does not have an object instantiated as its principal")]
    NoPrincipalForConnection { connection_id: ConnectionId },

    /// The default prefab was requested but none is configured
    #[error("A default prefab {selector} must be configured to instantiate a principal without one")]
    NoDefaultPrefab { selector: &'static str },

    /// The spawner could not produce an object for the prefab
    #[error("Prefab {prefab} could not be spawned as a principal")]
    Spawn { prefab: String },
}

/// Errors raised while naming scopes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// Names must contain a non-whitespace character
    #[error("Scope names must not be blank")]
    BlankName,

    /// The scope id is not registered
    #[error("Scope {scope_id} does not exist")]
    UnknownScope { scope_id: ScopeId },

    /// Default scopes are only named through their default name
    #[error("Scope {scope_id} is a default scope and cannot be renamed")]
    DefaultScope { scope_id: ScopeId },

    /// Scopes are not loaded, or are being unloaded
    #[error("Named scopes are not ready")]
    NotReady,

    /// The scope is already registered under a name
    #[error("Scope {scope_id} is already registered as '{name}'")]
    AlreadyNamed { scope_id: ScopeId, name: String },

    /// Another scope uses the name
    #[error("Scope name '{name}' is already in use")]
    NameTaken { name: String },
}

/// Errors raised while assigning the owner of a synchronized object
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OwnershipError {
    /// The object is not tracked by the server
    #[error("Object {key:?} does not exist")]
    UnknownObject { key: ObjectKey },

    /// The object is owned by another connection, which must be released
    /// first
    #[error("Object {key:?} is already owned by connection {owner}")]
    AlreadyOwned { key: ObjectKey, owner: ConnectionId },
}
