use std::{collections::HashMap, error::Error};

use log::{info, warn};

use tilesync_shared::{ConnectionId, Direction, GridObject, MapIndex, Position};

use crate::{broadcaster::ScopeBroadcaster, object::ObjectAddress, PrincipalError, ServerConfig};

/// A grid object that a connection can own and steer
pub trait PrincipalObject: GridObject {
    fn set_owner(&mut self, owner: ConnectionId);

    fn owner(&self) -> Option<ConnectionId>;

    /// Where the object lives on the wire, once spawned in a scope
    fn address(&self) -> Option<ObjectAddress>;

    /// Whether the owning client predicts this object's movement locally
    fn is_optimistic(&self) -> bool {
        false
    }
}

/// A prefab, resolved from a [`PrefabSelector`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prefab {
    Index(u32),
    Key(String),
}

impl std::fmt::Display for Prefab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Prefab::Index(index) => write!(f, "#{}", index),
            Prefab::Key(key) => write!(f, "'{}'", key),
        }
    }
}

/// Which prefab to instantiate a principal from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrefabSelector {
    Index(u32),
    /// A blank key falls back to the configured default key
    Key(String),
    /// The configured default index, or else the configured default key
    Default,
}

/// Boundary to the scene layer that instantiates and destroys objects
pub trait PrincipalSpawner<T> {
    fn spawn(&mut self, prefab: &Prefab) -> Option<T>;

    fn destroy(&mut self, principal: T);
}

pub type HookError = Box<dyn Error + Send + Sync>;

type Hook<'h, T> = Box<dyn FnOnce(&mut T) -> Result<(), HookError> + 'h>;

/// Custom initialization run around a principal's first attachment.
/// Failures are logged and never undo the instantiation.
pub struct PrincipalHooks<'h, T> {
    before_attach: Option<Hook<'h, T>>,
    after_attach: Option<Hook<'h, T>>,
}

impl<'h, T> Default for PrincipalHooks<'h, T> {
    fn default() -> Self {
        Self {
            before_attach: None,
            after_attach: None,
        }
    }
}

impl<'h, T> PrincipalHooks<'h, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before_attach(
        mut self,
        hook: impl FnOnce(&mut T) -> Result<(), HookError> + 'h,
    ) -> Self {
        self.before_attach = Some(Box::new(hook));
        self
    }

    pub fn after_attach(mut self, hook: impl FnOnce(&mut T) -> Result<(), HookError> + 'h) -> Self {
        self.after_attach = Some(Box::new(hook));
        self
    }
}

fn run_hook<T>(hook: Option<Hook<'_, T>>, principal: &mut T, stage: &str, connection_id: &ConnectionId) {
    let Some(hook) = hook else {
        return;
    };
    if let Err(error) = hook(principal) {
        warn!(
            "{} hook failed while initializing the principal of connection: {}: {}",
            stage, connection_id, error
        );
    }
}

/// Result of asking a principal to move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The grid engine accepted the movement
    Started,
    /// The grid engine refused the movement
    Refused,
    /// The movement was refused and the owner was told where the principal
    /// actually is
    Rejected,
}

/// Maps each connection to the single principal object it owns
pub struct PrincipalRegistry<T: PrincipalObject> {
    principals: HashMap<ConnectionId, T>,
    default_prefab_index: Option<u32>,
    default_prefab_key: Option<String>,
}

impl<T: PrincipalObject> PrincipalRegistry<T> {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            principals: HashMap::new(),
            default_prefab_index: config.default_prefab_index,
            default_prefab_key: config
                .default_prefab_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
        }
    }

    pub fn resolve_prefab(&self, selector: &PrefabSelector) -> Result<Prefab, PrincipalError> {
        match selector {
            PrefabSelector::Index(index) => Ok(Prefab::Index(*index)),
            PrefabSelector::Key(key) if !key.trim().is_empty() => Ok(Prefab::Key(key.clone())),
            PrefabSelector::Key(_) => self
                .default_prefab_key
                .clone()
                .map(Prefab::Key)
                .ok_or(PrincipalError::NoDefaultPrefab { selector: "key" }),
            PrefabSelector::Default => {
                if let Some(index) = self.default_prefab_index {
                    Ok(Prefab::Index(index))
                } else if let Some(key) = &self.default_prefab_key {
                    Ok(Prefab::Key(key.clone()))
                } else {
                    Err(PrincipalError::NoDefaultPrefab {
                        selector: "index or key",
                    })
                }
            }
        }
    }

    /// Instantiates the principal of `connection_id` and attaches it to
    /// the map `map_provider` yields, if any, at `position`.
    pub fn instantiate_principal(
        &mut self,
        spawner: &mut dyn PrincipalSpawner<T>,
        connection_id: ConnectionId,
        selector: &PrefabSelector,
        map_provider: impl FnOnce() -> Option<MapIndex>,
        position: Position,
        hooks: PrincipalHooks<'_, T>,
    ) -> Result<(), PrincipalError> {
        let prefab = self.resolve_prefab(selector)?;
        if self.principals.contains_key(&connection_id) {
            return Err(PrincipalError::AlreadyOwnsPrincipal { connection_id });
        }

        let Some(mut principal) = spawner.spawn(&prefab) else {
            return Err(PrincipalError::Spawn {
                prefab: prefab.to_string(),
            });
        };
        run_hook(hooks.before_attach, &mut principal, "before-attach", &connection_id);
        principal.set_owner(connection_id);

        let principal = self.principals.entry(connection_id).or_insert(principal);
        if let Some(map_index) = map_provider() {
            principal.attach(map_index, position);
        }
        run_hook(hooks.after_attach, principal, "after-attach", &connection_id);

        info!("principal {} instantiated for connection: {}", prefab, connection_id);
        Ok(())
    }

    /// Destroys the principal of `connection_id`
    pub fn remove_principal(
        &mut self,
        spawner: &mut dyn PrincipalSpawner<T>,
        connection_id: &ConnectionId,
    ) -> Result<(), PrincipalError> {
        let Some(principal) = self.principals.remove(connection_id) else {
            return Err(PrincipalError::NoPrincipalForConnection {
                connection_id: *connection_id,
            });
        };
        spawner.destroy(principal);
        info!("principal of connection: {} removed", connection_id);
        Ok(())
    }

    pub fn get_principal(&self, connection_id: &ConnectionId) -> Result<&T, PrincipalError> {
        self.principals
            .get(connection_id)
            .ok_or(PrincipalError::NoPrincipalForConnection {
                connection_id: *connection_id,
            })
    }

    pub fn get_principal_mut(&mut self, connection_id: &ConnectionId) -> Result<&mut T, PrincipalError> {
        self.principals
            .get_mut(connection_id)
            .ok_or(PrincipalError::NoPrincipalForConnection {
                connection_id: *connection_id,
            })
    }

    pub fn try_get_principal(&self, connection_id: &ConnectionId) -> Option<&T> {
        self.principals.get(connection_id)
    }

    pub fn has_principal(&self, connection_id: &ConnectionId) -> bool {
        self.principals.contains_key(connection_id)
    }

    pub fn principal_count(&self) -> usize {
        self.principals.len()
    }

    /// Drops the principal of a departed connection, if it had one
    pub fn on_disconnected(
        &mut self,
        spawner: &mut dyn PrincipalSpawner<T>,
        connection_id: &ConnectionId,
    ) -> bool {
        self.remove_principal(spawner, connection_id).is_ok()
    }

    /// Destroys every principal
    pub fn on_server_stopped(&mut self, spawner: &mut dyn PrincipalSpawner<T>) {
        for (_, principal) in self.principals.drain() {
            spawner.destroy(principal);
        }
    }

    //// Movement

    pub fn move_up(
        &mut self,
        connection_id: &ConnectionId,
        queue: bool,
        broadcaster: &ScopeBroadcaster,
    ) -> Result<MoveOutcome, PrincipalError> {
        self.move_principal(connection_id, Direction::Up, queue, broadcaster)
    }

    pub fn move_down(
        &mut self,
        connection_id: &ConnectionId,
        queue: bool,
        broadcaster: &ScopeBroadcaster,
    ) -> Result<MoveOutcome, PrincipalError> {
        self.move_principal(connection_id, Direction::Down, queue, broadcaster)
    }

    pub fn move_left(
        &mut self,
        connection_id: &ConnectionId,
        queue: bool,
        broadcaster: &ScopeBroadcaster,
    ) -> Result<MoveOutcome, PrincipalError> {
        self.move_principal(connection_id, Direction::Left, queue, broadcaster)
    }

    pub fn move_right(
        &mut self,
        connection_id: &ConnectionId,
        queue: bool,
        broadcaster: &ScopeBroadcaster,
    ) -> Result<MoveOutcome, PrincipalError> {
        self.move_principal(connection_id, Direction::Right, queue, broadcaster)
    }

    /// Faces the principal towards `direction` and asks the grid engine to
    /// move it there. A refused movement of an optimistic principal is
    /// reported back to its owner.
    pub fn move_principal(
        &mut self,
        connection_id: &ConnectionId,
        direction: Direction,
        queue: bool,
        broadcaster: &ScopeBroadcaster,
    ) -> Result<MoveOutcome, PrincipalError> {
        let principal = self.get_principal_mut(connection_id)?;

        principal.set_orientation(direction);
        let continued = principal.is_moving();
        if principal.start_movement(direction, continued, queue) {
            return Ok(MoveOutcome::Started);
        }
        if !principal.is_optimistic() {
            return Ok(MoveOutcome::Refused);
        }
        let Some(address) = principal.address() else {
            return Ok(MoveOutcome::Refused);
        };

        // delivery failures are logged by the broadcaster
        let _ = broadcaster.send_movement_rejected(
            connection_id,
            address.scope_id,
            address.object_id,
            principal.position(),
        );
        Ok(MoveOutcome::Rejected)
    }
}
