use std::collections::HashMap;

use log::{info, warn};

use tilesync_shared::{ConnectionId, MapBounds, MapIndex, ScopeId};

use crate::ScopeError;

use super::{ScopeKind, SyncScope};

/// Owns the server's synchronized scopes, which connection observes which
/// scope, and the name index over scopes.
///
/// The name index only exists between [`on_load_complete`] and
/// [`on_unload_complete`].
///
/// [`on_load_complete`]: ScopeRegistry::on_load_complete
/// [`on_unload_complete`]: ScopeRegistry::on_unload_complete
pub struct ScopeRegistry {
    scopes: HashMap<ScopeId, SyncScope>,
    connection_scopes: HashMap<ConnectionId, ScopeId>,
    names: HashMap<String, ScopeId>,
    names_ready: bool,
    next_scope_id: ScopeId,
}

impl Default for ScopeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeRegistry {
    pub fn new() -> Self {
        Self {
            scopes: HashMap::new(),
            connection_scopes: HashMap::new(),
            names: HashMap::new(),
            names_ready: false,
            // 0 is left free so that a zeroed id never resolves
            next_scope_id: 1,
        }
    }

    //// Scopes

    pub fn add_scope(&mut self, kind: ScopeKind, maps: Vec<MapBounds>) -> ScopeId {
        let scope_id = self.next_scope_id;
        self.next_scope_id += 1;
        self.scopes
            .insert(scope_id, SyncScope::new(scope_id, kind, maps));
        scope_id
    }

    /// Removes a scope, its name and its observers' membership
    pub fn remove_scope(&mut self, scope_id: ScopeId) -> Option<SyncScope> {
        let scope = self.scopes.remove(&scope_id)?;
        if let Some(name) = scope.name() {
            self.names.remove(name);
        }
        for connection_id in scope.connections() {
            self.connection_scopes.remove(connection_id);
        }
        Some(scope)
    }

    pub fn scope(&self, scope_id: ScopeId) -> Option<&SyncScope> {
        self.scopes.get(&scope_id)
    }

    pub fn scope_ids(&self) -> impl Iterator<Item = &ScopeId> {
        self.scopes.keys()
    }

    //// Connections

    /// The scope `connection_id` currently observes, or `None` while it is
    /// in limbo
    pub fn connection_scope(&self, connection_id: &ConnectionId) -> Option<ScopeId> {
        self.connection_scopes.get(connection_id).copied()
    }

    /// Moves a connection to `scope_id`, or to limbo when `None`
    pub fn move_connection(&mut self, connection_id: ConnectionId, scope_id: Option<ScopeId>) {
        if let Some(previous) = self.connection_scopes.remove(&connection_id) {
            if let Some(scope) = self.scopes.get_mut(&previous) {
                scope.remove_connection(&connection_id);
            }
        }
        let Some(scope_id) = scope_id else {
            return;
        };
        let Some(scope) = self.scopes.get_mut(&scope_id) else {
            warn!("scope: {} does not exist, connection: {} left in limbo", scope_id, connection_id);
            return;
        };
        scope.add_connection(connection_id);
        self.connection_scopes.insert(connection_id, scope_id);
    }

    pub fn remove_connection(&mut self, connection_id: &ConnectionId) {
        self.move_connection(*connection_id, None);
    }

    /// Sends every observer of `scope_id` to limbo
    pub(crate) fn clear_scope_connections(&mut self, scope_id: ScopeId) {
        let Some(scope) = self.scopes.get_mut(&scope_id) else {
            return;
        };
        for connection_id in scope.connections() {
            self.connection_scopes.remove(connection_id);
        }
        scope.clear_connections();
    }

    //// Names

    /// Rebuilds the name index from the default scopes' default names
    pub fn on_load_complete(&mut self) {
        self.names.clear();
        for scope in self.scopes.values_mut() {
            scope.set_name(None);
        }

        let mut defaults: Vec<(ScopeId, String)> = self
            .scopes
            .values()
            .filter_map(|scope| match scope.kind() {
                ScopeKind::Default {
                    default_name: Some(name),
                } if !name.trim().is_empty() => Some((scope.id(), name.clone())),
                _ => None,
            })
            .collect();
        defaults.sort_by_key(|(scope_id, _)| *scope_id);

        for (scope_id, name) in defaults {
            if self.names.contains_key(&name) {
                warn!("default scope name '{}' is used twice, scope: {} left unnamed", name, scope_id);
                continue;
            }
            self.insert_name(scope_id, name);
        }

        self.names_ready = true;
    }

    pub fn on_unload_complete(&mut self) {
        self.names_ready = false;
        self.names.clear();
        for scope in self.scopes.values_mut() {
            scope.set_name(None);
        }
    }

    pub fn names_ready(&self) -> bool {
        self.names_ready
    }

    /// Registers a dynamic scope under a unique name
    pub fn register_named_scope(&mut self, scope_id: ScopeId, name: &str) -> Result<(), ScopeError> {
        if name.trim().is_empty() {
            return Err(ScopeError::BlankName);
        }
        let Some(scope) = self.scopes.get(&scope_id) else {
            return Err(ScopeError::UnknownScope { scope_id });
        };
        if scope.is_default() {
            return Err(ScopeError::DefaultScope { scope_id });
        }
        if !self.names_ready {
            return Err(ScopeError::NotReady);
        }
        if let Some(existing) = scope.name() {
            return Err(ScopeError::AlreadyNamed {
                scope_id,
                name: existing.to_string(),
            });
        }
        if self.names.contains_key(name) {
            return Err(ScopeError::NameTaken {
                name: name.to_string(),
            });
        }

        self.insert_name(scope_id, name.to_string());
        Ok(())
    }

    pub fn scope_by_name(&self, name: &str) -> Option<&SyncScope> {
        let scope_id = self.names.get(name)?;
        self.scopes.get(scope_id)
    }

    /// The map at `index` in the scope registered as `name`
    pub fn map_by_name(&self, name: &str, index: MapIndex) -> Option<&MapBounds> {
        self.scope_by_name(name)?.map(index)
    }

    fn insert_name(&mut self, scope_id: ScopeId, name: String) {
        if let Some(scope) = self.scopes.get_mut(&scope_id) {
            info!("scope: {} registered as '{}'", scope_id, name);
            scope.set_name(Some(name.clone()));
            self.names.insert(name, scope_id);
        }
    }
}
