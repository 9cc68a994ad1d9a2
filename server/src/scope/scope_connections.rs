use tilesync_shared::{ConnectionId, ScopeId};

use super::ScopeRegistry;

pub struct ScopeConnectionsRef<'s> {
    registry: &'s ScopeRegistry,
    scope_id: ScopeId,
}

impl<'s> ScopeConnectionsRef<'s> {
    pub(crate) fn new(registry: &'s ScopeRegistry, scope_id: ScopeId) -> Self {
        Self { registry, scope_id }
    }

    /// Returns true if the connection observes the Scope
    pub fn has(&self, connection_id: &ConnectionId) -> bool {
        self.registry
            .scope(self.scope_id)
            .is_some_and(|scope| scope.has_connection(connection_id))
    }

    pub fn count(&self) -> usize {
        self.registry
            .scope(self.scope_id)
            .map_or(0, |scope| scope.connection_count())
    }
}

pub struct ScopeConnectionsMut<'s> {
    registry: &'s mut ScopeRegistry,
    scope_id: ScopeId,
}

impl<'s> ScopeConnectionsMut<'s> {
    pub(crate) fn new(registry: &'s mut ScopeRegistry, scope_id: ScopeId) -> Self {
        Self { registry, scope_id }
    }

    /// Returns true if the connection observes the Scope
    pub fn has(&self, connection_id: &ConnectionId) -> bool {
        self.registry
            .scope(self.scope_id)
            .is_some_and(|scope| scope.has_connection(connection_id))
    }

    /// Adds a connection to the Scope's observers. A connection observes
    /// at most one Scope, so it leaves any other one.
    pub fn include(&mut self, connection_id: ConnectionId) -> &mut Self {
        self.registry.move_connection(connection_id, Some(self.scope_id));

        self
    }

    /// Removes a connection from the Scope's observers
    pub fn exclude(&mut self, connection_id: &ConnectionId) -> &mut Self {
        if self.has(connection_id) {
            self.registry.move_connection(*connection_id, None);
        }

        self
    }

    /// Removes every observer from the Scope
    pub fn clear(&mut self) -> &mut Self {
        self.registry.clear_scope_connections(self.scope_id);

        self
    }
}
