use std::collections::HashSet;

use tilesync_shared::{ConnectionId, MapBounds, MapIndex, ScopeId};

/// How a scope came to exist
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    /// Loaded at startup. Carries the name it registers under once loading
    /// completes, if any.
    Default { default_name: Option<String> },
    /// Created while the server runs. Named only through
    /// [`ScopeRegistry::register_named_scope`](super::ScopeRegistry::register_named_scope).
    Dynamic,
}

/// A synchronized scope: an ordered list of maps plus the connections
/// currently observing them.
pub struct SyncScope {
    id: ScopeId,
    kind: ScopeKind,
    name: Option<String>,
    maps: Vec<MapBounds>,
    connections: HashSet<ConnectionId>,
}

impl SyncScope {
    pub(crate) fn new(id: ScopeId, kind: ScopeKind, maps: Vec<MapBounds>) -> Self {
        Self {
            id,
            kind,
            name: None,
            maps,
            connections: HashSet::new(),
        }
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn kind(&self) -> &ScopeKind {
        &self.kind
    }

    pub fn is_default(&self) -> bool {
        matches!(self.kind, ScopeKind::Default { .. })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// The map at `index` within this scope
    pub fn map(&self, index: MapIndex) -> Option<&MapBounds> {
        self.maps.get(index as usize)
    }

    pub fn maps(&self) -> &[MapBounds] {
        &self.maps
    }

    /// Returns an iterator over the connections observing this scope
    pub fn connections(&self) -> impl Iterator<Item = &ConnectionId> {
        self.connections.iter()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn has_connection(&self, connection_id: &ConnectionId) -> bool {
        self.connections.contains(connection_id)
    }

    pub(crate) fn add_connection(&mut self, connection_id: ConnectionId) -> bool {
        self.connections.insert(connection_id)
    }

    pub(crate) fn remove_connection(&mut self, connection_id: &ConnectionId) -> bool {
        self.connections.remove(connection_id)
    }

    pub(crate) fn clear_connections(&mut self) {
        self.connections.clear();
    }
}
