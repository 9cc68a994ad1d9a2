use tilesync_shared::{ConnectionId, ScopeId};

/// Boundary to the scope layer that moves connections between scopes and
/// sends them the snapshots of whatever they now observe.
pub trait ScopeTransfer {
    /// `connection_id` now observes `scope_id`
    fn send_to(&mut self, connection_id: &ConnectionId, scope_id: ScopeId);

    /// `connection_id` no longer observes any scope
    fn send_to_limbo(&mut self, connection_id: &ConnectionId);
}
