mod scope_connections;
mod scope_registry;
mod scope_transfer;
mod sync_scope;

pub use scope_connections::{ScopeConnectionsMut, ScopeConnectionsRef};
pub use scope_registry::ScopeRegistry;
pub use scope_transfer::ScopeTransfer;
pub use sync_scope::{ScopeKind, SyncScope};
