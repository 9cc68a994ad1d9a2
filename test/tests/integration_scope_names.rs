/// Integration tests for scope lifecycle and the scope name index

use tilesync_server::{ScopeError, ScopeKind, ScopeRegistry};
use tilesync_shared::{ConnectionId, MapBounds};
use tilesync_test::init_logger;

fn default_scope(name: &str) -> ScopeKind {
    ScopeKind::Default {
        default_name: Some(name.to_string()),
    }
}

/// Default scopes register under their default name once loading completes
#[test]
fn default_names_resolve_after_load() {
    init_logger();
    let mut registry = ScopeRegistry::new();
    let town = registry.add_scope(
        default_scope("town"),
        vec![MapBounds::new(8, 8), MapBounds::new(20, 12)],
    );

    assert!(registry.scope_by_name("town").is_none());

    registry.on_load_complete();

    assert_eq!(registry.scope_by_name("town").map(|scope| scope.id()), Some(town));
    assert_eq!(registry.map_by_name("town", 1), Some(&MapBounds::new(20, 12)));
    assert_eq!(registry.map_by_name("town", 2), None);
}

/// Dynamic scopes can take a free name, once
#[test]
fn dynamic_scope_registration() {
    init_logger();
    let mut registry = ScopeRegistry::new();
    let town = registry.add_scope(default_scope("town"), vec![MapBounds::new(8, 8)]);
    let dungeon = registry.add_scope(ScopeKind::Dynamic, vec![MapBounds::new(4, 4)]);
    let cave = registry.add_scope(ScopeKind::Dynamic, vec![MapBounds::new(4, 4)]);

    assert_eq!(
        registry.register_named_scope(dungeon, "dungeon"),
        Err(ScopeError::NotReady)
    );

    registry.on_load_complete();

    assert_eq!(registry.register_named_scope(dungeon, "dungeon"), Ok(()));
    assert_eq!(
        registry.register_named_scope(dungeon, "crypt"),
        Err(ScopeError::AlreadyNamed {
            scope_id: dungeon,
            name: "dungeon".to_string()
        })
    );
    assert_eq!(
        registry.register_named_scope(cave, "town"),
        Err(ScopeError::NameTaken {
            name: "town".to_string()
        })
    );
    assert_eq!(
        registry.register_named_scope(town, "village"),
        Err(ScopeError::DefaultScope { scope_id: town })
    );
    assert_eq!(registry.register_named_scope(cave, "  "), Err(ScopeError::BlankName));
    assert_eq!(
        registry.register_named_scope(cave + 10, "void"),
        Err(ScopeError::UnknownScope { scope_id: cave + 10 })
    );
}

/// Unloading drops every name
#[test]
fn unload_clears_names() {
    init_logger();
    let mut registry = ScopeRegistry::new();
    registry.add_scope(default_scope("town"), vec![]);
    let dungeon = registry.add_scope(ScopeKind::Dynamic, vec![]);
    registry.on_load_complete();
    registry
        .register_named_scope(dungeon, "dungeon")
        .expect("free name");

    registry.on_unload_complete();

    assert!(!registry.names_ready());
    assert!(registry.scope_by_name("town").is_none());
    assert!(registry.scope_by_name("dungeon").is_none());
}

/// Removing a scope frees its name and sends its observers to limbo
#[test]
fn remove_scope_frees_name_and_connections() {
    init_logger();
    let mut registry = ScopeRegistry::new();
    let dungeon = registry.add_scope(ScopeKind::Dynamic, vec![]);
    registry.on_load_complete();
    registry
        .register_named_scope(dungeon, "dungeon")
        .expect("free name");
    registry.move_connection(ConnectionId::new(1), Some(dungeon));

    registry.remove_scope(dungeon).expect("scope exists");

    assert!(registry.scope_by_name("dungeon").is_none());
    assert_eq!(registry.connection_scope(&ConnectionId::new(1)), None);
}

/// A connection observes one scope at a time
#[test]
fn connection_moves_between_scopes() {
    init_logger();
    let mut registry = ScopeRegistry::new();
    let first = registry.add_scope(ScopeKind::Dynamic, vec![]);
    let second = registry.add_scope(ScopeKind::Dynamic, vec![]);
    let connection = ConnectionId::new(4);

    registry.move_connection(connection, Some(first));
    registry.move_connection(connection, Some(second));

    assert_eq!(registry.connection_scope(&connection), Some(second));
    assert!(!registry.scope(first).expect("exists").has_connection(&connection));
    assert!(registry.scope(second).expect("exists").has_connection(&connection));

    registry.remove_connection(&connection);
    assert_eq!(registry.scope(second).expect("exists").connection_count(), 0);
}
