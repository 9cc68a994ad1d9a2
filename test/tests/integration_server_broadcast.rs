/// Integration tests for the server side: grid notifications turn into
/// scope broadcasts, and those reach client protocols over the channel
/// transport

use std::thread;

use tilesync_client::{ClientConfig, ClientObject, ClientProtocol, ClientScope};
use tilesync_server::{
    transport::{ChannelReceiver, ChannelTransport, SendError},
    GridEvent, GridNotification, ObjectAddress, ObjectKey, OwnedSnapshot, OwnershipError,
    ScopeKind, ServerConfig, SnapshotProvider, SyncServer,
};
use tilesync_shared::{
    read_message, ConnectionId, Direction, GridObject, MapBounds, ObjectEvent, Position, ScopeId,
};
use tilesync_test::{
    assert_grid_at, init_logger, RecordingErrors, RecordingTransfer, SceneObject, ScriptedGrid,
    TransferEvent,
};

const OBJECT_ID: u32 = 10;

struct Harness {
    server: SyncServer,
    transport: ChannelTransport,
    transfer: RecordingTransfer,
    scope_id: ScopeId,
}

impl Harness {
    fn new() -> Self {
        init_logger();
        let transport = ChannelTransport::new();
        let transfer = RecordingTransfer::new();
        let mut server = SyncServer::new(
            ServerConfig::default(),
            Box::new(transport.clone()),
            Box::new(transfer.clone()),
        );
        let scope_id = server
            .scopes_mut()
            .add_scope(ScopeKind::Dynamic, vec![MapBounds::new(10, 10)]);
        Self {
            server,
            transport,
            transfer,
            scope_id,
        }
    }

    /// Connects a client and makes it observe the harness scope
    fn join(&mut self, connection_id: u64) -> ChannelReceiver {
        let connection_id = ConnectionId::new(connection_id);
        let receiver = self.transport.connect(connection_id);
        self.server
            .scopes_mut()
            .move_connection(connection_id, Some(self.scope_id));
        receiver
    }

    fn address(&self) -> ObjectAddress {
        ObjectAddress {
            scope_id: self.scope_id,
            object_id: OBJECT_ID,
        }
    }
}

fn drain_events(receiver: &mut ChannelReceiver) -> Vec<ObjectEvent> {
    let mut events = Vec::new();
    while let Some(payload) = receiver.receive().expect("channel open") {
        events.push(read_message(&payload).expect("decodes").event);
    }
    events
}

/// A movement reported from the engine thread reaches every observer, and
/// each observer replays it to the same cell
#[test]
fn engine_movement_reaches_every_observer() {
    let mut harness = Harness::new();
    let mut receivers = vec![harness.join(1), harness.join(2)];

    let key = ObjectKey::new(1);
    let mut grid = ScriptedGrid::attached(0, 2, 3);
    assert!(harness.server.insert_object(key, None));
    assert!(harness.server.spawn_object(&key, harness.address(), &grid));

    let notifier = harness.server.notifier();
    let grid = thread::spawn(move || {
        grid.set_orientation(Direction::Down);
        assert!(grid.start_movement(Direction::Down, false, false));
        notifier.capture(key, &grid, GridEvent::MovementStarted(Direction::Down));
        assert!(grid.complete_movement());
        notifier.capture(key, &grid, GridEvent::MovementFinished);
        grid
    })
    .join()
    .expect("engine thread panicked");
    assert_eq!(grid.position(), Position::new(2, 4));

    assert_eq!(harness.server.process_notifications(), 2);

    for receiver in receivers.iter_mut() {
        let errors = RecordingErrors::new();
        let mut protocol: ClientProtocol<SceneObject> =
            ClientProtocol::new(ClientConfig::default(), Box::new(errors.clone()));
        protocol.move_to_scope(Some(ClientScope::synchronized(
            harness.scope_id,
            vec![MapBounds::new(10, 10)],
        )));
        assert!(matches!(
            protocol.spawn_object(
                OBJECT_ID,
                SceneObject::Synced(ClientObject::new(ScriptedGrid::attached(0, 2, 3))),
            ),
            Ok(None)
        ));

        while let Some(payload) = receiver.receive().expect("channel open") {
            protocol.receive(&payload).expect("valid message");
        }

        let object = protocol
            .current_scope_mut()
            .and_then(|scope| scope.object_mut(&OBJECT_ID))
            .and_then(|object| object.synced_mut())
            .expect("object spawned");
        object.grid_mut().complete_movement();
        object.on_local_movement_finished();

        assert_grid_at!(object, 2, 4);
        assert_eq!(object.grid().orientation(), Direction::Down);
        assert!(errors.codes().is_empty());
    }
}

/// The server keeps the last status, speed and orientation it broadcast
#[test]
fn server_tracks_object_state() {
    let mut harness = Harness::new();
    let key = ObjectKey::new(1);
    let mut grid = ScriptedGrid::attached(0, 0, 0);
    harness.server.insert_object(key, None);
    harness.server.spawn_object(&key, harness.address(), &grid);

    grid.start_movement(Direction::Right, false, false);
    harness
        .server
        .apply_notification(GridNotification::capture(key, &grid, GridEvent::MovementStarted(Direction::Right)))
        .expect("broadcast");
    harness
        .server
        .apply_notification(GridNotification::capture(key, &grid, GridEvent::SpeedChanged(3)))
        .expect("broadcast");
    harness
        .server
        .apply_notification(GridNotification::capture(
            key,
            &grid,
            GridEvent::OrientationChanged(Direction::Up),
        ))
        .expect("broadcast");

    let object = harness.server.object(&key).expect("tracked");
    let status = object.current_status().expect("attached");
    assert_eq!(status.movement, Some(Direction::Right));
    assert_eq!(status.attachment.position, Position::new(0, 0));
    assert_eq!(object.speed(), 3);
    assert_eq!(object.orientation(), Direction::Up);
}

/// One unreachable observer does not keep the others from receiving
#[test]
fn failed_delivery_is_isolated() {
    let mut harness = Harness::new();
    let mut healthy = harness.join(1);
    let closed = harness.join(2);
    closed.close();
    // observes the scope without a route
    harness
        .server
        .scopes_mut()
        .move_connection(ConnectionId::new(3), Some(harness.scope_id));

    let key = ObjectKey::new(1);
    let grid = ScriptedGrid::attached(0, 4, 4);
    harness.server.insert_object(key, None);
    harness.server.spawn_object(&key, harness.address(), &grid);

    let report = harness
        .server
        .apply_notification(GridNotification::capture(key, &grid, GridEvent::Teleported))
        .expect("broadcast");

    assert_eq!(report.delivered, vec![ConnectionId::new(1)]);
    assert_eq!(report.recipient_count(), 3);
    assert!(!report.is_complete());
    assert!(report.failed.contains(&(
        ConnectionId::new(2),
        SendError::Closed {
            connection_id: ConnectionId::new(2)
        }
    )));
    assert!(report.failed.contains(&(
        ConnectionId::new(3),
        SendError::Unreachable {
            connection_id: ConnectionId::new(3)
        }
    )));
    assert_eq!(
        drain_events(&mut healthy),
        vec![ObjectEvent::Teleported(Position::new(4, 4))]
    );
}

/// Notifications about objects that are not spawned are dropped
#[test]
fn unspawned_object_is_not_broadcast() {
    let mut harness = Harness::new();
    let mut receiver = harness.join(1);
    let key = ObjectKey::new(1);
    let grid = ScriptedGrid::attached(0, 1, 1);
    harness.server.insert_object(key, None);

    assert!(harness
        .server
        .apply_notification(GridNotification::capture(key, &grid, GridEvent::Teleported))
        .is_none());
    assert!(harness
        .server
        .apply_notification(GridNotification::capture(
            ObjectKey::new(99),
            &grid,
            GridEvent::Teleported
        ))
        .is_none());
    assert!(drain_events(&mut receiver).is_empty());
}

/// An attachment that leaves no status behind is not broadcast
#[test]
fn attachment_without_status_is_dropped() {
    let mut harness = Harness::new();
    let mut receiver = harness.join(1);
    let key = ObjectKey::new(1);
    let grid = ScriptedGrid::new();
    harness.server.insert_object(key, None);
    harness.server.spawn_object(&key, harness.address(), &grid);

    assert!(harness
        .server
        .apply_notification(GridNotification::capture(key, &grid, GridEvent::Attached))
        .is_none());
    assert!(drain_events(&mut receiver).is_empty());
}

/// Detaching clears the tracked status and is broadcast
#[test]
fn detach_is_broadcast() {
    let mut harness = Harness::new();
    let mut receiver = harness.join(1);
    let key = ObjectKey::new(1);
    let mut grid = ScriptedGrid::attached(0, 1, 1);
    harness.server.insert_object(key, None);
    harness.server.spawn_object(&key, harness.address(), &grid);

    grid.detach();
    harness
        .server
        .apply_notification(GridNotification::capture(key, &grid, GridEvent::Detached))
        .expect("broadcast");

    assert!(harness
        .server
        .object(&key)
        .expect("tracked")
        .current_status()
        .is_none());
    assert_eq!(drain_events(&mut receiver), vec![ObjectEvent::Detached]);
}

/// Spawning an owned object sends its owner to the object's scope;
/// despawning sends the owner to limbo
#[test]
fn owner_follows_spawn_and_despawn() {
    let mut harness = Harness::new();
    let owner = ConnectionId::new(7);
    let key = ObjectKey::new(1);
    let grid = ScriptedGrid::attached(0, 0, 0);
    harness.server.insert_object(key, Some(owner));

    harness.server.spawn_object(&key, harness.address(), &grid);
    assert_eq!(
        harness.server.scopes().connection_scope(&owner),
        Some(harness.scope_id)
    );
    assert!(harness.server.scope_connections(harness.scope_id).has(&owner));

    assert!(harness.server.despawn_object(&key));
    assert!(!harness.server.despawn_object(&key), "already despawned");
    assert_eq!(harness.server.scopes().connection_scope(&owner), None);

    assert_eq!(
        harness.transfer.events(),
        vec![
            TransferEvent::SentTo(owner, harness.scope_id),
            TransferEvent::SentToLimbo(owner),
        ]
    );
}

/// An owned object cannot be given to another connection until its owner
/// is released
#[test]
fn reassigning_owner_requires_release() {
    let mut harness = Harness::new();
    let first = ConnectionId::new(7);
    let second = ConnectionId::new(8);
    let key = ObjectKey::new(1);
    harness.server.insert_object(key, Some(first));

    assert_eq!(
        harness.server.set_owner(&key, Some(second)),
        Err(OwnershipError::AlreadyOwned { key, owner: first })
    );
    assert_eq!(harness.server.object(&key).and_then(|o| o.owner()), Some(first));
    assert_eq!(harness.server.set_owner(&key, Some(first)), Ok(()));

    assert_eq!(harness.server.release_owner(&key), Some(first));
    assert_eq!(harness.server.set_owner(&key, Some(second)), Ok(()));

    let grid = ScriptedGrid::attached(0, 0, 0);
    harness.server.spawn_object(&key, harness.address(), &grid);
    harness.server.despawn_object(&key);
    assert_eq!(
        harness.transfer.events(),
        vec![
            TransferEvent::SentTo(second, harness.scope_id),
            TransferEvent::SentToLimbo(second),
        ]
    );
}

/// Passing no owner releases the object; unknown objects are refused
#[test]
fn set_owner_none_releases() {
    let mut harness = Harness::new();
    let key = ObjectKey::new(1);
    harness.server.insert_object(key, Some(ConnectionId::new(7)));

    assert_eq!(harness.server.set_owner(&key, None), Ok(()));
    assert_eq!(harness.server.object(&key).and_then(|o| o.owner()), None);
    assert_eq!(harness.server.release_owner(&key), None);
    assert_eq!(
        harness.server.set_owner(&key, Some(ConnectionId::new(8))),
        Ok(())
    );

    let missing = ObjectKey::new(99);
    assert_eq!(
        harness.server.set_owner(&missing, Some(ConnectionId::new(8))),
        Err(OwnershipError::UnknownObject { key: missing })
    );
}

/// Spawning into a scope that does not exist is refused
#[test]
fn spawn_into_unknown_scope_fails() {
    let mut harness = Harness::new();
    let key = ObjectKey::new(1);
    harness.server.insert_object(key, Some(ConnectionId::new(7)));

    let address = ObjectAddress {
        scope_id: harness.scope_id + 100,
        object_id: OBJECT_ID,
    };
    assert!(!harness
        .server
        .spawn_object(&key, address, &ScriptedGrid::new()));
    assert!(harness.transfer.events().is_empty());
}

struct Nameplate(u32);

impl SnapshotProvider for Nameplate {
    type Full = u32;
    type Refresh = u32;

    fn full_data(&self, _: &ConnectionId) -> u32 {
        self.0
    }

    fn refresh_data(&self, _: &ConnectionId, context: &str) -> u32 {
        self.0 + context.len() as u32
    }
}

/// Snapshots wrap the tracked state around the game data, flagged per
/// connection for owned objects
#[test]
fn snapshots_carry_tracked_state() {
    let mut harness = Harness::new();
    let owner = ConnectionId::new(7);
    let key = ObjectKey::new(1);
    let mut grid = ScriptedGrid::attached(0, 3, 3);
    grid.set_speed(2);
    harness.server.insert_object(key, Some(owner));
    harness.server.spawn_object(&key, harness.address(), &grid);

    let provider = OwnedSnapshot::new(Nameplate(40), Some(owner));
    let own = harness
        .server
        .full_data(&key, &provider, &owner)
        .expect("tracked");
    let other = harness
        .server
        .full_data(&key, &provider, &ConnectionId::new(8))
        .expect("tracked");
    let refresh = harness
        .server
        .refresh_data(&key, &Nameplate(40), &owner, "ab")
        .expect("tracked");

    assert!(own.data.owned);
    assert!(!other.data.owned);
    assert_eq!(own.data.data, 40);
    assert_eq!(own.speed, 2);
    assert_eq!(
        own.status.map(|status| status.attachment.position),
        Some(Position::new(3, 3))
    );
    assert_eq!(refresh.data, 42);
}

/// Disconnecting removes a connection from its scope
#[test]
fn disconnect_leaves_scope() {
    let mut harness = Harness::new();
    let _receiver = harness.join(1);
    assert_eq!(harness.server.scope_connections(harness.scope_id).count(), 1);

    harness.server.disconnect(&ConnectionId::new(1));

    assert_eq!(harness.server.scope_connections(harness.scope_id).count(), 0);
}

/// Excluding a connection from its scope leaves it in limbo
#[test]
fn exclude_sends_connection_to_limbo() {
    let mut harness = Harness::new();
    let connection = ConnectionId::new(1);
    harness
        .server
        .scope_connections_mut(harness.scope_id)
        .include(connection);
    assert_eq!(
        harness.server.scopes().connection_scope(&connection),
        Some(harness.scope_id)
    );

    harness
        .server
        .scope_connections_mut(harness.scope_id)
        .exclude(&connection);

    assert_eq!(harness.server.scopes().connection_scope(&connection), None);
    assert_eq!(harness.server.scope_connections(harness.scope_id).count(), 0);
}

/// Clearing a scope leaves every former observer in limbo
#[test]
fn clear_sends_observers_to_limbo() {
    let mut harness = Harness::new();
    let _first = harness.join(1);
    let _second = harness.join(2);

    harness
        .server
        .scope_connections_mut(harness.scope_id)
        .clear();

    assert_eq!(harness.server.scope_connections(harness.scope_id).count(), 0);
    for connection in [ConnectionId::new(1), ConnectionId::new(2)] {
        assert_eq!(harness.server.scopes().connection_scope(&connection), None);
    }
}
