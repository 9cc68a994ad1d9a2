use log::warn;

use tilesync_shared::{
    write_message, Attachment, ConnectionId, Direction, MapIndex, MovementStart, ObjectEvent,
    ObjectId, ObjectMessage, Position, ScopeId, Speed,
};

use crate::{
    scope::SyncScope,
    transport::{ConnectionSender, SendError},
};

/// Outcome of one fan-out: who got the message and who did not
#[derive(Debug, Default)]
pub struct BroadcastReport {
    pub delivered: Vec<ConnectionId>,
    pub failed: Vec<(ConnectionId, SendError)>,
}

impl BroadcastReport {
    /// True when every recipient received the message
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn recipient_count(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }
}

/// Turns object events into addressed wire messages and delivers them,
/// either to every connection observing a scope or to a single connection.
///
/// Each call returns only after every per-connection send has settled. A
/// failed send is logged and recorded; it never stops the remaining ones.
pub struct ScopeBroadcaster {
    sender: Box<dyn ConnectionSender>,
}

impl ScopeBroadcaster {
    pub fn new(sender: Box<dyn ConnectionSender>) -> Self {
        Self { sender }
    }

    pub fn broadcast_attached(
        &self,
        scope: &SyncScope,
        object_id: ObjectId,
        map_index: MapIndex,
        position: Position,
    ) -> BroadcastReport {
        self.broadcast(
            scope,
            object_id,
            ObjectEvent::Attached(Attachment::new(map_index, position)),
        )
    }

    pub fn broadcast_detached(&self, scope: &SyncScope, object_id: ObjectId) -> BroadcastReport {
        self.broadcast(scope, object_id, ObjectEvent::Detached)
    }

    pub fn broadcast_movement_started(
        &self,
        scope: &SyncScope,
        object_id: ObjectId,
        position: Position,
        direction: Direction,
    ) -> BroadcastReport {
        self.broadcast(
            scope,
            object_id,
            ObjectEvent::MovementStarted(MovementStart::new(position, direction)),
        )
    }

    pub fn broadcast_movement_cancelled(
        &self,
        scope: &SyncScope,
        object_id: ObjectId,
        position: Position,
    ) -> BroadcastReport {
        self.broadcast(scope, object_id, ObjectEvent::MovementCancelled(position))
    }

    pub fn broadcast_movement_finished(
        &self,
        scope: &SyncScope,
        object_id: ObjectId,
        position: Position,
    ) -> BroadcastReport {
        self.broadcast(scope, object_id, ObjectEvent::MovementFinished(position))
    }

    pub fn broadcast_teleported(
        &self,
        scope: &SyncScope,
        object_id: ObjectId,
        position: Position,
    ) -> BroadcastReport {
        self.broadcast(scope, object_id, ObjectEvent::Teleported(position))
    }

    pub fn broadcast_speed_changed(
        &self,
        scope: &SyncScope,
        object_id: ObjectId,
        speed: Speed,
    ) -> BroadcastReport {
        self.broadcast(scope, object_id, ObjectEvent::SpeedChanged(speed))
    }

    pub fn broadcast_orientation_changed(
        &self,
        scope: &SyncScope,
        object_id: ObjectId,
        orientation: Direction,
    ) -> BroadcastReport {
        self.broadcast(scope, object_id, ObjectEvent::OrientationChanged(orientation))
    }

    /// Tells the owner of an object that its optimistic movement was refused
    /// and where the object actually stands.
    pub fn send_movement_rejected(
        &self,
        connection_id: &ConnectionId,
        scope_id: ScopeId,
        object_id: ObjectId,
        position: Position,
    ) -> Result<(), SendError> {
        let message = ObjectMessage::new(scope_id, object_id, ObjectEvent::MovementRejected(position));
        self.send(connection_id, &message)
    }

    /// Sends an event to every connection observing `scope`
    pub fn broadcast(
        &self,
        scope: &SyncScope,
        object_id: ObjectId,
        event: ObjectEvent,
    ) -> BroadcastReport {
        let message = ObjectMessage::new(scope.id(), object_id, event);
        let payload = write_message(&message);

        let mut report = BroadcastReport::default();
        for connection_id in scope.connections() {
            match self.sender.send(connection_id, &payload) {
                Ok(()) => report.delivered.push(*connection_id),
                Err(error) => {
                    warn!(
                        "{} for object: {} not delivered to connection: {}: {}",
                        event.name(),
                        object_id,
                        connection_id,
                        error
                    );
                    report.failed.push((*connection_id, error));
                }
            }
        }
        report
    }

    /// Sends a message to one connection
    pub fn send(&self, connection_id: &ConnectionId, message: &ObjectMessage) -> Result<(), SendError> {
        let payload = write_message(message);
        self.sender.send(connection_id, &payload).map_err(|error| {
            warn!(
                "{} for object: {} not delivered to connection: {}: {}",
                message.event.name(),
                message.object_id,
                connection_id,
                error
            );
            error
        })
    }
}
