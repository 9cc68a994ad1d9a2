use std::collections::HashMap;

use log::{debug, warn};

use tilesync_shared::{ConnectionId, GridObject, MapObjectModel, ScopeId};

use crate::{
    broadcaster::{BroadcastReport, ScopeBroadcaster},
    notification::{notification_channel, GridEvent, GridNotification, NotificationReceiver, NotificationSender},
    object::{ObjectAddress, ObjectKey, ServerObject, SnapshotProvider},
    scope::{ScopeConnectionsMut, ScopeConnectionsRef, ScopeRegistry, ScopeTransfer},
    transport::ConnectionSender,
    OwnershipError, ServerConfig,
};

/// Main-context owner of every piece of shared server state: scopes,
/// object records and the broadcaster.
///
/// Grid engines report changes through [`notifier`](SyncServer::notifier)
/// from any thread; nothing reaches a scope until
/// [`process_notifications`](SyncServer::process_notifications) runs.
pub struct SyncServer {
    config: ServerConfig,
    scopes: ScopeRegistry,
    broadcaster: ScopeBroadcaster,
    objects: HashMap<ObjectKey, ServerObject>,
    transfer: Box<dyn ScopeTransfer>,
    notification_sender: NotificationSender,
    notification_receiver: NotificationReceiver,
}

impl SyncServer {
    pub fn new(
        config: ServerConfig,
        sender: Box<dyn ConnectionSender>,
        transfer: Box<dyn ScopeTransfer>,
    ) -> Self {
        let (notification_sender, notification_receiver) = notification_channel();
        Self {
            config,
            scopes: ScopeRegistry::new(),
            broadcaster: ScopeBroadcaster::new(sender),
            objects: HashMap::new(),
            transfer,
            notification_sender,
            notification_receiver,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Handle for grid engines to report changes with
    pub fn notifier(&self) -> NotificationSender {
        self.notification_sender.clone()
    }

    pub fn broadcaster(&self) -> &ScopeBroadcaster {
        &self.broadcaster
    }

    //// Scopes

    pub fn scopes(&self) -> &ScopeRegistry {
        &self.scopes
    }

    pub fn scopes_mut(&mut self) -> &mut ScopeRegistry {
        &mut self.scopes
    }

    pub fn scope_connections(&self, scope_id: ScopeId) -> ScopeConnectionsRef<'_> {
        ScopeConnectionsRef::new(&self.scopes, scope_id)
    }

    pub fn scope_connections_mut(&mut self, scope_id: ScopeId) -> ScopeConnectionsMut<'_> {
        ScopeConnectionsMut::new(&mut self.scopes, scope_id)
    }

    /// Forgets a connection that left the server
    pub fn disconnect(&mut self, connection_id: &ConnectionId) {
        self.scopes.remove_connection(connection_id);
    }

    //// Objects

    /// Starts tracking an object. Returns false if the key is taken.
    pub fn insert_object(&mut self, key: ObjectKey, owner: Option<ConnectionId>) -> bool {
        if self.objects.contains_key(&key) {
            warn!("object: {:?} is already tracked", key);
            return false;
        }
        self.objects.insert(key, ServerObject::new(owner));
        true
    }

    /// Stops tracking an object, despawning it first if needed
    pub fn remove_object(&mut self, key: &ObjectKey) -> Option<ServerObject> {
        self.despawn_object(key);
        self.objects.remove(key)
    }

    pub fn object(&self, key: &ObjectKey) -> Option<&ServerObject> {
        self.objects.get(key)
    }

    /// Gives an object to `owner`, or releases it when `None`. An owned
    /// object must be released before another connection can own it.
    pub fn set_owner(
        &mut self,
        key: &ObjectKey,
        owner: Option<ConnectionId>,
    ) -> Result<(), OwnershipError> {
        let Some(object) = self.objects.get_mut(key) else {
            return Err(OwnershipError::UnknownObject { key: *key });
        };
        let Some(owner) = owner else {
            object.release_owner();
            return Ok(());
        };
        object
            .assign_owner(owner)
            .map_err(|current| OwnershipError::AlreadyOwned {
                key: *key,
                owner: current,
            })
    }

    /// Releases the owner of an object, returning the connection released
    pub fn release_owner(&mut self, key: &ObjectKey) -> Option<ConnectionId> {
        let released = self.objects.get_mut(key)?.release_owner();
        if let Some(owner) = released {
            debug!("object: {:?} released by connection: {}", key, owner);
        }
        released
    }

    /// Marks an object as spawned at `address` and captures its current
    /// state. If the object has an owner, the owner is sent to the scope.
    pub fn spawn_object(
        &mut self,
        key: &ObjectKey,
        address: ObjectAddress,
        grid: &dyn GridObject,
    ) -> bool {
        let Some(object) = self.objects.get_mut(key) else {
            warn!("object: {:?} does not exist", key);
            return false;
        };
        if self.scopes.scope(address.scope_id).is_none() {
            warn!("scope: {} does not exist, object: {:?} not spawned", address.scope_id, key);
            return false;
        }
        object.spawn(address, grid);

        if let Some(owner) = object.owner() {
            self.scopes.move_connection(owner, Some(address.scope_id));
            self.transfer.send_to(&owner, address.scope_id);
        }
        true
    }

    /// Marks an object as no longer spawned. Its owner, if any, is sent to
    /// limbo first.
    pub fn despawn_object(&mut self, key: &ObjectKey) -> bool {
        let Some(object) = self.objects.get_mut(key) else {
            return false;
        };
        if !object.is_spawned() {
            return false;
        }

        if let Some(owner) = object.owner() {
            self.transfer.send_to_limbo(&owner);
            self.scopes.move_connection(owner, None);
        }
        object.despawn();
        true
    }

    //// Notifications

    /// Applies every queued grid notification, in arrival order. Returns how
    /// many were broadcast.
    pub fn process_notifications(&mut self) -> usize {
        let mut broadcast = 0;
        while let Some(notification) = self.notification_receiver.try_recv() {
            if self.apply_notification(notification).is_some() {
                broadcast += 1;
            }
        }
        broadcast
    }

    /// Applies one notification and broadcasts it to the object's scope.
    ///
    /// Returns `None` when the notification was dropped: unknown or
    /// unspawned object, or an attachment outside of the object's scope.
    pub fn apply_notification(&mut self, notification: GridNotification) -> Option<BroadcastReport> {
        let Some(object) = self.objects.get_mut(&notification.object) else {
            warn!("object: {:?} does not exist", notification.object);
            return None;
        };
        let Some(address) = object.address() else {
            warn!(
                "object: {:?} is not spawned, {:?} dropped",
                notification.object, notification.event
            );
            return None;
        };

        if notification.event.changes_status() {
            object.set_current_status(notification.status);
        }
        match notification.event {
            GridEvent::SpeedChanged(speed) => object.set_speed(speed),
            GridEvent::OrientationChanged(orientation) => object.set_orientation(orientation),
            _ => {}
        }

        let Some(scope) = self.scopes.scope(address.scope_id) else {
            warn!("scope: {} of object: {:?} does not exist", address.scope_id, notification.object);
            return None;
        };
        let object_id = address.object_id;
        let position = notification.position;

        let report = match notification.event {
            GridEvent::Attached => {
                let Some(status) = notification.status else {
                    warn!(
                        "object: {:?} attached to a map outside of scope: {}",
                        notification.object, address.scope_id
                    );
                    return None;
                };
                self.broadcaster.broadcast_attached(
                    scope,
                    object_id,
                    status.attachment.map_index,
                    status.attachment.position,
                )
            }
            GridEvent::Detached => self.broadcaster.broadcast_detached(scope, object_id),
            GridEvent::MovementStarted(direction) => self
                .broadcaster
                .broadcast_movement_started(scope, object_id, position, direction),
            GridEvent::MovementCancelled => self
                .broadcaster
                .broadcast_movement_cancelled(scope, object_id, position),
            GridEvent::MovementFinished => self
                .broadcaster
                .broadcast_movement_finished(scope, object_id, position),
            GridEvent::Teleported => self
                .broadcaster
                .broadcast_teleported(scope, object_id, position),
            GridEvent::SpeedChanged(speed) => self
                .broadcaster
                .broadcast_speed_changed(scope, object_id, speed),
            GridEvent::OrientationChanged(orientation) => self
                .broadcaster
                .broadcast_orientation_changed(scope, object_id, orientation),
        };

        debug!(
            "{:?} of object: {:?} sent to {} connection(s), {} failed",
            notification.event,
            notification.object,
            report.delivered.len(),
            report.failed.len()
        );
        Some(report)
    }

    //// Snapshots

    /// Full snapshot of an object, as sent to `connection_id` on spawn
    pub fn full_data<P: SnapshotProvider>(
        &self,
        key: &ObjectKey,
        provider: &P,
        connection_id: &ConnectionId,
    ) -> Option<MapObjectModel<P::Full>> {
        let object = self.objects.get(key)?;
        Some(object.wrap(provider.full_data(connection_id)))
    }

    /// Refresh snapshot of an object, as sent to `connection_id` on resync
    pub fn refresh_data<P: SnapshotProvider>(
        &self,
        key: &ObjectKey,
        provider: &P,
        connection_id: &ConnectionId,
        context: &str,
    ) -> Option<MapObjectModel<P::Refresh>> {
        let object = self.objects.get(key)?;
        Some(object.wrap(provider.refresh_data(connection_id, context)))
    }
}
