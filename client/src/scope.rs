use std::collections::HashMap;

use tilesync_shared::{
    GridObject, MapBounds, MapIndex, ObjectEvent, ObjectId, ObjectMessage, ScopeId, SyncError,
};

use crate::ClientObject;

/// Capability of a scope object that takes part in movement
/// synchronization
pub trait SyncedObject {
    /// Index of the map the object is attached to, if any
    fn map_index(&self) -> Option<MapIndex>;

    fn on_spawned(&mut self, lag_tolerance: u16);

    fn on_despawned(&mut self);

    fn apply_event(&mut self, event: ObjectEvent);
}

/// Anything the client tracks inside a scope
pub trait ScopeObject {
    /// The synchronization capability of this object, if it has one
    fn as_synced(&mut self) -> Option<&mut dyn SyncedObject>;
}

impl<G: GridObject> SyncedObject for ClientObject<G> {
    fn map_index(&self) -> Option<MapIndex> {
        self.grid().map_index()
    }

    fn on_spawned(&mut self, lag_tolerance: u16) {
        ClientObject::on_spawned(self, lag_tolerance)
    }

    fn on_despawned(&mut self) {
        ClientObject::on_despawned(self)
    }

    fn apply_event(&mut self, event: ObjectEvent) {
        ClientObject::apply_event(self, event)
    }
}

impl<G: GridObject> ScopeObject for ClientObject<G> {
    fn as_synced(&mut self) -> Option<&mut dyn SyncedObject> {
        Some(self)
    }
}

/// The scope the client currently observes, with its maps and objects
pub struct ClientScope<O: ScopeObject> {
    id: ScopeId,
    synchronized: bool,
    maps: Vec<MapBounds>,
    objects: HashMap<ObjectId, O>,
}

impl<O: ScopeObject> ClientScope<O> {
    /// A scope whose objects move on the given maps
    pub fn synchronized(id: ScopeId, maps: Vec<MapBounds>) -> Self {
        Self {
            id,
            synchronized: true,
            maps,
            objects: HashMap::new(),
        }
    }

    /// A scope without movement synchronization. Object messages addressed
    /// to it are rejected.
    pub fn unsynchronized(id: ScopeId) -> Self {
        Self {
            id,
            synchronized: false,
            maps: Vec::new(),
            objects: HashMap::new(),
        }
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn is_synchronized(&self) -> bool {
        self.synchronized
    }

    pub fn map(&self, index: MapIndex) -> Option<&MapBounds> {
        self.maps.get(index as usize)
    }

    pub fn insert_object(&mut self, object_id: ObjectId, object: O) -> Option<O> {
        self.objects.insert(object_id, object)
    }

    pub fn remove_object(&mut self, object_id: &ObjectId) -> Option<O> {
        self.objects.remove(object_id)
    }

    pub fn object(&self, object_id: &ObjectId) -> Option<&O> {
        self.objects.get(object_id)
    }

    pub fn object_mut(&mut self, object_id: &ObjectId) -> Option<&mut O> {
        self.objects.get_mut(object_id)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Validates a message against this scope and hands it to its object
    pub(crate) fn dispatch(&mut self, message: ObjectMessage) -> Result<(), SyncError> {
        let scope_id = self.id;
        let object_id = message.object_id;

        if !self.synchronized {
            return Err(SyncError::ScopeIsNotSynchronized { scope_id });
        }
        let Some(object) = self.objects.get_mut(&object_id) else {
            return Err(SyncError::UnknownObject {
                scope_id,
                object_id,
            });
        };
        let Some(synced) = object.as_synced() else {
            return Err(SyncError::ObjectIsNotSynchronized { object_id });
        };

        let bounds = match message.event {
            ObjectEvent::Attached(attachment) => Some(
                self.maps
                    .get(attachment.map_index as usize)
                    .ok_or(SyncError::UnknownMap {
                        scope_id,
                        map_index: attachment.map_index,
                    })?,
            ),
            ObjectEvent::MovementStarted(_)
            | ObjectEvent::MovementCancelled(_)
            | ObjectEvent::MovementRejected(_)
            | ObjectEvent::MovementFinished(_)
            | ObjectEvent::Teleported(_) => {
                let map = synced
                    .map_index()
                    .and_then(|map_index| self.maps.get(map_index as usize));
                Some(map.ok_or(SyncError::ObjectNotInMap { object_id })?)
            }
            ObjectEvent::Detached
            | ObjectEvent::SpeedChanged(_)
            | ObjectEvent::OrientationChanged(_) => None,
        };

        if let (Some(bounds), Some(position)) = (bounds, message.event.position()) {
            if !bounds.contains(&position) {
                return Err(SyncError::ObjectPositionOutOfBounds {
                    object_id,
                    x: position.x,
                    y: position.y,
                    width: bounds.width,
                    height: bounds.height,
                });
            }
        }

        synced.apply_event(message.event);
        Ok(())
    }
}
