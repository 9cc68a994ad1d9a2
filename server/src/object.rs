use tilesync_shared::{
    ConnectionId, Direction, GridObject, MapObjectModel, ObjectId, OwnedModel, ScopeId, Serde,
    Speed, Status,
};

/// Key of a synchronized object on the server
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct ObjectKey(u64);

impl ObjectKey {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

/// Where a spawned object lives on the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectAddress {
    pub scope_id: ScopeId,
    pub object_id: ObjectId,
}

/// Server-side synchronization record of one object.
///
/// Holds the last status the main context applied, which is what
/// snapshots report, rather than the grid engine's live state.
pub struct ServerObject {
    address: Option<ObjectAddress>,
    current_status: Option<Status>,
    orientation: Direction,
    speed: Speed,
    owner: Option<ConnectionId>,
}

impl ServerObject {
    pub(crate) fn new(owner: Option<ConnectionId>) -> Self {
        Self {
            address: None,
            current_status: None,
            orientation: Direction::default(),
            speed: 0,
            owner,
        }
    }

    pub fn address(&self) -> Option<ObjectAddress> {
        self.address
    }

    pub fn is_spawned(&self) -> bool {
        self.address.is_some()
    }

    pub fn current_status(&self) -> Option<Status> {
        self.current_status
    }

    pub fn orientation(&self) -> Direction {
        self.orientation
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn owner(&self) -> Option<ConnectionId> {
        self.owner
    }

    /// Gives the object to `owner`. Fails with the current owner if another
    /// connection holds it.
    pub(crate) fn assign_owner(&mut self, owner: ConnectionId) -> Result<(), ConnectionId> {
        match self.owner {
            Some(current) if current != owner => Err(current),
            _ => {
                self.owner = Some(owner);
                Ok(())
            }
        }
    }

    /// Clears the owner, returning the one released
    pub(crate) fn release_owner(&mut self) -> Option<ConnectionId> {
        self.owner.take()
    }

    pub(crate) fn spawn(&mut self, address: ObjectAddress, grid: &dyn GridObject) {
        self.address = Some(address);
        self.current_status = grid.status();
        self.orientation = grid.orientation();
        self.speed = grid.speed();
    }

    pub(crate) fn despawn(&mut self) {
        self.address = None;
        self.current_status = None;
    }

    pub(crate) fn set_current_status(&mut self, status: Option<Status>) {
        self.current_status = status;
    }

    pub(crate) fn set_orientation(&mut self, orientation: Direction) {
        self.orientation = orientation;
    }

    pub(crate) fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
    }

    pub(crate) fn wrap<D: Serde>(&self, data: D) -> MapObjectModel<D> {
        MapObjectModel::new(self.current_status, self.orientation, self.speed, data)
    }
}

/// Produces the game-specific part of an object's snapshots
pub trait SnapshotProvider {
    type Full: Serde;
    type Refresh: Serde;

    /// Data sent to `connection_id` when the object spawns for it
    fn full_data(&self, connection_id: &ConnectionId) -> Self::Full;

    /// Data sent to `connection_id` when the object is refreshed
    fn refresh_data(&self, connection_id: &ConnectionId, context: &str) -> Self::Refresh;
}

/// Wraps a provider so that full snapshots also tell each connection
/// whether it owns the object.
pub struct OwnedSnapshot<P: SnapshotProvider> {
    inner: P,
    owner: Option<ConnectionId>,
}

impl<P: SnapshotProvider> OwnedSnapshot<P> {
    pub fn new(inner: P, owner: Option<ConnectionId>) -> Self {
        Self { inner, owner }
    }
}

impl<P: SnapshotProvider> SnapshotProvider for OwnedSnapshot<P> {
    type Full = OwnedModel<P::Full>;
    type Refresh = P::Refresh;

    fn full_data(&self, connection_id: &ConnectionId) -> Self::Full {
        let data = self.inner.full_data(connection_id);
        if self.owner.as_ref() == Some(connection_id) {
            OwnedModel::as_owned(data)
        } else {
            OwnedModel::as_not_owned(data)
        }
    }

    fn refresh_data(&self, connection_id: &ConnectionId, context: &str) -> Self::Refresh {
        self.inner.refresh_data(connection_id, context)
    }
}
