use tilesync_server::{ObjectAddress, Prefab, PrincipalObject, PrincipalSpawner};
use tilesync_shared::{ConnectionId, Direction, GridObject, MapIndex, Position, ScopeId, Speed};

use super::ScriptedGrid;

pub struct TestPrincipal {
    pub grid: ScriptedGrid,
    pub prefab: Prefab,
    owner: Option<ConnectionId>,
    address: Option<ObjectAddress>,
    optimistic: bool,
}

impl TestPrincipal {
    pub fn new(prefab: Prefab) -> Self {
        Self {
            grid: ScriptedGrid::new(),
            prefab,
            owner: None,
            address: None,
            optimistic: false,
        }
    }

    pub fn set_address(&mut self, address: Option<ObjectAddress>) {
        self.address = address;
    }
}

impl GridObject for TestPrincipal {
    fn map_index(&self) -> Option<MapIndex> {
        self.grid.map_index()
    }

    fn position(&self) -> Position {
        self.grid.position()
    }

    fn movement(&self) -> Option<Direction> {
        self.grid.movement()
    }

    fn orientation(&self) -> Direction {
        self.grid.orientation()
    }

    fn set_orientation(&mut self, orientation: Direction) {
        self.grid.set_orientation(orientation)
    }

    fn speed(&self) -> Speed {
        self.grid.speed()
    }

    fn set_speed(&mut self, speed: Speed) {
        self.grid.set_speed(speed)
    }

    fn attach(&mut self, map_index: MapIndex, position: Position) {
        self.grid.attach(map_index, position)
    }

    fn detach(&mut self) {
        self.grid.detach()
    }

    fn teleport(&mut self, position: Position) {
        self.grid.teleport(position)
    }

    fn start_movement(&mut self, direction: Direction, continued: bool, queue: bool) -> bool {
        self.grid.start_movement(direction, continued, queue)
    }

    fn cancel_movement(&mut self) -> bool {
        self.grid.cancel_movement()
    }

    fn finish_movement(&mut self) -> bool {
        self.grid.finish_movement()
    }
}

impl PrincipalObject for TestPrincipal {
    fn set_owner(&mut self, owner: ConnectionId) {
        self.owner = Some(owner);
    }

    fn owner(&self) -> Option<ConnectionId> {
        self.owner
    }

    fn address(&self) -> Option<ObjectAddress> {
        self.address
    }

    fn is_optimistic(&self) -> bool {
        self.optimistic
    }
}

/// Hands out [`TestPrincipal`]s and remembers what it spawned and destroyed
#[derive(Default)]
pub struct TestSpawner {
    pub spawned: Vec<Prefab>,
    pub destroyed: Vec<Option<ConnectionId>>,
    broken: bool,
    optimistic: bool,
    blocked: bool,
    scope_id: Option<ScopeId>,
    next_object_id: u32,
}

impl TestSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawned principals are addressed inside `scope_id`
    pub fn in_scope(mut self, scope_id: ScopeId) -> Self {
        self.scope_id = Some(scope_id);
        self
    }

    /// Every spawn fails
    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }

    /// Spawned principals predict their own movement
    pub fn optimistic(mut self) -> Self {
        self.optimistic = true;
        self
    }

    /// Spawned principals cannot move
    pub fn blocked(mut self) -> Self {
        self.blocked = true;
        self
    }
}

impl PrincipalSpawner<TestPrincipal> for TestSpawner {
    fn spawn(&mut self, prefab: &Prefab) -> Option<TestPrincipal> {
        if self.broken {
            return None;
        }
        self.spawned.push(prefab.clone());

        let mut principal = TestPrincipal::new(prefab.clone());
        principal.optimistic = self.optimistic;
        if self.blocked {
            principal.grid = ScriptedGrid::new().refusing_movement();
        }
        if let Some(scope_id) = self.scope_id {
            self.next_object_id += 1;
            principal.set_address(Some(ObjectAddress {
                scope_id,
                object_id: self.next_object_id,
            }));
        }
        Some(principal)
    }

    fn destroy(&mut self, principal: TestPrincipal) {
        self.destroyed.push(principal.owner);
    }
}
