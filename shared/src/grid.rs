use crate::{Attachment, Direction, MapIndex, Position, Speed, Status};

/// Boundary to the grid engine that simulates an object's movement.
///
/// Both ends drive the same engine: the server reads it to capture the
/// authoritative [`Status`], and the client replays queued commands against
/// it. Implementations report the engine's *current* state; nothing here
/// is cached.
pub trait GridObject {
    /// Index of the parent map within the object's scope, or `None` when the
    /// object is detached or its map is not indexed in the scope.
    fn map_index(&self) -> Option<MapIndex>;

    fn position(&self) -> Position;

    /// Direction of the movement in progress, if any
    fn movement(&self) -> Option<Direction>;

    fn is_moving(&self) -> bool {
        self.movement().is_some()
    }

    fn orientation(&self) -> Direction;

    fn set_orientation(&mut self, orientation: Direction);

    fn speed(&self) -> Speed;

    fn set_speed(&mut self, speed: Speed);

    fn attach(&mut self, map_index: MapIndex, position: Position);

    fn detach(&mut self);

    fn teleport(&mut self, position: Position);

    /// Starts (or, with `continued`, chains) a movement. `queue` lets the
    /// engine buffer the request behind a movement in progress. Returns
    /// `false` if the engine refused the movement.
    fn start_movement(&mut self, direction: Direction, continued: bool, queue: bool) -> bool;

    fn cancel_movement(&mut self) -> bool;

    fn finish_movement(&mut self) -> bool;

    /// Snapshot of the current placement and motion
    fn status(&self) -> Option<Status> {
        self.map_index().map(|map_index| {
            Status::new(
                Attachment::new(map_index, self.position()),
                self.movement(),
            )
        })
    }
}
