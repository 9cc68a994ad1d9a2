use log::{debug, warn};

use tilesync_shared::{
    Direction, GridObject, MapIndex, MapObjectModel, MovementStart, ObjectEvent, OwnedModel,
    Position, Serde, Speed,
};

use crate::queue::{CommandQueue, DrainOutcome, QueuedCommand};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectState {
    Despawned,
    Spawned,
}

/// Client-side replica of a synchronized grid object.
///
/// Attach, detach and teleport are applied at once and discard whatever
/// is queued. Everything else goes through the [`CommandQueue`].
pub struct ClientObject<G: GridObject> {
    grid: G,
    state: ObjectState,
    lag_tolerance: u16,
    queue: CommandQueue,
    owned: bool,
    optimistic: bool,
}

impl<G: GridObject> ClientObject<G> {
    pub fn new(grid: G) -> Self {
        Self {
            grid,
            state: ObjectState::Despawned,
            lag_tolerance: 0,
            queue: CommandQueue::new(),
            owned: false,
            optimistic: false,
        }
    }

    /// Marks this object as predicting its own movement when owned
    pub fn optimistic(mut self) -> Self {
        self.optimistic = true;
        self
    }

    pub fn grid(&self) -> &G {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut G {
        &mut self.grid
    }

    pub fn state(&self) -> ObjectState {
        self.state
    }

    pub fn is_spawned(&self) -> bool {
        self.state == ObjectState::Spawned
    }

    pub fn lag_tolerance(&self) -> u16 {
        self.lag_tolerance
    }

    pub fn pending_commands(&self) -> usize {
        self.queue.len()
    }

    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    pub fn is_owned(&self) -> bool {
        self.owned
    }

    pub fn set_owned(&mut self, owned: bool) {
        self.owned = owned;
    }

    pub fn is_optimistic(&self) -> bool {
        self.optimistic
    }

    fn predicts_locally(&self) -> bool {
        self.optimistic && self.owned
    }

    //// Lifecycle

    pub fn on_spawned(&mut self, lag_tolerance: u16) {
        self.lag_tolerance = lag_tolerance;
        self.state = ObjectState::Spawned;
    }

    pub fn on_despawned(&mut self) {
        self.lag_tolerance = 0;
        self.state = ObjectState::Despawned;
        self.queue.clear();
    }

    /// Applies a full snapshot, received when the object spawns
    pub fn inflate_from<D: Serde>(&mut self, model: MapObjectModel<D>) -> D {
        self.inflate(model, false)
    }

    /// Applies a refresh snapshot. Anything still queued is discarded.
    pub fn update_from<D: Serde>(&mut self, model: MapObjectModel<D>) -> D {
        self.inflate(model, true)
    }

    /// Applies a full snapshot that also says whether this client owns the
    /// object
    pub fn inflate_owned_from<D: Serde>(&mut self, model: MapObjectModel<OwnedModel<D>>) -> D {
        let owned = self.inflate(model, false);
        self.owned = owned.owned;
        owned.data
    }

    fn inflate<D: Serde>(&mut self, model: MapObjectModel<D>, refresh: bool) -> D {
        self.grid.set_orientation(model.orientation);
        self.grid.set_speed(model.speed);
        if let Some(status) = model.status {
            if refresh {
                self.queue.clear();
            }
            let position = status.attachment.position;
            self.grid.attach(status.attachment.map_index, position);
            if let Some(direction) = status.movement {
                self.queue.enqueue(
                    QueuedCommand::MovementStart {
                        start: position,
                        direction,
                    },
                    self.lag_tolerance,
                    &mut self.grid,
                );
            }
        }
        model.data
    }

    //// Immediate events

    pub fn on_attached(&mut self, map_index: MapIndex, position: Position) {
        if !self.is_spawned() {
            return;
        }
        self.interrupt();
        self.grid.attach(map_index, position);
    }

    pub fn on_detached(&mut self) {
        if !self.is_spawned() {
            return;
        }
        self.interrupt();
        self.grid.detach();
    }

    pub fn on_teleported(&mut self, position: Position) {
        if !self.is_spawned() {
            return;
        }
        self.interrupt();
        self.grid.teleport(position);
    }

    fn interrupt(&mut self) {
        self.queue.clear();
        if self.grid.is_moving() {
            self.grid.cancel_movement();
        }
    }

    //// Queued events

    pub fn on_movement_started(&mut self, start: Position, direction: Direction) -> Option<DrainOutcome> {
        if self.predicts_locally() {
            debug!("movement start suppressed for locally predicted object");
            return None;
        }
        self.queue_command(QueuedCommand::MovementStart { start, direction })
    }

    pub fn on_movement_cancelled(&mut self, revert: Position) -> Option<DrainOutcome> {
        self.queue_command(QueuedCommand::MovementCancel { revert })
    }

    pub fn on_movement_finished(&mut self, end: Position) -> Option<DrainOutcome> {
        if self.predicts_locally() {
            debug!("movement finish suppressed for locally predicted object");
            return None;
        }
        self.queue_command(QueuedCommand::MovementFinish { end })
    }

    pub fn on_speed_changed(&mut self, speed: Speed) -> Option<DrainOutcome> {
        self.queue_command(QueuedCommand::SpeedChange(speed))
    }

    pub fn on_orientation_changed(&mut self, orientation: Direction) -> Option<DrainOutcome> {
        self.queue_command(QueuedCommand::OrientationChange(orientation))
    }

    /// The server refused a movement this client predicted. Snaps the
    /// object back to where the server has it.
    pub fn on_movement_rejected(&mut self, position: Position) {
        if !self.is_spawned() || !self.predicts_locally() {
            return;
        }
        if self.grid.is_moving() {
            self.grid.cancel_movement();
        }
        self.grid.teleport(position);
    }

    fn queue_command(&mut self, command: QueuedCommand) -> Option<DrainOutcome> {
        if !self.is_spawned() {
            return None;
        }
        Some(self.queue.enqueue(command, self.lag_tolerance, &mut self.grid))
    }

    //// Local notifications

    /// The local object finished animating a movement
    pub fn on_local_movement_finished(&mut self) -> Option<DrainOutcome> {
        self.resume()
    }

    /// The local object's movement was cancelled
    pub fn on_local_movement_cancelled(&mut self) -> Option<DrainOutcome> {
        self.resume()
    }

    fn resume(&mut self) -> Option<DrainOutcome> {
        if !self.is_spawned() || self.queue.is_running() {
            return None;
        }
        Some(self.queue.drain(false, &mut self.grid))
    }

    //// Dispatch

    /// Routes a validated wire event to the matching handler
    pub fn apply_event(&mut self, event: ObjectEvent) {
        if !self.is_spawned() {
            warn!("{} ignored by despawned object", event.name());
            return;
        }
        match event {
            ObjectEvent::Attached(attachment) => {
                self.on_attached(attachment.map_index, attachment.position)
            }
            ObjectEvent::Detached => self.on_detached(),
            ObjectEvent::MovementStarted(MovementStart {
                position,
                direction,
            }) => {
                self.on_movement_started(position, direction);
            }
            ObjectEvent::MovementCancelled(position) => {
                self.on_movement_cancelled(position);
            }
            ObjectEvent::MovementRejected(position) => self.on_movement_rejected(position),
            ObjectEvent::MovementFinished(position) => {
                self.on_movement_finished(position);
            }
            ObjectEvent::Teleported(position) => self.on_teleported(position),
            ObjectEvent::SpeedChanged(speed) => {
                self.on_speed_changed(speed);
            }
            ObjectEvent::OrientationChanged(orientation) => {
                self.on_orientation_changed(orientation);
            }
        }
    }
}
