use tilesync_shared::{Direction, GridObject, Position, Speed};

/// A server-reported change waiting to be replayed on the local object
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueuedCommand {
    MovementStart { start: Position, direction: Direction },
    MovementCancel { revert: Position },
    MovementFinish { end: Position },
    SpeedChange(Speed),
    OrientationChange(Direction),
}

impl QueuedCommand {
    /// Starts and finishes wait for the local object to be free to move,
    /// unless `force` is set. Everything else runs right away.
    pub fn can_execute(&self, force: bool) -> bool {
        match self {
            QueuedCommand::MovementStart { .. } | QueuedCommand::MovementFinish { .. } => force,
            QueuedCommand::MovementCancel { .. }
            | QueuedCommand::SpeedChange(_)
            | QueuedCommand::OrientationChange(_) => true,
        }
    }

    pub fn is_movement_start(&self) -> bool {
        matches!(self, QueuedCommand::MovementStart { .. })
    }

    pub fn is_movement_finish(&self) -> bool {
        matches!(self, QueuedCommand::MovementFinish { .. })
    }

    pub fn execute(&self, grid: &mut dyn GridObject) {
        match *self {
            QueuedCommand::MovementStart { start, direction } => {
                // only reached while moving when forced
                if grid.is_moving() {
                    grid.cancel_movement();
                }
                snap(grid, start);
                grid.set_orientation(direction);
                grid.start_movement(direction, false, false);
            }
            QueuedCommand::MovementCancel { revert } => {
                grid.cancel_movement();
                snap(grid, revert);
            }
            QueuedCommand::MovementFinish { end } => {
                grid.finish_movement();
                snap(grid, end);
            }
            QueuedCommand::SpeedChange(speed) => grid.set_speed(speed),
            QueuedCommand::OrientationChange(orientation) => grid.set_orientation(orientation),
        }
    }
}

fn snap(grid: &mut dyn GridObject, position: Position) {
    if grid.position() != position {
        grid.teleport(position);
    }
}
