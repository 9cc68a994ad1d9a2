//! # `CommandQueue` – lag-tolerant replay of server movement
//!
//! Commands are replayed strictly in arrival order. A drain pass runs the
//! head while it can execute and stops at the first one that cannot:
//!
//! ```text
//!             enqueue(cmd)
//!                  │
//!      full = len >= lag_tolerance      (measured before the push)
//!                  │
//!                  ▼
//!  ┌──────────── drain(accelerated = full) ─────────────┐
//!  │ free = !moving                                     │
//!  │ while head.can_execute(free || accelerated):       │
//!  │     execute head                                   │
//!  │     Start          ─► free = false                 │
//!  │     Finish         ─► free = !moving               │
//!  └────────────────────────────────────────────────────┘
//! ```
//!
//! A normal pass therefore starts at most one movement: once a start ran,
//! the object is moving and the next finish (and the start after it) wait
//! for the local animation to end, which triggers another pass. A cancel
//! does not free the object for the rest of the pass. A finish that runs
//! leaves the object idle, so a start right behind it chains in the same
//! pass.

use std::collections::VecDeque;

use log::trace;

use tilesync_shared::GridObject;

use super::QueuedCommand;

/// What a drain pass did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrainOutcome {
    pub accelerated: bool,
    pub executed: usize,
    pub starts: usize,
}

#[derive(Default)]
pub struct CommandQueue {
    commands: VecDeque<QueuedCommand>,
    running: bool,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueuedCommand> {
        self.commands.iter()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Appends a command and drains, accelerated if `lag_tolerance`
    /// commands were already pending.
    pub fn enqueue(
        &mut self,
        command: QueuedCommand,
        lag_tolerance: u16,
        grid: &mut dyn GridObject,
    ) -> DrainOutcome {
        let full = self.commands.len() >= usize::from(lag_tolerance);
        self.commands.push_back(command);
        self.drain(full, grid)
    }

    /// Executes commands from the head while they can run. Does nothing if
    /// a drain is already in progress.
    pub fn drain(&mut self, accelerated: bool, grid: &mut dyn GridObject) -> DrainOutcome {
        let mut outcome = DrainOutcome {
            accelerated,
            ..DrainOutcome::default()
        };
        if self.running {
            return outcome;
        }
        self.running = true;

        let mut free_to_move = !grid.is_moving();
        while let Some(head) = self.commands.front() {
            if !head.can_execute(free_to_move || accelerated) {
                break;
            }
            let Some(command) = self.commands.pop_front() else {
                break;
            };
            command.execute(grid);
            outcome.executed += 1;

            if command.is_movement_start() {
                outcome.starts += 1;
                free_to_move = false;
            } else if command.is_movement_finish() {
                free_to_move = !grid.is_moving();
            }
        }

        self.running = false;
        trace!(
            "drained {} command(s), accelerated: {}, {} pending",
            outcome.executed,
            accelerated,
            self.commands.len()
        );
        outcome
    }
}
