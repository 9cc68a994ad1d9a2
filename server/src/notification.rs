//! # Grid notifications
//!
//! The grid engine reports changes on whatever thread it runs on. Those
//! reports must not touch scopes or connections directly, so each one is
//! captured into a [`GridNotification`] on the notifying thread and carried
//! over a channel to the single main context, which applies them in order
//! through [`SyncServer::process_notifications`](crate::SyncServer::process_notifications).
//!
//! ```text
//!  grid thread                         main context
//!  -----------                         ------------
//!  on change ─► capture(status, pos) ─► channel ─► drain ─► spawned? ─► update status ─► broadcast
//!                                                             │
//!                                                             └─ no ─► drop
//! ```

use log::warn;
use smol::channel::{self, Receiver, Sender};

use tilesync_shared::{Direction, GridObject, Position, Speed, Status};

use crate::ObjectKey;

/// What changed on the grid object
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridEvent {
    Attached,
    Detached,
    MovementStarted(Direction),
    MovementCancelled,
    MovementFinished,
    Teleported,
    SpeedChanged(Speed),
    OrientationChanged(Direction),
}

impl GridEvent {
    /// Whether the event can change the object's [`Status`]
    pub fn changes_status(&self) -> bool {
        !matches!(
            self,
            GridEvent::SpeedChanged(_) | GridEvent::OrientationChanged(_)
        )
    }
}

/// A grid change, captured at the moment it happened
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridNotification {
    pub object: ObjectKey,
    pub event: GridEvent,
    /// Status right after the change
    pub status: Option<Status>,
    /// Cell the object occupied right after the change
    pub position: Position,
}

impl GridNotification {
    pub fn capture(object: ObjectKey, grid: &dyn GridObject, event: GridEvent) -> Self {
        Self {
            object,
            event,
            status: grid.status(),
            position: grid.position(),
        }
    }
}

/// Thread-safe handle the grid engine uses to report changes
#[derive(Clone)]
pub struct NotificationSender {
    sender: Sender<GridNotification>,
}

impl NotificationSender {
    /// Queues a notification for the main context. Returns false if the
    /// main context is gone.
    pub fn notify(&self, notification: GridNotification) -> bool {
        match self.sender.try_send(notification) {
            Ok(()) => true,
            Err(_) => {
                warn!(
                    "main context closed, {:?} for object: {:?} dropped",
                    notification.event, notification.object
                );
                false
            }
        }
    }

    /// Captures and queues a change of `grid`
    pub fn capture(&self, object: ObjectKey, grid: &dyn GridObject, event: GridEvent) -> bool {
        self.notify(GridNotification::capture(object, grid, event))
    }
}

pub(crate) struct NotificationReceiver {
    receiver: Receiver<GridNotification>,
}

impl NotificationReceiver {
    pub(crate) fn try_recv(&self) -> Option<GridNotification> {
        self.receiver.try_recv().ok()
    }
}

pub(crate) fn notification_channel() -> (NotificationSender, NotificationReceiver) {
    let (sender, receiver) = channel::unbounded();
    (
        NotificationSender { sender },
        NotificationReceiver { receiver },
    )
}
