use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use log::warn;
use smol::{
    channel,
    channel::{Receiver, Sender, TryRecvError},
};

use tilesync_shared::ConnectionId;

use super::{ConnectionSender, RecvError, SendError};

/// In-process transport: every connected client gets its own unbounded
/// channel, and sends go straight into it.
#[derive(Clone, Default)]
pub struct ChannelTransport {
    routes: Arc<RwLock<HashMap<ConnectionId, Sender<Box<[u8]>>>>>,
}

impl ChannelTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a route to `connection_id`, replacing any previous one
    pub fn connect(&self, connection_id: ConnectionId) -> ChannelReceiver {
        let (sender, receiver) = channel::unbounded();
        match self.routes.write() {
            Ok(mut routes) => {
                routes.insert(connection_id, sender);
            }
            Err(_) => warn!("route table poisoned, connection: {} not routed", connection_id),
        }
        ChannelReceiver::new(receiver)
    }

    /// Drops the route to `connection_id`. Pending payloads stay readable
    /// on the receiver.
    pub fn disconnect(&self, connection_id: &ConnectionId) {
        if let Ok(mut routes) = self.routes.write() {
            routes.remove(connection_id);
        }
    }
}

impl ConnectionSender for ChannelTransport {
    fn send(&self, connection_id: &ConnectionId, payload: &[u8]) -> Result<(), SendError> {
        let Ok(routes) = self.routes.read() else {
            return Err(SendError::Unreachable {
                connection_id: *connection_id,
            });
        };
        let Some(sender) = routes.get(connection_id) else {
            return Err(SendError::Unreachable {
                connection_id: *connection_id,
            });
        };
        sender
            .try_send(payload.into())
            .map_err(|_| SendError::Closed {
                connection_id: *connection_id,
            })
    }
}

/// Receiving end of one connection's route
pub struct ChannelReceiver {
    receiver: Receiver<Box<[u8]>>,
}

impl ChannelReceiver {
    fn new(receiver: Receiver<Box<[u8]>>) -> Self {
        Self { receiver }
    }

    /// Receives the next pending payload, if any
    pub fn receive(&mut self) -> Result<Option<Box<[u8]>>, RecvError> {
        match self.receiver.try_recv() {
            Ok(payload) => Ok(Some(payload)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(_) => Err(RecvError),
        }
    }

    /// Closes the channel, so that further sends to it fail
    pub fn close(&self) {
        self.receiver.close();
    }
}
