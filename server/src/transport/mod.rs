mod channel;

pub use channel::{ChannelReceiver, ChannelTransport};
pub use inner::{ConnectionSender, RecvError, SendError};

mod inner {

    use thiserror::Error;

    use tilesync_shared::ConnectionId;

    /// Failure to hand a payload to one connection
    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum SendError {
        /// The transport has no route to this connection
        #[error("Connection {connection_id} is not reachable")]
        Unreachable { connection_id: ConnectionId },

        /// The connection's outgoing channel has been closed
        #[error("Channel to connection {connection_id} is closed")]
        Closed { connection_id: ConnectionId },
    }

    #[derive(Debug)]
    pub struct RecvError;

    /// Delivers serialized messages to individual connections.
    ///
    /// A broadcast calls `send` once per observer in turn, so
    /// implementations must not block.
    pub trait ConnectionSender: Send + Sync {
        /// Sends a payload to a single connection
        fn send(&self, connection_id: &ConnectionId, payload: &[u8]) -> Result<(), SendError>;
    }
}
