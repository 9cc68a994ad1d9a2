use log::warn;
use smol::channel::{self, Receiver, Sender};

use tilesync_shared::{read_message, ObjectId, ObjectMessage, ScopeId, SyncError};

use crate::{
    scope::{ClientScope, ScopeObject},
    ClientConfig,
};

/// Boundary to the scopes layer that reports client-side failures back to
/// the server
pub trait LocalErrorSink {
    fn local_error(&mut self, code: &'static str);
}

/// Cloneable handle a transport thread pushes raw payloads through
#[derive(Clone)]
pub struct Inbox {
    sender: Sender<Box<[u8]>>,
}

impl Inbox {
    /// Returns false if the protocol is gone
    pub fn push(&self, payload: Box<[u8]>) -> bool {
        self.sender.try_send(payload).is_ok()
    }
}

/// Receives object messages for the current scope, validates them and
/// replays them on the addressed objects.
pub struct ClientProtocol<O: ScopeObject> {
    config: ClientConfig,
    current_scope: Option<ClientScope<O>>,
    errors: Box<dyn LocalErrorSink>,
    inbox_sender: Sender<Box<[u8]>>,
    inbox_receiver: Receiver<Box<[u8]>>,
}

impl<O: ScopeObject> ClientProtocol<O> {
    pub fn new(config: ClientConfig, errors: Box<dyn LocalErrorSink>) -> Self {
        let (inbox_sender, inbox_receiver) = channel::unbounded();
        Self {
            config,
            current_scope: None,
            errors,
            inbox_sender,
            inbox_receiver,
        }
    }

    /// Lag tolerance handed to objects as they spawn
    pub fn lag_tolerance(&self) -> u16 {
        self.config.sync.effective_lag_tolerance()
    }

    pub fn inbox(&self) -> Inbox {
        Inbox {
            sender: self.inbox_sender.clone(),
        }
    }

    //// Scope

    /// Replaces the current scope, `None` meaning limbo. Returns the
    /// previous one.
    pub fn move_to_scope(&mut self, scope: Option<ClientScope<O>>) -> Option<ClientScope<O>> {
        std::mem::replace(&mut self.current_scope, scope)
    }

    pub fn current_scope(&self) -> Option<&ClientScope<O>> {
        self.current_scope.as_ref()
    }

    pub fn current_scope_mut(&mut self) -> Option<&mut ClientScope<O>> {
        self.current_scope.as_mut()
    }

    pub fn current_scope_id(&self) -> Option<ScopeId> {
        self.current_scope.as_ref().map(|scope| scope.id())
    }

    /// Adds an object to the current scope and spawns it with this
    /// protocol's lag tolerance.
    ///
    /// An object already spawned under `object_id` is despawned and
    /// returned. In limbo the object is handed back as the error.
    pub fn spawn_object(&mut self, object_id: ObjectId, mut object: O) -> Result<Option<O>, O> {
        let lag_tolerance = self.lag_tolerance();
        let Some(scope) = self.current_scope.as_mut() else {
            warn!("object: {} spawned while in limbo", object_id);
            return Err(object);
        };
        if let Some(synced) = object.as_synced() {
            synced.on_spawned(lag_tolerance);
        }
        let mut replaced = scope.insert_object(object_id, object);
        if let Some(previous) = replaced.as_mut() {
            warn!("object: {} replaced an object spawned under the same id", object_id);
            if let Some(synced) = previous.as_synced() {
                synced.on_despawned();
            }
        }
        Ok(replaced)
    }

    /// Despawns and removes an object from the current scope
    pub fn despawn_object(&mut self, object_id: &ObjectId) -> Option<O> {
        let mut object = self.current_scope.as_mut()?.remove_object(object_id)?;
        if let Some(synced) = object.as_synced() {
            synced.on_despawned();
        }
        Some(object)
    }

    //// Messages

    /// Drains every payload pushed through the [`Inbox`]. Returns how many
    /// were applied.
    pub fn process_inbox(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(payload) = self.inbox_receiver.try_recv() {
            if self.receive(&payload).is_ok() {
                applied += 1;
            }
        }
        applied
    }

    /// Decodes and handles one payload
    pub fn receive(&mut self, payload: &[u8]) -> Result<(), SyncError> {
        match read_message(payload) {
            Ok(message) => self.handle(message),
            Err(error) => {
                self.report(&error);
                Err(error)
            }
        }
    }

    /// Validates a message and applies it to its object. A message that
    /// fails validation is dropped and reported.
    pub fn handle(&mut self, message: ObjectMessage) -> Result<(), SyncError> {
        let result = match self.current_scope.as_mut() {
            Some(scope) if scope.id() == message.scope_id => scope.dispatch(message),
            other => Err(SyncError::ScopeMismatch {
                current: other.map(|scope| scope.id()),
                received: message.scope_id,
            }),
        };
        if let Err(error) = &result {
            warn!("{} for object: {} dropped: {}", message.event.name(), message.object_id, error);
            self.report(error);
        }
        result
    }

    fn report(&mut self, error: &SyncError) {
        if self.config.report_local_errors {
            self.errors.local_error(error.code());
        }
    }
}
