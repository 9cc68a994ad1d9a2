use std::default::Default;

use tilesync_shared::SyncConfig;

/// Contains Config properties which will be used by a Client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Settings shared with the server, including the lag tolerance handed
    /// to every object that spawns
    pub sync: SyncConfig,
    /// Whether dropped messages are reported to the server as local errors.
    /// They are logged either way.
    pub report_local_errors: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            sync: SyncConfig::default(),
            report_local_errors: true,
        }
    }
}
