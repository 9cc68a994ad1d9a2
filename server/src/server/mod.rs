mod server_config;
pub use server_config::ServerConfig;

mod sync_server;
pub use sync_server::SyncServer;
