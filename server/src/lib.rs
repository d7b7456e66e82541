pub mod archive;
pub mod broadcaster;
pub mod cleanup_task;
pub mod discovery;
pub mod hosted_session;
pub mod messages;
pub mod roster;
pub mod server_config;
pub mod session_registry;

pub use broadcaster::{Broadcaster, RelayTransport};
pub use session_registry::SessionRegistry;
