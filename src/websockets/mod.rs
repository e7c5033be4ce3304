// Public API
pub use broadcaster::{Broadcaster, InMemoryBroadcaster};
pub use handler::{websocket_handler, ScoreboardReceiveHandler};
pub use messages::{MessageType, WebSocketMessage};
pub use socket::MessageHandler;

// Internal modules
pub mod broadcaster;
mod handler;
pub mod messages;
mod socket;
