pub mod client;
pub mod errors;
pub mod messages;
pub mod server;

// Re-export commonly used types and functions
pub use client::{send_notification, try_send_notification, IpcClientError};
pub use errors::IpcError;
pub use messages::Notification;
pub use server::IpcServer;
