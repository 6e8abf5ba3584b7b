pub mod actor;
pub mod handler;
pub mod messages;

pub use handler::handle_websocket;
