//! Raw TCP transport for the relay: the accept loop and the per-connection
//! handshake/read/write tasks.

pub mod connection;
pub mod listener;

pub use connection::handle_connection;
pub use listener::serve;
