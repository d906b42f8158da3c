//! Wire protocol for the relay.
//!
//! - [`frame`]: RFC 6455 frame decode/encode
//! - [`handshake`]: HTTP upgrade handshake
//! - [`messages`]: application-level JSON message schema

pub mod frame;
pub mod handshake;
pub mod messages;

pub use frame::{Frame, FrameError, OpCode};
pub use handshake::{HandshakeError, RequestHead};
pub use messages::{ControlMessage, InboundMessage, RelayReply};
