//! WebSocket frame codec (RFC 6455 base framing).
//!
//! The decoder is streaming: it reads exactly one frame from the front of a
//! buffer and reports how many bytes it consumed, or
//! [`FrameError::Incomplete`] when the buffer does not yet hold a whole
//! frame. Callers keep unconsumed bytes in a per-connection accumulator and
//! retry after the next read.
//!
//! The relay only ever emits unmasked text frames and the fixed pong reply,
//! so the encoder is limited to those. Client frames arrive masked and are
//! unmasked during decode.

use bytes::Bytes;
use thiserror::Error;

/// Fixed pong frame: fin + pong opcode, zero-length payload.
pub const PONG_FRAME: [u8; 2] = [0x8A, 0x00];

/// Largest possible frame header: 2 base bytes + 8 length bytes + 4 mask bytes.
pub const MAX_HEADER_LEN: usize = 14;

/// Errors produced by the frame codec.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// The buffer does not yet contain a complete frame. `needed` is the
    /// minimum number of additional bytes required to make progress.
    #[error("incomplete frame: need {needed} more byte(s)")]
    Incomplete { needed: usize },
    /// Declared payload length does not fit in this platform's `usize`.
    #[error("frame payload of {declared} bytes exceeds platform limits")]
    PayloadTooLarge { declared: u64 },
}

/// 4-bit frame opcode.
///
/// Only text, close and ping are meaningfully handled by the relay; the
/// remaining opcodes are decoded so the frame can be consumed from the
/// stream, then ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    Continuation,
    Text,
    Binary,
    Close,
    Ping,
    Pong,
    /// Reserved or extension opcode (0x3..=0x7, 0xB..=0xF).
    Reserved(u8),
}

impl OpCode {
    #[must_use]
    pub fn from_u8(nibble: u8) -> Self {
        match nibble {
            0x0 => Self::Continuation,
            0x1 => Self::Text,
            0x2 => Self::Binary,
            0x8 => Self::Close,
            0x9 => Self::Ping,
            0xA => Self::Pong,
            other => Self::Reserved(other & 0x0F),
        }
    }
}

/// One decoded frame. Transient: lives only between decode and dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Final-fragment flag. The relay does not reassemble fragmented
    /// messages; only fin frames carry meaning.
    pub fin: bool,
    pub opcode: OpCode,
    /// Whether the frame arrived masked (client frames must be).
    pub masked: bool,
    /// Payload bytes, already unmasked.
    pub payload: Vec<u8>,
}

/// Decode one frame from the front of `buf`.
///
/// Returns the frame and the number of bytes consumed. The caller advances
/// its accumulator by exactly that count; trailing bytes belong to the next
/// frame and stay in place.
pub fn decode(buf: &[u8]) -> Result<(Frame, usize), FrameError> {
    if buf.len() < 2 {
        return Err(FrameError::Incomplete {
            needed: 2 - buf.len(),
        });
    }

    let fin = buf[0] & 0x80 != 0;
    let opcode = OpCode::from_u8(buf[0] & 0x0F);
    let masked = buf[1] & 0x80 != 0;

    let (payload_len, len_end) = match buf[1] & 0x7F {
        126 => {
            if buf.len() < 4 {
                return Err(FrameError::Incomplete {
                    needed: 4 - buf.len(),
                });
            }
            (u64::from(u16::from_be_bytes([buf[2], buf[3]])), 4)
        }
        127 => {
            if buf.len() < 10 {
                return Err(FrameError::Incomplete {
                    needed: 10 - buf.len(),
                });
            }
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&buf[2..10]);
            (u64::from_be_bytes(raw), 10)
        }
        base => (u64::from(base), 2),
    };

    let payload_len = usize::try_from(payload_len)
        .map_err(|_| FrameError::PayloadTooLarge {
            declared: payload_len,
        })?;

    let header_len: usize = if masked { len_end + 4 } else { len_end };
    let total = header_len
        .checked_add(payload_len)
        .ok_or(FrameError::PayloadTooLarge {
            declared: payload_len as u64,
        })?;
    if buf.len() < total {
        return Err(FrameError::Incomplete {
            needed: total - buf.len(),
        });
    }

    let mut payload = buf[header_len..total].to_vec();
    if masked {
        let key = [
            buf[len_end],
            buf[len_end + 1],
            buf[len_end + 2],
            buf[len_end + 3],
        ];
        apply_mask(&mut payload, key);
    }

    Ok((
        Frame {
            fin,
            opcode,
            masked,
            payload,
        },
        total,
    ))
}

/// XOR each payload byte with `key[i % 4]`. Masking is its own inverse.
pub fn apply_mask(payload: &mut [u8], key: [u8; 4]) {
    for (i, byte) in payload.iter_mut().enumerate() {
        *byte ^= key[i % 4];
    }
}

/// Encode a UTF-8 string as a single unmasked text frame.
///
/// Server-to-client frames are never masked (RFC 6455 makes masking a
/// client-to-server requirement only).
#[must_use]
pub fn encode_text(text: &str) -> Bytes {
    let payload = text.as_bytes();
    let mut out = Vec::with_capacity(payload.len() + 10);
    out.push(0x81); // fin + text opcode

    match payload.len() {
        len @ 0..=125 => out.push(len as u8),
        len @ 126..=65535 => {
            out.push(126);
            out.extend_from_slice(&(len as u16).to_be_bytes());
        }
        len => {
            out.push(127);
            out.extend_from_slice(&(len as u64).to_be_bytes());
        }
    }

    out.extend_from_slice(payload);
    Bytes::from(out)
}
