//! Per-connection task: upgrade handshake, frame reassembly, dispatch.
//!
//! Each accepted socket gets one sequential read task (this function) and
//! one writer task draining the connection's outbound queue, so a slow write
//! never blocks frame decoding and inbound events stay serialized.

use bytes::{Buf, Bytes, BytesMut};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::TcpStream;
use tokio::sync::mpsc;

use crate::protocol::frame::{self, FrameError, OpCode, MAX_HEADER_LEN, PONG_FRAME};
use crate::protocol::handshake::{self, RequestHead, HEAD_TERMINATOR};
use crate::server::{ConnectionId, RelayServer};

pub async fn handle_connection(stream: TcpStream, addr: SocketAddr, server: Arc<RelayServer>) {
    let (stream, leftover) = match perform_handshake(stream, addr, &server).await {
        Some(upgraded) => upgraded,
        None => return,
    };

    let (read_half, mut write_half) = stream.into_split();
    let (tx, mut rx) = mpsc::channel::<Bytes>(server.config().outbound_queue_capacity);
    let id = server.register(tx.clone()).await;
    tracing::info!(connection_id = %id, client_addr = %addr, "WebSocket connection established");

    // Writer task: drains pre-encoded frames until the registry entry (the
    // last sender) is dropped or the peer goes away.
    tokio::spawn(async move {
        while let Some(wire) = rx.recv().await {
            if write_half.write_all(&wire).await.is_err() {
                break;
            }
        }
        let _ = write_half.shutdown().await;
    });

    read_frames(read_half, leftover, &server, &id, &tx).await;

    // Removes the connection from its room before discarding the entry.
    server.unregister(&id).await;
    tracing::info!(connection_id = %id, client_addr = %addr, "Connection closed");
}

/// Read the HTTP request head and answer it.
///
/// Returns the stream plus any bytes that arrived after the head (the first
/// frames may ride in the same TCP segment) when the upgrade succeeds, and
/// `None` when the connection is done: liveness replies, handshake failures
/// and transport errors all end here.
async fn perform_handshake(
    mut stream: TcpStream,
    addr: SocketAddr,
    server: &RelayServer,
) -> Option<(TcpStream, BytesMut)> {
    let max_head = server.config().max_handshake_bytes;
    let mut buf = BytesMut::with_capacity(1024);

    let head_len = loop {
        if let Some(pos) = find_head_terminator(&buf) {
            break pos;
        }
        if buf.len() > max_head {
            tracing::warn!(client_addr = %addr, "Request head exceeds size limit, closing");
            return None;
        }
        match stream.read_buf(&mut buf).await {
            Ok(0) => return None,
            Ok(_) => {}
            Err(err) => {
                tracing::debug!(client_addr = %addr, error = %err, "Read error during handshake");
                return None;
            }
        }
    };

    let head_bytes = buf.split_to(head_len + HEAD_TERMINATOR.len());
    let head_text = match std::str::from_utf8(&head_bytes[..head_len]) {
        Ok(text) => text,
        Err(_) => {
            tracing::warn!(client_addr = %addr, "Non-UTF-8 request head, closing");
            return None;
        }
    };

    let head = match RequestHead::parse(head_text) {
        Ok(head) => head,
        Err(err) => {
            tracing::warn!(client_addr = %addr, error = %err, "Rejected malformed request");
            let _ = stream
                .write_all(handshake::bad_request_response().as_bytes())
                .await;
            return None;
        }
    };

    if !head.is_websocket_upgrade() {
        // Plain HTTP request: answer with the liveness response and close.
        tracing::debug!(client_addr = %addr, path = %head.path, "Liveness request");
        let _ = stream
            .write_all(handshake::liveness_response().as_bytes())
            .await;
        return None;
    }

    match handshake::upgrade_response(&head) {
        Ok(response) => {
            if let Err(err) = stream.write_all(response.as_bytes()).await {
                tracing::debug!(client_addr = %addr, error = %err, "Failed to send 101 response");
                return None;
            }
            Some((stream, buf))
        }
        Err(err) => {
            tracing::warn!(client_addr = %addr, error = %err, "Handshake failed");
            let _ = stream
                .write_all(handshake::bad_request_response().as_bytes())
                .await;
            None
        }
    }
}

/// Feed the persistent decode buffer until the connection ends.
///
/// Incoming bytes are appended to `buf`; every complete frame at the front
/// is decoded and dispatched, and a trailing partial frame stays in the
/// buffer for the next read. This is what keeps reassembly correct under
/// real-world TCP segmentation.
async fn read_frames(
    mut read_half: OwnedReadHalf,
    mut buf: BytesMut,
    server: &RelayServer,
    id: &ConnectionId,
    tx: &mpsc::Sender<Bytes>,
) {
    let max_frame_bytes = server.config().max_message_size + MAX_HEADER_LEN;

    loop {
        loop {
            match frame::decode(&buf) {
                Ok((frame, consumed)) => {
                    buf.advance(consumed);
                    match frame.opcode {
                        OpCode::Close => {
                            tracing::debug!(connection_id = %id, "Close frame received");
                            return;
                        }
                        OpCode::Ping => {
                            // Immediate protocol-level pong, no routing.
                            if tx.try_send(Bytes::from_static(&PONG_FRAME)).is_err() {
                                tracing::debug!(connection_id = %id, "Failed to queue pong frame");
                            }
                        }
                        OpCode::Text if frame.fin => match String::from_utf8(frame.payload) {
                            Ok(text) => server.handle_client_message(id, &text).await,
                            Err(err) => {
                                tracing::warn!(connection_id = %id, error = %err, "Dropping non-UTF-8 text frame");
                            }
                        },
                        // Continuation, binary, pong and reserved opcodes are
                        // consumed and ignored; fragmented messages are not
                        // supported.
                        _ => {}
                    }
                }
                Err(FrameError::Incomplete { .. }) => break,
                Err(err) => {
                    tracing::warn!(connection_id = %id, error = %err, "Frame decode failed, closing");
                    return;
                }
            }
        }

        if buf.len() > max_frame_bytes {
            tracing::warn!(
                connection_id = %id,
                buffered = buf.len(),
                limit = max_frame_bytes,
                "Frame exceeds message size limit, closing"
            );
            return;
        }

        match read_half.read_buf(&mut buf).await {
            Ok(0) => return,
            Ok(_) => {}
            Err(err) => {
                tracing::debug!(connection_id = %id, error = %err, "Transport read error");
                return;
            }
        }
    }
}

fn find_head_terminator(buf: &[u8]) -> Option<usize> {
    buf.windows(HEAD_TERMINATOR.len())
        .position(|window| window == HEAD_TERMINATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminator_found_only_when_complete() {
        assert_eq!(find_head_terminator(b"GET / HTTP/1.1\r\n"), None);
        assert_eq!(find_head_terminator(b"GET / HTTP/1.1\r\n\r\n"), Some(14));
        assert_eq!(find_head_terminator(b"GET / HTTP/1.1\r\n\r\nextra"), Some(14));
    }
}
