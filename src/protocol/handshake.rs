//! HTTP-to-WebSocket upgrade handshake (RFC 6455 section 1.3).
//!
//! The relay speaks just enough HTTP/1.1 to recognize an upgrade request,
//! answer it with a 101, and give every other request a plain-text liveness
//! response. Request bodies are never read.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use sha1::{Digest, Sha1};
use thiserror::Error;

/// Fixed GUID appended to the client key before hashing (RFC 6455).
pub const WEBSOCKET_GUID: &str = "258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// Header terminator that ends an HTTP request head.
pub const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandshakeError {
    /// The request asked for a WebSocket upgrade without a
    /// `Sec-WebSocket-Key` header. Fatal for that connection.
    #[error("upgrade request is missing the Sec-WebSocket-Key header")]
    MissingKey,
    /// The request head is not valid HTTP.
    #[error("malformed HTTP request head")]
    Malformed,
}

/// Minimal parsed view of an HTTP/1.1 request head.
#[derive(Debug)]
pub struct RequestHead {
    pub method: String,
    pub path: String,
    headers: Vec<(String, String)>,
}

impl RequestHead {
    /// Parse a request head (everything before the blank line, which the
    /// caller has already located).
    pub fn parse(head: &str) -> Result<Self, HandshakeError> {
        let mut lines = head.split("\r\n");
        let request_line = lines.next().ok_or(HandshakeError::Malformed)?;
        let mut parts = request_line.split_whitespace();
        let method = parts.next().ok_or(HandshakeError::Malformed)?.to_string();
        let path = parts.next().ok_or(HandshakeError::Malformed)?.to_string();

        let headers = lines
            .filter(|line| !line.is_empty())
            .filter_map(|line| {
                line.split_once(':')
                    .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
            })
            .collect();

        Ok(Self {
            method,
            path,
            headers,
        })
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether this request asks for a WebSocket upgrade.
    #[must_use]
    pub fn is_websocket_upgrade(&self) -> bool {
        self.header("upgrade")
            .is_some_and(|v| v.eq_ignore_ascii_case("websocket"))
    }

    /// The client's `Sec-WebSocket-Key`, required for an upgrade.
    #[must_use]
    pub fn websocket_key(&self) -> Option<&str> {
        self.header("sec-websocket-key")
    }
}

/// Compute the `Sec-WebSocket-Accept` value for a client key:
/// `base64(SHA1(key + GUID))`.
#[must_use]
pub fn compute_accept_key(client_key: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(client_key.as_bytes());
    hasher.update(WEBSOCKET_GUID.as_bytes());
    BASE64.encode(hasher.finalize())
}

/// Render the 101 Switching Protocols response for a valid upgrade request.
pub fn upgrade_response(head: &RequestHead) -> Result<String, HandshakeError> {
    let key = head.websocket_key().ok_or(HandshakeError::MissingKey)?;
    let accept = compute_accept_key(key);
    Ok(format!(
        "HTTP/1.1 101 Switching Protocols\r\n\
         Upgrade: websocket\r\n\
         Connection: Upgrade\r\n\
         Sec-WebSocket-Accept: {accept}\r\n\r\n"
    ))
}

/// 400 response for an upgrade request with no key.
#[must_use]
pub fn bad_request_response() -> &'static str {
    "HTTP/1.1 400 Bad Request\r\nConnection: close\r\nContent-Length: 0\r\n\r\n"
}

/// Plain-text liveness response for any non-upgrade HTTP request.
#[must_use]
pub fn liveness_response() -> String {
    let body = "room-relay-server: ok\n";
    format!(
        "HTTP/1.1 200 OK\r\n\
         Content-Type: text/plain\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\r\n{body}",
        body.len()
    )
}
