#![cfg_attr(not(test), deny(clippy::panic))]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

//! # Room Relay Server
//!
//! A lightweight, in-memory WebSocket relay that multiplexes clients into
//! named rooms and fans their JSON messages out to the other room members.
//!
//! The WebSocket layer is implemented from raw bytes — handshake and RFC 6455
//! framing included — with no web framework in between.

/// Server configuration and environment variables
pub mod config;

/// Structured logging configuration
pub mod logging;

/// Wire protocol: frame codec, upgrade handshake, message schema
pub mod protocol;

/// Room coordinator: registries, routing, broadcast
pub mod server;

/// TCP listener and per-connection tasks
pub mod websocket;
