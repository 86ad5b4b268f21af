//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! # Rloginix RLOGIN Client
//!
//! Asynchronous client for the RLOGIN remote-login protocol (RFC 1282),
//! built on Tokio and the `rloginix_rlogincodec` state machine.
//!
//! ## Features
//!
//! - **Full protocol handling** - Connection preamble, in-band control
//!   bytes, cooked/raw line discipline, and window size reports
//! - **Client escapes** - The BSD-style `~.` family, extensible with
//!   user-installed handlers
//! - **Event-Driven** - Handler-based API for observing server output and
//!   connection lifecycle
//! - **Async-First** - Built on Tokio for high-performance async I/O
//!
//! ## Quick Start
//!
//! ```no_run
//! use rloginix_client::{ClientConfig, ConnectionHandler, RloginClient, RloginConnection};
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct MyHandler;
//!
//! #[async_trait]
//! impl ConnectionHandler for MyHandler {
//!     async fn on_connect(&self, _conn: &RloginConnection) {
//!         println!("Connected!");
//!     }
//!
//!     async fn on_data(&self, _conn: &RloginConnection, data: &[u8]) {
//!         print!("{}", String::from_utf8_lossy(data));
//!     }
//!
//!     async fn on_close(&self, _conn: &RloginConnection) {
//!         println!("Connection closed");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("localhost", 513)
//!         .with_client_username("user1")
//!         .with_server_username("user2")
//!         .with_terminal("vt100", 9600);
//!
//!     let client = RloginClient::new(config)?;
//!     let connection = client.connect(Arc::new(MyHandler)).await?;
//!
//!     connection.write(b"ls\r").await?;
//!     connection.disconnect().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Sending Data
//!
//! ```no_run
//! # use rloginix_client::{Result, RloginConnection};
//! # async fn example(conn: &RloginConnection) -> Result<()> {
//! // User input; escape sequences such as "~." are interpreted locally
//! conn.write(b"echo hello\r").await?;
//!
//! // Report a new window size
//! conn.set_rows(50).await?;
//! conn.set_columns(132).await?;
//! conn.send_window_size().await?;
//! # Ok(())
//! # }
//! ```

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(
    clippy::option_if_let_else,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

mod client;
mod config;
mod connection;
mod error;
mod handler;

pub use client::RloginClient;
pub use config::{ClientConfig, EscapeChar, SessionProperties};
pub use connection::{ConnectionState, RloginConnection};
pub use error::{ClientError, ConfigError, Result};
pub use handler::ConnectionHandler;

// Re-export types from the protocol codec
pub use rloginix_rlogincodec::{
    consts, CodecError, CodecResult, EscapeAction, EscapeHandler, EscapeTable, Handshake,
    InputDisposition, RloginCodec, RloginEvent, WindowSize,
};
