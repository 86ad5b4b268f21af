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

//! RLOGIN client dialer

use crate::config::{ClientConfig, SessionProperties};
use crate::connection::{run_reader, ConnectionState, RloginConnection};
use crate::error::{ClientError, ConfigError, Result};
use crate::handler::ConnectionHandler;
use bytes::BytesMut;
use rloginix_rlogincodec::{Handshake, RloginCodec, RloginEvent};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info};

const READ_BUFFER_SIZE: usize = 8192;

/// RLOGIN client dialer.
///
/// Holds a validated configuration plus the session properties (window
/// geometry and escape character) that each new connection starts from.
///
/// # Example
///
/// ```no_run
/// use rloginix_client::{ClientConfig, ConnectionHandler, RloginClient, RloginConnection};
/// use async_trait::async_trait;
/// use std::sync::Arc;
///
/// struct Shell;
///
/// #[async_trait]
/// impl ConnectionHandler for Shell {
///     async fn on_data(&self, _conn: &RloginConnection, data: &[u8]) {
///         print!("{}", String::from_utf8_lossy(data));
///     }
/// }
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ClientConfig::new("localhost", 513)
///         .with_client_username("user1")
///         .with_server_username("user2")
///         .with_terminal("vt100", 9600);
///
///     let client = RloginClient::new(config)?;
///     let connection = client.connect(Arc::new(Shell)).await?;
///     connection.write(b"uname -a\r").await?;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct RloginClient {
    config: ClientConfig,
    properties: SessionProperties,
}

impl RloginClient {
    /// Creates a client from a configuration, validating every required
    /// option up front.
    ///
    /// # Errors
    /// A `ConfigError` naming the missing or invalid option.
    pub fn new(config: ClientConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            properties: SessionProperties::default(),
        })
    }

    /// The validated configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The session properties new connections start from
    pub fn properties(&self) -> &SessionProperties {
        &self.properties
    }

    /// Mutable access to the session properties; the setters validate at
    /// write time
    pub fn properties_mut(&mut self) -> &mut SessionProperties {
        &mut self.properties
    }

    /// Connects with the client's current session properties.
    pub async fn connect<H: ConnectionHandler>(&self, handler: Arc<H>) -> Result<RloginConnection> {
        self.connect_with(handler, self.properties).await
    }

    /// Connects with an explicit set of session properties, leaving the
    /// client's own untouched.
    ///
    /// Dials the server, writes the connection preamble as a single frame,
    /// and waits for the zero-byte acknowledgement. The configured
    /// `connect_timeout` covers the whole sequence. Dropping the returned
    /// future before it resolves closes the nascent connection; the reader
    /// task only starts once the server has acknowledged.
    ///
    /// # Errors
    /// `ConnectionTimeout` when the deadline passes, `HandshakeRejected`
    /// when the server's first byte is not zero, `ConnectionClosed` when
    /// the server hangs up before acknowledging, or the underlying dial
    /// error.
    pub async fn connect_with<H: ConnectionHandler>(
        &self,
        handler: Arc<H>,
        properties: SessionProperties,
    ) -> Result<RloginConnection> {
        let addr = self.config.address();
        let deadline = Instant::now() + self.config.connect_timeout;
        info!("connecting to {}", addr);

        let stream = match timeout_at(deadline, TcpStream::connect(&addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(error)) => return Err(error.into()),
            Err(_) => return Err(ClientError::ConnectionTimeout),
        };
        let peer = stream.peer_addr()?;
        let (mut reader, writer) = stream.into_split();

        let mut codec = RloginCodec::new();
        codec.set_escape_char(properties.client_escape());
        let connection =
            RloginConnection::new(self.config.clone(), properties, codec, writer, handler);

        let handshake = Handshake::new(
            self.config.client_username.as_str(),
            self.config.server_username.as_str(),
            self.config.terminal_type.as_str(),
            self.config.terminal_speed,
        );
        let mut frame = BytesMut::with_capacity(handshake.len());
        handshake.encode(&mut frame)?;
        connection.write_raw(&frame).await?;
        debug!("sent connection preamble {}", handshake);

        // Wait for the server's verdict on the preamble.
        let mut buffer = BytesMut::with_capacity(READ_BUFFER_SIZE);
        loop {
            match timeout_at(deadline, reader.read_buf(&mut buffer)).await {
                Ok(Ok(0)) => return Err(ClientError::ConnectionClosed),
                Ok(Ok(_)) => {}
                Ok(Err(error)) => return Err(error.into()),
                Err(_) => return Err(ClientError::ConnectionTimeout),
            }
            let chunk = buffer.split_to(buffer.len());
            let mut events = connection.process_chunk(&chunk).await.into_iter();
            match events.next() {
                Some(RloginEvent::Established) => {
                    connection.set_state(ConnectionState::Connected).await;
                    info!("connected to {}", peer);
                    connection.handler().on_connect(&connection).await;
                    // Data or control that rode in on the same chunk as
                    // the acknowledgement is delivered in order, after
                    // on_connect.
                    for event in events {
                        if !connection.dispatch_event(event).await {
                            return Ok(connection);
                        }
                    }
                    break;
                }
                Some(RloginEvent::Disconnect) => {
                    return Err(ClientError::HandshakeRejected);
                }
                _ => {}
            }
        }

        tokio::spawn(run_reader(connection.clone(), reader, buffer));
        Ok(connection)
    }
}
