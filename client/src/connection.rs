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

//! Live connection handle

use crate::config::{ClientConfig, EscapeChar, SessionProperties};
use crate::error::{ClientError, ConfigError, Result};
use crate::handler::ConnectionHandler;
use bytes::BytesMut;
use rloginix_rlogincodec::{EscapeAction, InputDisposition, RloginCodec, RloginEvent};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Preamble sent, waiting for the server's acknowledgement
    Connecting,
    /// Connected and active
    Connected,
    /// Torn down; the handle refuses further writes
    Disconnected,
}

/// A live RLOGIN connection.
///
/// The handle is cheap to clone; all clones refer to the same connection.
/// User input goes through [`RloginConnection::write`], which screens it
/// for client escape sequences before it reaches the wire. Server output
/// and lifecycle changes arrive through the [`ConnectionHandler`] the
/// connection was opened with.
pub struct RloginConnection {
    inner: Arc<ConnectionInner>,
}

struct ConnectionInner {
    config: ClientConfig,
    properties: RwLock<SessionProperties>,
    codec: Mutex<RloginCodec>,
    writer: Mutex<OwnedWriteHalf>,
    state: RwLock<ConnectionState>,
    handler: Arc<dyn ConnectionHandler>,
}

impl RloginConnection {
    pub(crate) fn new(
        config: ClientConfig,
        properties: SessionProperties,
        codec: RloginCodec,
        writer: OwnedWriteHalf,
        handler: Arc<dyn ConnectionHandler>,
    ) -> Self {
        Self {
            inner: Arc::new(ConnectionInner {
                config,
                properties: RwLock::new(properties),
                codec: Mutex::new(codec),
                writer: Mutex::new(writer),
                state: RwLock::new(ConnectionState::Connecting),
                handler,
            }),
        }
    }

    /// The current connection state
    pub async fn state(&self) -> ConnectionState {
        *self.inner.state.read().await
    }

    /// Checks whether the connection is live
    pub async fn is_connected(&self) -> bool {
        *self.inner.state.read().await == ConnectionState::Connected
    }

    /// Checks whether the server has the client in cooked mode
    pub async fn is_cooked(&self) -> bool {
        self.inner.codec.lock().await.is_cooked()
    }

    /// The configuration this connection was opened with
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Sends user input to the server.
    ///
    /// The input is screened for client escape sequences first; a
    /// disconnect escape (`~.` by default) flushes the bytes that preceded
    /// it and then tears the connection down.
    ///
    /// # Errors
    /// `NotConnected` once the connection is torn down, `InputSuspended`
    /// while a `~^Y`/`~^Z` escape has input suspended, or the underlying
    /// I/O error.
    pub async fn write(&self, data: &[u8]) -> Result<()> {
        if !self.is_connected().await {
            return Err(ClientError::NotConnected);
        }
        let mut filtered = BytesMut::with_capacity(data.len());
        let disposition = {
            let mut codec = self.inner.codec.lock().await;
            if codec.is_input_suspended() {
                return Err(ClientError::InputSuspended);
            }
            codec.filter_input(data, &mut filtered)
        };
        if !filtered.is_empty() {
            let mut writer = self.inner.writer.lock().await;
            writer.write_all(&filtered).await?;
        }
        if disposition == InputDisposition::DisconnectRequested {
            self.disconnect().await?;
        }
        Ok(())
    }

    /// Sends user input and then half-closes the write side.
    pub async fn end(&self, data: &[u8]) -> Result<()> {
        self.write(data).await?;
        let mut writer = self.inner.writer.lock().await;
        writer.shutdown().await?;
        Ok(())
    }

    /// Reports the current window geometry to the server with a Window
    /// Change Control Sequence.
    ///
    /// Called automatically when the server requests it; also available to
    /// the caller after changing the geometry properties.
    ///
    /// # Errors
    /// `NotConnected` once the connection is torn down, or the underlying
    /// I/O error.
    pub async fn send_window_size(&self) -> Result<()> {
        if !self.is_connected().await {
            return Err(ClientError::NotConnected);
        }
        let window = self.inner.properties.read().await.window();
        let mut frame = BytesMut::with_capacity(window.len());
        window.encode(&mut frame)?;
        let mut writer = self.inner.writer.lock().await;
        writer.write_all(&frame).await?;
        debug!("reported window size {}", window);
        Ok(())
    }

    /// Tears the connection down: half-closes the transport and delivers
    /// `on_close`. Safe to call more than once; only the first call has an
    /// effect.
    pub async fn disconnect(&self) -> Result<()> {
        {
            let mut writer = self.inner.writer.lock().await;
            // The peer may already be gone; teardown proceeds regardless.
            let _ = writer.shutdown().await;
        }
        self.handle_disconnect().await;
        Ok(())
    }

    /// Installs or replaces a client escape binding.
    ///
    /// The suffix is a byte, an ASCII `char`, or a one-character string.
    /// The handler runs from within the byte processor whenever the escape
    /// fires, on either the inbound or the outbound path.
    ///
    /// # Errors
    /// `add_client_escape: invalid string argument` when the suffix is not
    /// exactly one character.
    pub async fn add_client_escape<E, F>(&self, suffix: E, handler: F) -> Result<()>
    where
        E: TryInto<EscapeChar>,
        F: FnMut() + Send + 'static,
    {
        let suffix = suffix
            .try_into()
            .map_err(|_| ConfigError::InvalidEscapeArgument)?;
        self.inner
            .codec
            .lock()
            .await
            .add_escape(suffix.byte(), EscapeAction::Custom(Box::new(handler)));
        Ok(())
    }

    /// Terminal height in rows
    pub async fn rows(&self) -> u16 {
        self.inner.properties.read().await.rows()
    }

    /// Terminal width in columns
    pub async fn columns(&self) -> u16 {
        self.inner.properties.read().await.columns()
    }

    /// Horizontal window size in pixels
    pub async fn pixels_x(&self) -> u16 {
        self.inner.properties.read().await.pixels_x()
    }

    /// Vertical window size in pixels
    pub async fn pixels_y(&self) -> u16 {
        self.inner.properties.read().await.pixels_y()
    }

    /// The current client escape character
    pub async fn client_escape(&self) -> u8 {
        self.inner.properties.read().await.client_escape()
    }

    /// Set the terminal height in rows; takes effect on the next window
    /// size report
    pub async fn set_rows(&self, rows: i64) -> Result<()> {
        self.inner.properties.write().await.set_rows(rows)?;
        Ok(())
    }

    /// Set the terminal width in columns
    pub async fn set_columns(&self, columns: i64) -> Result<()> {
        self.inner.properties.write().await.set_columns(columns)?;
        Ok(())
    }

    /// Set the horizontal window size in pixels
    pub async fn set_pixels_x(&self, pixels_x: i64) -> Result<()> {
        self.inner.properties.write().await.set_pixels_x(pixels_x)?;
        Ok(())
    }

    /// Set the vertical window size in pixels
    pub async fn set_pixels_y(&self, pixels_y: i64) -> Result<()> {
        self.inner.properties.write().await.set_pixels_y(pixels_y)?;
        Ok(())
    }

    /// Replace the client escape character from a byte, `char`, or
    /// one-character string
    pub async fn set_client_escape<E>(&self, escape: E) -> Result<()>
    where
        E: TryInto<EscapeChar, Error = ConfigError>,
    {
        let escape = escape.try_into()?;
        self.inner
            .properties
            .write()
            .await
            .set_escape_byte(escape.byte());
        self.inner.codec.lock().await.set_escape_char(escape.byte());
        Ok(())
    }

    pub(crate) fn handler(&self) -> Arc<dyn ConnectionHandler> {
        Arc::clone(&self.inner.handler)
    }

    pub(crate) async fn set_state(&self, state: ConnectionState) {
        *self.inner.state.write().await = state;
    }

    /// Writes bytes with no filtering; the preamble and protocol frames
    /// use this path.
    pub(crate) async fn write_raw(&self, data: &[u8]) -> Result<()> {
        let mut writer = self.inner.writer.lock().await;
        writer.write_all(data).await?;
        Ok(())
    }

    /// Feeds one inbound chunk through the codec.
    pub(crate) async fn process_chunk(&self, chunk: &[u8]) -> Vec<RloginEvent> {
        self.inner.codec.lock().await.process_chunk(chunk)
    }

    /// Acts on one decoded event. Returns false once the connection has
    /// been torn down and the reader should stop.
    pub(crate) async fn dispatch_event(&self, event: RloginEvent) -> bool {
        match event {
            RloginEvent::Established => {
                // Consumed during connect; the codec never repeats it.
                true
            }
            RloginEvent::Data(data) => {
                self.inner.handler.on_data(self, &data).await;
                true
            }
            RloginEvent::WindowSizeRequest => {
                if let Err(error) = self.send_window_size().await {
                    warn!("window size report failed: {}", error);
                    self.inner.handler.on_error(self, error).await;
                }
                true
            }
            RloginEvent::Disconnect => {
                let _ = self.disconnect().await;
                false
            }
        }
    }

    /// Idempotent teardown; delivers `on_close` exactly once, and only if
    /// the connection was actually established.
    pub(crate) async fn handle_disconnect(&self) {
        let was_connected = {
            let mut state = self.inner.state.write().await;
            if *state == ConnectionState::Disconnected {
                return;
            }
            let was_connected = *state == ConnectionState::Connected;
            *state = ConnectionState::Disconnected;
            was_connected
        };
        info!("connection to {} closed", self.inner.config.address());
        if was_connected {
            self.inner.handler.on_close(self).await;
        }
    }
}

impl Clone for RloginConnection {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Steady-state read loop: one task per connection, dispatching decoded
/// events until the stream ends.
pub(crate) async fn run_reader(
    connection: RloginConnection,
    mut reader: OwnedReadHalf,
    mut buffer: BytesMut,
) {
    loop {
        match reader.read_buf(&mut buffer).await {
            Ok(0) => {
                debug!("server closed the connection");
                break;
            }
            Ok(_) => {
                let chunk = buffer.split_to(buffer.len());
                let events = connection.process_chunk(&chunk).await;
                for event in events {
                    if !connection.dispatch_event(event).await {
                        return;
                    }
                }
            }
            Err(error) => {
                warn!("transport error: {}", error);
                let handler = connection.handler();
                handler.on_error(&connection, error.into()).await;
                break;
            }
        }
    }
    connection.handle_disconnect().await;
}
