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

//! Client configuration and per-session properties

use crate::error::ConfigError;
use rloginix_rlogincodec::{consts, WindowSize};
use std::time::Duration;

/// RLOGIN client configuration.
///
/// The four handshake options (`client_username`, `server_username`,
/// `terminal_type`, `terminal_speed`) plus `host` and `port` are required;
/// validation happens in [`crate::RloginClient::new`] so a misconfigured
/// client is rejected before it ever dials.
///
/// # Example
///
/// ```
/// use rloginix_client::ClientConfig;
///
/// let config = ClientConfig::new("localhost", 513)
///     .with_client_username("user1")
///     .with_server_username("user2")
///     .with_terminal("vt100", 9600);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server hostname or IP address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Login name on the client machine, sent in the preamble
    pub client_username: String,

    /// Login name to assume on the server machine
    pub server_username: String,

    /// Terminal type reported to the server (e.g. "vt100")
    pub terminal_type: String,

    /// Terminal speed in baud, reported alongside the terminal type
    pub terminal_speed: u32,

    /// Timeout covering the dial and the server's handshake acknowledgement
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 513,
            client_username: String::new(),
            server_username: String::new(),
            terminal_type: String::new(),
            terminal_speed: 0,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Create a new client configuration with the given host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Set the login name on the client machine
    pub fn with_client_username(mut self, username: impl Into<String>) -> Self {
        self.client_username = username.into();
        self
    }

    /// Set the login name to assume on the server machine
    pub fn with_server_username(mut self, username: impl Into<String>) -> Self {
        self.server_username = username.into();
        self
    }

    /// Set the terminal type and speed
    pub fn with_terminal(mut self, terminal_type: impl Into<String>, speed: u32) -> Self {
        self.terminal_type = terminal_type.into();
        self.terminal_speed = speed;
        self
    }

    /// Set the connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Get the server address as a string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Checks that every required option is present and usable.
    ///
    /// An empty string counts as a missing option; the handshake strings
    /// additionally must not carry an embedded NUL, which would cut the
    /// preamble short on the server side.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require("host", &self.host)?;
        if self.port == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "port",
                value: self.port.to_string(),
            });
        }
        require("client_username", &self.client_username)?;
        require("server_username", &self.server_username)?;
        require("terminal_type", &self.terminal_type)?;
        if self.terminal_speed == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "terminal_speed",
                value: self.terminal_speed.to_string(),
            });
        }
        for (name, value) in [
            ("client_username", &self.client_username),
            ("server_username", &self.server_username),
            ("terminal_type", &self.terminal_type),
        ] {
            if value.as_bytes().contains(&0) {
                return Err(ConfigError::InvalidSetting {
                    name,
                    value: value.escape_default().to_string(),
                });
            }
        }
        Ok(())
    }
}

fn require(name: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        Err(ConfigError::MissingOption(name))
    } else {
        Ok(())
    }
}

/// A client escape character argument.
///
/// Accepted anywhere an escape character or escape suffix is expected:
/// from a raw byte, an ASCII `char`, or a one-character string. The
/// conversions from `char` and `&str` are fallible since the escape
/// occupies exactly one byte on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapeChar(u8);

impl EscapeChar {
    /// Returns the underlying byte value.
    pub fn byte(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for EscapeChar {
    type Error = ConfigError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Ok(EscapeChar(byte))
    }
}

impl TryFrom<char> for EscapeChar {
    type Error = ConfigError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        if value.is_ascii() {
            Ok(EscapeChar(value as u8))
        } else {
            Err(ConfigError::InvalidSetting {
                name: "client_escape",
                value: value.to_string(),
            })
        }
    }
}

impl TryFrom<&str> for EscapeChar {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.as_bytes() {
            [byte] => Ok(EscapeChar(*byte)),
            _ => Err(ConfigError::InvalidSetting {
                name: "client_escape",
                value: value.to_string(),
            }),
        }
    }
}

/// Mutable per-session properties: terminal geometry plus the client
/// escape character.
///
/// Defaults are an 80x24 terminal with a 640x480 pixel window and `~` as
/// the escape. Every setter validates at write time and leaves the state
/// untouched when the value is rejected; the geometry setters accept
/// `i64` so out-of-range values are reported instead of silently wrapped.
///
/// # Example
///
/// ```
/// use rloginix_client::SessionProperties;
///
/// let mut properties = SessionProperties::default();
/// properties.set_rows(48).unwrap();
/// assert!(properties.set_rows(-1).is_err());
/// assert_eq!(properties.rows(), 48);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProperties {
    window: WindowSize,
    client_escape: u8,
}

impl Default for SessionProperties {
    fn default() -> Self {
        Self {
            window: WindowSize::default(),
            client_escape: consts::DEFAULT_ESCAPE,
        }
    }
}

impl SessionProperties {
    /// Creates a property set with all five values supplied explicitly.
    ///
    /// # Errors
    /// Rejects non-positive or oversized dimensions and a multi-character
    /// escape, with the state of the returned value never partially
    /// applied.
    pub fn new<E>(
        rows: i64,
        columns: i64,
        pixels_x: i64,
        pixels_y: i64,
        client_escape: E,
    ) -> Result<Self, ConfigError>
    where
        E: TryInto<EscapeChar, Error = ConfigError>,
    {
        let mut properties = Self::default();
        properties.set_rows(rows)?;
        properties.set_columns(columns)?;
        properties.set_pixels_x(pixels_x)?;
        properties.set_pixels_y(pixels_y)?;
        properties.client_escape = client_escape.try_into()?.byte();
        Ok(properties)
    }

    /// Terminal height in rows
    pub fn rows(&self) -> u16 {
        self.window.rows
    }

    /// Terminal width in columns
    pub fn columns(&self) -> u16 {
        self.window.columns
    }

    /// Horizontal window size in pixels
    pub fn pixels_x(&self) -> u16 {
        self.window.pixels_x
    }

    /// Vertical window size in pixels
    pub fn pixels_y(&self) -> u16 {
        self.window.pixels_y
    }

    /// The client escape character
    pub fn client_escape(&self) -> u8 {
        self.client_escape
    }

    /// The geometry as reported in a Window Change Control Sequence
    pub fn window(&self) -> WindowSize {
        self.window
    }

    /// Set the terminal height in rows
    pub fn set_rows(&mut self, rows: i64) -> Result<(), ConfigError> {
        self.window.rows = dimension("rows", rows)?;
        Ok(())
    }

    /// Set the terminal width in columns
    pub fn set_columns(&mut self, columns: i64) -> Result<(), ConfigError> {
        self.window.columns = dimension("columns", columns)?;
        Ok(())
    }

    /// Set the horizontal window size in pixels
    pub fn set_pixels_x(&mut self, pixels_x: i64) -> Result<(), ConfigError> {
        self.window.pixels_x = dimension("pixels_x", pixels_x)?;
        Ok(())
    }

    /// Set the vertical window size in pixels
    pub fn set_pixels_y(&mut self, pixels_y: i64) -> Result<(), ConfigError> {
        self.window.pixels_y = dimension("pixels_y", pixels_y)?;
        Ok(())
    }

    /// Set the client escape character from a byte, `char`, or
    /// one-character string
    pub fn set_client_escape<E>(&mut self, escape: E) -> Result<(), ConfigError>
    where
        E: TryInto<EscapeChar, Error = ConfigError>,
    {
        self.client_escape = escape.try_into()?.byte();
        Ok(())
    }

    /// Already-validated escape updates from the connection layer.
    pub(crate) fn set_escape_byte(&mut self, byte: u8) {
        self.client_escape = byte;
    }
}

fn dimension(name: &'static str, value: i64) -> Result<u16, ConfigError> {
    if (1..=i64::from(u16::MAX)).contains(&value) {
        Ok(value as u16)
    } else {
        Err(ConfigError::InvalidSetting {
            name,
            value: value.to_string(),
        })
    }
}
