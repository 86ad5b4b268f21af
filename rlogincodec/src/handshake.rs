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

//! Connection preamble
//!

use crate::consts;
use crate::result::{CodecError, CodecResult};
use bytes::BufMut;

/// The four-string preamble a client sends immediately after the TCP
/// connection opens.
///
/// # Format
/// ```text
/// 00 <client-username> 00 <server-username> 00 <terminal-type> "/" <speed> 00
/// ```
/// The usernames and terminal type are opaque byte sequences; the speed is
/// rendered in ASCII decimal. RFC 1282 does not constrain the character
/// encoding beyond forbidding embedded NUL bytes, which would terminate a
/// field early on the server side.
///
/// # Example
/// ```
/// use rloginix_rlogincodec::Handshake;
/// use bytes::BytesMut;
///
/// let handshake = Handshake::new("user1", "user2", "vt100", 9600);
/// let mut buffer = BytesMut::new();
/// handshake.encode(&mut buffer).unwrap();
/// assert_eq!(&buffer[..], b"\0user1\0user2\0vt100/9600\0");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Handshake {
    /// Login name on the client machine
    pub client_username: String,
    /// Login name to assume on the server machine
    pub server_username: String,
    /// Terminal type, e.g. "vt100"
    pub terminal_type: String,
    /// Terminal speed in baud
    pub terminal_speed: u32,
}

impl Handshake {
    /// Creates a new `Handshake` from the four connection options.
    pub fn new(
        client_username: impl Into<String>,
        server_username: impl Into<String>,
        terminal_type: impl Into<String>,
        terminal_speed: u32,
    ) -> Self {
        Handshake {
            client_username: client_username.into(),
            server_username: server_username.into(),
            terminal_type: terminal_type.into(),
            terminal_speed,
        }
    }

    /// Checks that every field can be placed on the wire.
    ///
    /// # Errors
    /// Returns a `CodecError` if a string field is empty or contains an
    /// embedded NUL, or if the terminal speed is zero.
    pub fn validate(&self) -> CodecResult<()> {
        for (field, value) in [
            ("client_username", &self.client_username),
            ("server_username", &self.server_username),
            ("terminal_type", &self.terminal_type),
        ] {
            if value.is_empty() {
                return Err(CodecError::EmptyHandshakeField { field });
            }
            if value.as_bytes().contains(&consts::NUL) {
                return Err(CodecError::EmbeddedNul { field });
            }
        }
        if self.terminal_speed == 0 {
            return Err(CodecError::ZeroTerminalSpeed);
        }
        Ok(())
    }

    /// Returns the encoded length of this preamble in bytes.
    pub fn len(&self) -> usize {
        let speed = self.terminal_speed.to_string();
        4 + self.client_username.len()
            + self.server_username.len()
            + self.terminal_type.len()
            + 1
            + speed.len()
    }

    /// Encodes this preamble into a byte buffer.
    ///
    /// The whole frame is appended in one pass so a caller can hand the
    /// buffer to a single vectored write.
    ///
    /// # Errors
    /// Returns a `CodecError` if [`Handshake::validate`] fails.
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        self.validate()?;
        let speed = self.terminal_speed.to_string();
        dst.put_u8(consts::NUL);
        dst.put_slice(self.client_username.as_bytes());
        dst.put_u8(consts::NUL);
        dst.put_slice(self.server_username.as_bytes());
        dst.put_u8(consts::NUL);
        dst.put_slice(self.terminal_type.as_bytes());
        dst.put_u8(b'/');
        dst.put_slice(speed.as_bytes());
        dst.put_u8(consts::NUL);
        Ok(self.len())
    }
}

impl std::fmt::Display for Handshake {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}@{} ({}/{})",
            self.client_username, self.server_username, self.terminal_type, self.terminal_speed
        )
    }
}
