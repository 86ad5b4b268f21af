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

//! RLOGIN protocol byte constants (RFC 1282)

/// Sent by the server, once, to acknowledge the connection preamble.
pub const HANDSHAKE_ACK: u8 = 0x00;

/// Field terminator inside the connection preamble.
pub const NUL: u8 = 0x00;

/// Discard data received in the current chunk but not yet delivered.
pub const DISCARD: u8 = 0x02;

/// Switch the client to raw mode; XON/XOFF pass through as data.
pub const RAW: u8 = 0x10;

/// DC1 / XON, resume output delivery (cooked mode only).
pub const XON: u8 = 0x11;

/// DC3 / XOFF, suspend output delivery (cooked mode only).
pub const XOFF: u8 = 0x13;

/// Switch the client back to cooked mode.
pub const COOKED: u8 = 0x20;

/// Ask the client to report its window size with a WCCS frame.
pub const WINDOW: u8 = 0x80;

/// Carriage return.
pub const CR: u8 = 0x0D;

/// Line feed.
pub const LF: u8 = 0x0A;

/// Cancel; re-arms the client escape watch like a fresh line.
pub const CAN: u8 = 0x18;

/// Default client escape character, `~`.
pub const DEFAULT_ESCAPE: u8 = 0x7E;

/// Magic prefix of the Window Change Control Sequence.
pub const WCCS_MAGIC: [u8; 4] = [0xFF, 0xFF, 0x73, 0x73];

/// Encoded length of a WCCS frame: the magic prefix plus four u16 fields.
pub const WCCS_LEN: usize = 12;

/// Escape suffix bytes with built-in bindings.
pub mod escape {
    /// `~.` disconnects from the server.
    pub const DISCONNECT: u8 = 0x2E;
    /// `~^D` (EOT) disconnects from the server.
    pub const EOT: u8 = 0x04;
    /// `~^Z` (SUB) suspends input and output together.
    pub const SUB: u8 = 0x1A;
    /// `~^Y` (EOM) suspends input only.
    pub const EOM: u8 = 0x19;
}
