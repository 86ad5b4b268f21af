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

use crate::consts;
use crate::escape::{EscapeAction, EscapeTable};
use crate::event::RloginEvent;
use crate::handshake::Handshake;
use crate::result::CodecError;
use crate::window::WindowSize;
use bytes::{BufMut, BytesMut};
use std::collections::VecDeque;
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, warn};

/// Outcome of filtering one buffer of user input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputDisposition {
    /// Every surviving byte was appended to the destination buffer.
    Forwarded,
    /// An escape suspended input part way through; the surviving prefix is
    /// in the destination buffer and the remainder was dropped.
    Suspended,
    /// A disconnect escape fired. The destination buffer holds the bytes
    /// that preceded the escape; the caller must flush them and then hang
    /// up.
    DisconnectRequested,
}

/// A codec for the client side of the RLOGIN protocol, providing the
/// per-connection state machine that sits between a TCP stream and the
/// caller.
///
/// `RloginCodec` tracks the connection phase (preamble sent, waiting for
/// the server's zero-byte acknowledgement, then steady state) and the line
/// discipline the server has put the client in. Inbound bytes are
/// demultiplexed into in-band control actions and user-visible data;
/// outbound bytes are screened for client escape sequences before they
/// reach the wire.
///
/// The codec never touches a socket itself. Inbound processing surfaces
/// [`RloginEvent`]s; outbound processing fills a caller-supplied buffer.
/// This keeps the state machine synchronous and independently testable,
/// with all I/O owned by the connection layer above.
///
/// # Mode flags
///
/// - `connected`: set once the server acknowledges the preamble.
/// - `cooked`: in cooked mode XON/XOFF are interpreted as flow control; in
///   raw mode they pass through as data.
/// - `suspend_input`: user input is refused (toggled by the `~^Y`/`~^Z`
///   escapes).
/// - `suspend_output`: inbound user data is dropped instead of delivered.
/// - `watch_escape`: the escape character is only honoured at a line
///   boundary: start of stream, after CR+LF, and after CAN.
/// - `escaped`: an escape character was seen and the next byte selects the
///   action.
pub struct RloginCodec {
    connected: bool,
    cooked: bool,
    suspend_input: bool,
    suspend_output: bool,
    watch_escape: bool,
    escaped: bool,
    escape_char: u8,
    escapes: EscapeTable,
    pending: VecDeque<RloginEvent>,
}

impl RloginCodec {
    /// Creates a new instance of `RloginCodec`.
    ///
    /// The codec starts unconnected, in cooked mode, with the escape watch
    /// armed (the stream start counts as a line boundary), the default `~`
    /// escape character, and the standard escape table.
    ///
    /// # Example
    /// ```
    /// use rloginix_rlogincodec::RloginCodec;
    ///
    /// let codec = RloginCodec::new();
    /// assert!(!codec.is_connected());
    /// assert!(codec.is_cooked());
    /// ```
    pub fn new() -> RloginCodec {
        RloginCodec::default()
    }

    /// Checks whether the server has acknowledged the connection preamble.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Checks whether the codec is in cooked mode.
    ///
    /// Cooked mode means XON/XOFF in either direction are interpreted as
    /// flow control and never delivered as data.
    pub fn is_cooked(&self) -> bool {
        self.cooked
    }

    /// Checks whether user input is currently suspended.
    pub fn is_input_suspended(&self) -> bool {
        self.suspend_input
    }

    /// Checks whether output delivery is currently suspended.
    pub fn is_output_suspended(&self) -> bool {
        self.suspend_output
    }

    /// Returns the current client escape character.
    pub fn escape_char(&self) -> u8 {
        self.escape_char
    }

    /// Replaces the client escape character.
    pub fn set_escape_char(&mut self, escape: u8) {
        self.escape_char = escape;
    }

    /// Installs or replaces an escape binding.
    ///
    /// # Example
    /// ```
    /// use rloginix_rlogincodec::{EscapeAction, RloginCodec};
    ///
    /// let mut codec = RloginCodec::new();
    /// codec.add_escape(b'b', EscapeAction::Custom(Box::new(|| println!("bell"))));
    /// ```
    pub fn add_escape(&mut self, suffix: u8, action: EscapeAction) {
        self.escapes.bind(suffix, action);
    }

    /// Processes one inbound chunk and returns the events it produced, in
    /// order.
    ///
    /// A chunk is the unit the transport delivered in one read. Chunk
    /// boundaries are semantically relevant twice over: the DISCARD
    /// control byte clears only the data of the current chunk that has not
    /// been delivered yet, and at most one [`RloginEvent::Data`] event is
    /// produced per chunk.
    ///
    /// While unconnected, the first byte of the chunk is the server's
    /// verdict on the preamble: a zero byte yields
    /// [`RloginEvent::Established`] and the remainder of the chunk is
    /// processed in steady state, anything else yields
    /// [`RloginEvent::Disconnect`].
    pub fn process_chunk(&mut self, chunk: &[u8]) -> Vec<RloginEvent> {
        self.run_chunk(chunk);
        self.pending.drain(..).collect()
    }

    /// Byte processor shared by [`RloginCodec::process_chunk`] and the
    /// [`Decoder`] implementation; queues events on `self.pending`.
    fn run_chunk(&mut self, chunk: &[u8]) {
        let mut chunk = chunk;
        if chunk.is_empty() {
            return;
        }
        if !self.connected {
            if chunk[0] == consts::HANDSHAKE_ACK {
                self.connected = true;
                debug!("server acknowledged the connection preamble");
                self.pending.push_back(RloginEvent::Established);
                chunk = &chunk[1..];
            } else {
                warn!(
                    "server rejected the connection preamble with 0x{:02X}",
                    chunk[0]
                );
                self.pending.push_back(RloginEvent::Disconnect);
                return;
            }
        }
        let mut emit = BytesMut::with_capacity(chunk.len());
        for (index, &byte) in chunk.iter().enumerate() {
            // In-band control bytes are consumed before anything else.
            // RAW and COOKED only act on a mode change; repeated, they
            // fall through and travel as data.
            match byte {
                consts::DISCARD => {
                    emit.clear();
                    continue;
                }
                consts::RAW if self.cooked => {
                    self.cooked = false;
                    self.suspend_output = false;
                    debug!("entering raw mode");
                    continue;
                }
                consts::COOKED if !self.cooked => {
                    self.cooked = true;
                    debug!("entering cooked mode");
                    continue;
                }
                consts::WINDOW => {
                    self.pending.push_back(RloginEvent::WindowSizeRequest);
                    continue;
                }
                _ => {}
            }
            // The client escape machinery runs on the inbound stream too:
            // the server's echo of a typed escape must not reach the
            // terminal, and it keeps the two directions' state in step.
            if self.watch_escape && byte == self.escape_char {
                self.watch_escape = false;
                self.escaped = true;
                continue;
            }
            if self.escaped {
                self.escaped = false;
                if self.apply_escape(byte) {
                    // Disconnect fired; the rest of the chunk is moot and
                    // nothing further is delivered.
                    self.pending.push_back(RloginEvent::Disconnect);
                    return;
                }
                continue;
            }
            // Cooked-mode flow control.
            if self.cooked && (byte == consts::XON || byte == consts::XOFF) {
                self.suspend_output = byte == consts::XOFF;
                continue;
            }
            // The escape watch re-arms after CR+LF or CAN. Any other
            // delivered byte disarms it, so a mid-line escape character is
            // literal data. The CR lookback is chunk-local.
            self.watch_escape = (index > 0
                && chunk[index - 1] == consts::CR
                && byte == consts::LF)
                || byte == consts::CAN;
            emit.put_u8(byte);
        }
        if !self.suspend_output && !emit.is_empty() {
            self.pending.push_back(RloginEvent::Data(emit.freeze()));
        }
    }

    /// Filters one buffer of user input, appending the bytes that survive
    /// to `dst`.
    ///
    /// The escape machinery and, in cooked mode, XON/XOFF interception are
    /// applied exactly as on the inbound path; user-typed XON/XOFF gate
    /// the delivery of the server's output. Input bytes never re-arm the
    /// escape watch; only inbound line boundaries do.
    ///
    /// The caller is expected to have checked
    /// [`RloginCodec::is_input_suspended`] before filtering; an escape
    /// inside the buffer can still suspend input mid-way, in which case
    /// the remainder is dropped.
    pub fn filter_input<T: BufMut>(&mut self, input: &[u8], dst: &mut T) -> InputDisposition {
        for &byte in input {
            if self.watch_escape && byte == self.escape_char {
                self.watch_escape = false;
                self.escaped = true;
                continue;
            }
            if self.escaped {
                self.escaped = false;
                if self.apply_escape(byte) {
                    return InputDisposition::DisconnectRequested;
                }
                if self.suspend_input {
                    return InputDisposition::Suspended;
                }
                continue;
            }
            if self.cooked && (byte == consts::XON || byte == consts::XOFF) {
                self.suspend_output = byte == consts::XOFF;
                continue;
            }
            dst.put_u8(byte);
        }
        InputDisposition::Forwarded
    }

    /// Applies the escape action bound to `suffix`, if any. An unbound
    /// suffix drops the byte. Returns true when the action is a
    /// disconnect.
    fn apply_escape(&mut self, suffix: u8) -> bool {
        match self.escapes.get_mut(suffix) {
            Some(EscapeAction::Disconnect) => {
                debug!("disconnect escape 0x{:02X} fired", suffix);
                true
            }
            Some(EscapeAction::ToggleSuspend) => {
                let suspended = !self.suspend_input;
                self.suspend_input = suspended;
                self.suspend_output = suspended;
                debug!("suspend escape fired, suspended: {}", suspended);
                false
            }
            Some(EscapeAction::ToggleSuspendInput) => {
                self.suspend_input = !self.suspend_input;
                self.suspend_output = false;
                debug!(
                    "suspend-input escape fired, input suspended: {}",
                    self.suspend_input
                );
                false
            }
            Some(EscapeAction::Custom(handler)) => {
                handler();
                false
            }
            None => false,
        }
    }
}

impl Default for RloginCodec {
    fn default() -> Self {
        RloginCodec {
            connected: false,
            cooked: true,
            suspend_input: false,
            suspend_output: false,
            watch_escape: true,
            escaped: false,
            escape_char: consts::DEFAULT_ESCAPE,
            escapes: EscapeTable::default(),
            pending: VecDeque::new(),
        }
    }
}

impl Decoder for RloginCodec {
    type Item = RloginEvent;
    type Error = CodecError;

    /// Decodes the accumulated read buffer into [`RloginEvent`]s.
    ///
    /// The whole buffer is consumed as one chunk on the first call after a
    /// read; subsequent calls drain the events that chunk produced, one
    /// per call, until `Ok(None)` signals the driver to read again. This
    /// preserves the chunk-scoped semantics of the DISCARD control byte
    /// under the usual `FramedRead` calling convention, which only appends
    /// to the buffer once the decoder has returned `Ok(None)`.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<RloginEvent>, Self::Error> {
        if self.pending.is_empty() && !src.is_empty() {
            let chunk = src.split_to(src.len());
            self.run_chunk(&chunk);
        }
        Ok(self.pending.pop_front())
    }
}

impl Encoder<&Handshake> for RloginCodec {
    type Error = CodecError;

    /// Encodes the connection preamble. The preamble is written as-is; no
    /// escape filtering applies before the connection is established.
    fn encode(&mut self, item: &Handshake, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.len());
        item.encode(dst)?;
        Ok(())
    }
}

impl Encoder<&WindowSize> for RloginCodec {
    type Error = CodecError;

    /// Encodes a Window Change Control Sequence. WCCS frames bypass the
    /// input filter; their bytes are protocol, not user data.
    fn encode(&mut self, item: &WindowSize, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.len());
        item.encode(dst)?;
        Ok(())
    }
}
