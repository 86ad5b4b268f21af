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

//! # Rloginix RLOGIN Protocol Codec
//!
//! This crate provides the client-side codec for the RLOGIN remote-login
//! protocol (RFC 1282): the connection preamble, the in-band control byte
//! stream, the client escape mechanism, and the Window Change Control
//! Sequence. It is designed to work with asynchronous networking libraries
//! like Tokio and provides a stateful, byte-oriented interface that is
//! independent of any particular transport.
//!
//! ## Overview
//!
//! RLOGIN carries a full-duplex byte stream between a user-side process and
//! a remote shell over TCP (traditionally port 513). Unlike Telnet, it has
//! no option negotiation; a handful of in-band control bytes from the
//! server steer the client's line discipline:
//!
//! - **Flow control**: XON/XOFF gate output delivery while in cooked mode
//! - **Line discipline**: raw and cooked mode switches
//! - **Output discard**: drop data that is buffered but not yet delivered
//! - **Window size**: solicit a geometry report from the client
//!
//! On the user side, a configurable escape character (default `~`) at a
//! line boundary captures the next byte as a local command, the most
//! familiar being `~.` to disconnect.
//!
//! ## Core Components
//!
//! ### [`RloginCodec`]
//!
//! The main codec structure and the connection state machine. It
//! implements the [`Decoder`] trait from `tokio_util::codec` for inbound
//! processing and [`Encoder`] for the client-to-server frames, and exposes
//! [`RloginCodec::filter_input`] for screening user input on its way to
//! the wire.
//!
//! ### [`RloginEvent`]
//!
//! User-facing events decoded from the server stream: the handshake
//! acknowledgement, user-visible data, a window size request, and the
//! end of the connection.
//!
//! ### [`Handshake`]
//!
//! The four-string preamble sent once at connection start.
//!
//! ### [`WindowSize`]
//!
//! Terminal geometry plus its Window Change Control Sequence wire format.
//!
//! ### [`EscapeTable`]
//!
//! The `suffix byte -> action` dispatch table behind the client escape
//! mechanism, seeded with the standard `~.`, `~^D`, `~^Z` and `~^Y`
//! bindings and extensible at runtime.
//!
//! ## Usage Example
//!
//! ```rust
//! use rloginix_rlogincodec::{RloginCodec, RloginEvent};
//! use bytes::BytesMut;
//! use tokio_util::codec::Decoder;
//!
//! let mut codec = RloginCodec::new();
//!
//! // The server acknowledges the preamble and greets us in one chunk.
//! let mut input = BytesMut::from(&b"\x00Welcome"[..]);
//! let mut events = Vec::new();
//! while let Some(event) = codec.decode(&mut input).unwrap() {
//!     events.push(event);
//! }
//! assert_eq!(events[0], RloginEvent::Established);
//! assert_eq!(events[1], RloginEvent::Data("Welcome".into()));
//! ```
//!
//! ## Protocol Details
//!
//! ### Connection preamble
//!
//! ```text
//! 00 <client-username> 00 <server-username> 00 <terminal-type> "/" <speed> 00
//! ```
//!
//! The server answers with a single zero byte once it accepts the
//! connection; anything else is a rejection.
//!
//! ### In-band control bytes (server to client)
//!
//! | Byte | Meaning |
//! |------|---------|
//! | 0x02 | Discard pending output from the current chunk |
//! | 0x10 | Enter raw mode |
//! | 0x11 | XON, resume output (cooked only) |
//! | 0x13 | XOFF, suspend output (cooked only) |
//! | 0x20 | Enter cooked mode |
//! | 0x80 | Request a window size report |
//!
//! ### Window Change Control Sequence (client to server)
//!
//! ```text
//! FF FF 73 73  rows:u16le  columns:u16le  pixels_x:u16le  pixels_y:u16le
//! ```
//!
//! ## Thread Safety
//!
//! `RloginCodec` is **not** thread-safe and should not be shared between
//! threads without synchronization. Each connection owns its own codec
//! instance.
//!
//! ## Related RFCs
//!
//! - RFC 1282: BSD Rlogin

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

pub mod consts;

mod codec;
mod escape;
mod event;
mod handshake;
mod result;
mod window;

pub use self::codec::{InputDisposition, RloginCodec};
pub use self::escape::{EscapeAction, EscapeHandler, EscapeTable};
pub use self::event::RloginEvent;
pub use self::handshake::Handshake;
pub use self::result::{CodecError, CodecResult};
pub use self::window::WindowSize;

#[cfg(test)]
mod tests {
    use super::{consts, RloginCodec, RloginEvent};
    use bytes::BytesMut;
    use tokio_util::codec::Decoder;

    fn decode_all(codec: &mut RloginCodec, buffer: &mut BytesMut) -> Vec<RloginEvent> {
        let mut events = Vec::new();
        while let Some(event) = codec.decode(buffer).unwrap() {
            events.push(event);
        }
        events
    }

    #[test]
    fn handshake_ack_then_data() {
        let mut codec = RloginCodec::new();
        let mut buffer = BytesMut::from(&b"\x00Welcome"[..]);
        let events = decode_all(&mut codec, &mut buffer);
        assert_eq!(
            events,
            vec![
                RloginEvent::Established,
                RloginEvent::Data("Welcome".into()),
            ],
        );
        assert!(codec.is_connected());
    }

    #[test]
    fn handshake_rejected() {
        let mut codec = RloginCodec::new();
        let mut buffer = BytesMut::from(&[0x01, b'n', b'o'][..]);
        let events = decode_all(&mut codec, &mut buffer);
        assert_eq!(events, vec![RloginEvent::Disconnect]);
        assert!(!codec.is_connected());
    }

    #[test]
    fn window_request_decoded() {
        let mut codec = RloginCodec::new();
        let mut buffer = BytesMut::from(&[consts::HANDSHAKE_ACK, consts::WINDOW][..]);
        let events = decode_all(&mut codec, &mut buffer);
        assert_eq!(
            events,
            vec![RloginEvent::Established, RloginEvent::WindowSizeRequest],
        );
    }

    #[test]
    fn decoder_treats_buffer_as_one_chunk() {
        let mut codec = RloginCodec::new();
        let mut buffer = BytesMut::from(&b"\x00abc\x02def"[..]);
        let events = decode_all(&mut codec, &mut buffer);
        // DISCARD wipes "abc"; only the tail of the chunk survives.
        assert_eq!(
            events,
            vec![RloginEvent::Established, RloginEvent::Data("def".into())],
        );
    }
}
