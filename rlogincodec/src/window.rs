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

//! Window Change Control Sequence
//!

use crate::consts;
use crate::result::{CodecError, CodecResult};
use byteorder::{LittleEndian, WriteBytesExt};
use bytes::{Buf, BufMut};

/// Terminal geometry reported to the server in a Window Change Control
/// Sequence (WCCS).
///
/// The server solicits a WCCS with the in-band `0x80` control byte; the
/// client answers with a 12-byte frame carrying its current geometry.
///
/// # Format
/// ```text
/// FF FF 73 73  rows:u16  columns:u16  pixels_x:u16  pixels_y:u16
/// ```
/// All four fields are little-endian.
///
/// # Example
/// ```
/// use rloginix_rlogincodec::WindowSize;
///
/// let size = WindowSize::new(24, 80, 640, 480);
/// assert_eq!(size, WindowSize::default());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowSize {
    /// The number of rows (lines) in the terminal window
    pub rows: u16,
    /// The number of columns (characters) in the terminal window
    pub columns: u16,
    /// The horizontal window size in pixels
    pub pixels_x: u16,
    /// The vertical window size in pixels
    pub pixels_y: u16,
}

impl WindowSize {
    /// Creates a new `WindowSize` with the specified geometry.
    pub fn new(rows: u16, columns: u16, pixels_x: u16, pixels_y: u16) -> Self {
        WindowSize {
            rows,
            columns,
            pixels_x,
            pixels_y,
        }
    }

    /// Returns the encoded length of a WCCS frame in bytes.
    ///
    /// The frame always occupies exactly 12 bytes: the 4-byte magic prefix
    /// followed by four u16 fields.
    pub fn len(&self) -> usize {
        consts::WCCS_LEN
    }

    /// Encodes this geometry as a WCCS frame into a byte buffer.
    ///
    /// # Errors
    /// Returns a `CodecError` if the underlying write fails.
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        Ok(self.write(&mut dst.writer())?)
    }

    /// Writes this geometry as a WCCS frame to a writer.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if writing fails.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        writer.write_all(&consts::WCCS_MAGIC)?;
        writer.write_u16::<LittleEndian>(self.rows)?;
        writer.write_u16::<LittleEndian>(self.columns)?;
        writer.write_u16::<LittleEndian>(self.pixels_x)?;
        writer.write_u16::<LittleEndian>(self.pixels_y)?;
        Ok(consts::WCCS_LEN)
    }

    /// Decodes a WCCS frame from a byte buffer.
    ///
    /// # Errors
    /// Returns `CodecError::InsufficientData` if fewer than 12 bytes are
    /// available, or `CodecError::BadMagic` if the frame does not start
    /// with the WCCS magic prefix.
    ///
    /// # Example
    /// ```
    /// use bytes::BytesMut;
    /// use rloginix_rlogincodec::WindowSize;
    ///
    /// let mut buf = BytesMut::from(
    ///     &[0xFF, 0xFF, 0x73, 0x73, 0x18, 0x00, 0x50, 0x00, 0x80, 0x02, 0xE0, 0x01][..],
    /// );
    /// let size = WindowSize::decode(&mut buf).unwrap();
    /// assert_eq!(size, WindowSize::new(24, 80, 640, 480));
    /// ```
    pub fn decode<T: Buf>(src: &mut T) -> CodecResult<WindowSize> {
        if src.remaining() < consts::WCCS_LEN {
            return Err(CodecError::InsufficientData {
                required: consts::WCCS_LEN,
                available: src.remaining(),
            });
        }
        let mut magic = [0u8; 4];
        src.copy_to_slice(&mut magic);
        if magic != consts::WCCS_MAGIC {
            return Err(CodecError::BadMagic { found: magic });
        }
        Ok(WindowSize {
            rows: src.get_u16_le(),
            columns: src.get_u16_le(),
            pixels_x: src.get_u16_le(),
            pixels_y: src.get_u16_le(),
        })
    }
}

impl Default for WindowSize {
    /// Returns the traditional 80x24 terminal with a 640x480 pixel window,
    /// the geometry assumed when the caller never sets one.
    fn default() -> Self {
        WindowSize {
            rows: 24,
            columns: 80,
            pixels_x: 640,
            pixels_y: 480,
        }
    }
}

impl std::fmt::Display for WindowSize {
    /// Formats the geometry as `(cols x rows, px x py px)`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}x{}, {}x{}px)",
            self.columns, self.rows, self.pixels_x, self.pixels_y
        )
    }
}
