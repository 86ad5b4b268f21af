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

/// Result Type for Codec Operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Represents possible errors that can occur while encoding or decoding
/// RLOGIN frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// An I/O error occurred while reading from or writing to the underlying stream.
    IOError {
        /// The kind of I/O error that occurred
        kind: std::io::ErrorKind,
        /// Description of the operation that failed
        operation: String,
    },

    /// Insufficient bytes were available to decode a complete frame.
    InsufficientData {
        /// Number of bytes required
        required: usize,
        /// Number of bytes available
        available: usize,
    },

    /// A frame began with bytes other than the expected WCCS magic prefix.
    BadMagic {
        /// The four bytes found in place of the magic prefix
        found: [u8; 4],
    },

    /// A connection preamble field was empty.
    ///
    /// All four preamble fields must carry at least one byte; the server
    /// reads them as NUL-terminated strings.
    EmptyHandshakeField {
        /// Name of the offending field
        field: &'static str,
    },

    /// A connection preamble field contained an embedded NUL byte.
    ///
    /// NUL terminates each field on the wire, so an embedded NUL would
    /// desynchronise the server's view of the preamble.
    EmbeddedNul {
        /// Name of the offending field
        field: &'static str,
    },

    /// The terminal speed was zero.
    ZeroTerminalSpeed,
}

impl std::error::Error for CodecError {}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::IOError { kind, operation } => {
                write!(f, "I/O error during {}: {:?}", operation, kind)
            }
            CodecError::InsufficientData {
                required,
                available,
            } => {
                write!(
                    f,
                    "insufficient data (required: {}, available: {})",
                    required, available
                )
            }
            CodecError::BadMagic { found } => {
                write!(
                    f,
                    "bad frame magic: {:02X} {:02X} {:02X} {:02X}",
                    found[0], found[1], found[2], found[3]
                )
            }
            CodecError::EmptyHandshakeField { field } => {
                write!(f, "handshake field '{}' is empty", field)
            }
            CodecError::EmbeddedNul { field } => {
                write!(f, "handshake field '{}' contains an embedded NUL", field)
            }
            CodecError::ZeroTerminalSpeed => {
                write!(f, "terminal speed must be greater than zero")
            }
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::IOError {
            kind: err.kind(),
            operation: err.to_string(),
        }
    }
}
