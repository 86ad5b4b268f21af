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

//! Client error types

use thiserror::Error;

/// Client result type
pub type Result<T> = std::result::Result<T, ClientError>;

/// Validation errors raised when constructing or mutating client settings.
///
/// These are always raised synchronously at the call site and leave the
/// configuration or connection state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required connection option was never supplied
    #[error("Missing required option: '{0}'")]
    MissingOption(&'static str),

    /// An option or property was set to an unusable value
    #[error("Invalid '{name}' setting {value}")]
    InvalidSetting {
        /// Name of the option or property
        name: &'static str,
        /// The rejected value, rendered for the message
        value: String,
    },

    /// `add_client_escape` was handed a string that is not one character
    #[error("add_client_escape: invalid string argument")]
    InvalidEscapeArgument,
}

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// I/O error from the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The dial or handshake did not complete within the timeout
    #[error("Connection timeout")]
    ConnectionTimeout,

    /// The server closed the connection
    #[error("Connection closed by server")]
    ConnectionClosed,

    /// The server answered the connection preamble with something other
    /// than the zero acknowledgement byte
    #[error("Handshake rejected by server")]
    HandshakeRejected,

    /// The operation requires a live connection
    #[error("RLogin client not connected")]
    NotConnected,

    /// User input is currently suspended by a client escape
    #[error("input has been suspended")]
    InputSuspended,

    /// Configuration or property validation failed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Protocol encoding failed
    #[error("Codec error: {0}")]
    Codec(#[from] rloginix_rlogincodec::CodecError),
}
