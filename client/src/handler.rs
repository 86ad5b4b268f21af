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

//! Connection event handler trait

use crate::{ClientError, RloginConnection};
use async_trait::async_trait;

/// Connection event handler trait
///
/// Implement this trait to observe events from an RLOGIN connection. All
/// methods have default implementations that do nothing, so a handler only
/// spells out what it cares about.
///
/// Events are dispatched from the connection's reader task, one at a time
/// and in arrival order; `on_close` is delivered exactly once per
/// connection, after which no further events follow.
///
/// # Example
///
/// ```no_run
/// use rloginix_client::{ConnectionHandler, RloginConnection};
/// use async_trait::async_trait;
///
/// struct Printer;
///
/// #[async_trait]
/// impl ConnectionHandler for Printer {
///     async fn on_data(&self, _conn: &RloginConnection, data: &[u8]) {
///         print!("{}", String::from_utf8_lossy(data));
///     }
///
///     async fn on_close(&self, _conn: &RloginConnection) {
///         println!("\nconnection closed");
///     }
/// }
/// ```
#[async_trait]
pub trait ConnectionHandler: Send + Sync + 'static {
    /// Called once the server has acknowledged the connection preamble,
    /// before any data is delivered
    async fn on_connect(&self, _conn: &RloginConnection) {}

    /// Called with user-visible data; in-band control bytes and escape
    /// sequences have already been stripped
    async fn on_data(&self, _conn: &RloginConnection, _data: &[u8]) {}

    /// Called exactly once when the connection is torn down, whether by
    /// `disconnect`, a disconnect escape, or the server going away
    async fn on_close(&self, _conn: &RloginConnection) {}

    /// Called when the transport reports an error; teardown follows
    async fn on_error(&self, _conn: &RloginConnection, _error: ClientError) {}
}
