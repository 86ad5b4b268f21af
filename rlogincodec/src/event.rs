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

use bytes::Bytes;

///
/// `RloginEvent` represents user-facing events decoded from the server's
/// byte stream. In-band control bytes never surface here; they are consumed
/// by the codec and reflected either in its mode flags or in one of the
/// non-data events below.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RloginEvent {
    /// The server acknowledged the connection preamble with a zero byte.
    /// Emitted exactly once per connection, before any `Data` event.
    Established,
    /// User-visible data. At most one `Data` event is produced per inbound
    /// chunk, and its bytes preserve the order they arrived in.
    Data(Bytes),
    /// The server asked for a window size report. The client should answer
    /// with a Window Change Control Sequence.
    WindowSizeRequest,
    /// The connection is over: the server rejected the preamble, or a
    /// disconnect escape fired.
    Disconnect,
}
