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

//! Client escape dispatch
//!
//! A client escape is a two-byte sequence: the escape character (default
//! `~`) followed by a suffix byte looked up in an [`EscapeTable`]. The
//! escape character only triggers at line boundaries, mirroring the BSD
//! rlogin user interface.

use crate::consts;
use std::collections::HashMap;

/// Handler installed for a user-defined client escape.
///
/// Handlers take no arguments and return nothing; they are fire-and-forget
/// callbacks invoked from within the byte processor. Side effects travel
/// through whatever the closure captures.
pub type EscapeHandler = Box<dyn FnMut() + Send>;

/// Action taken when a client escape sequence completes.
pub enum EscapeAction {
    /// Tear the connection down (`~.` and `~^D`).
    Disconnect,
    /// Toggle input and output suspension together (`~^Z`). The two flags
    /// move in lockstep.
    ToggleSuspend,
    /// Toggle input suspension and force output back on (`~^Y`).
    ToggleSuspendInput,
    /// A user-installed handler.
    Custom(EscapeHandler),
}

impl std::fmt::Debug for EscapeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EscapeAction::Disconnect => write!(f, "Disconnect"),
            EscapeAction::ToggleSuspend => write!(f, "ToggleSuspend"),
            EscapeAction::ToggleSuspendInput => write!(f, "ToggleSuspendInput"),
            EscapeAction::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Dispatch table mapping escape suffix bytes to actions.
///
/// Seeded with the four standard bindings; entries can be added or
/// replaced at runtime.
///
/// # Example
/// ```
/// use rloginix_rlogincodec::{EscapeAction, EscapeTable};
///
/// let mut table = EscapeTable::new();
/// assert!(table.is_bound(0x2E));
/// table.bind(b'!', EscapeAction::Custom(Box::new(|| println!("bang"))));
/// assert!(table.is_bound(b'!'));
/// ```
#[derive(Debug)]
pub struct EscapeTable {
    entries: HashMap<u8, EscapeAction>,
}

impl EscapeTable {
    /// Creates a table with the standard bindings installed.
    pub fn new() -> Self {
        EscapeTable::default()
    }

    /// Installs or replaces the binding for a suffix byte.
    pub fn bind(&mut self, suffix: u8, action: EscapeAction) {
        self.entries.insert(suffix, action);
    }

    /// Checks whether a suffix byte has a binding.
    pub fn is_bound(&self, suffix: u8) -> bool {
        self.entries.contains_key(&suffix)
    }

    /// Mutable access for the byte processor; `Custom` handlers are
    /// `FnMut` and need it.
    pub(crate) fn get_mut(&mut self, suffix: u8) -> Option<&mut EscapeAction> {
        self.entries.get_mut(&suffix)
    }
}

impl Default for EscapeTable {
    fn default() -> Self {
        let mut entries = HashMap::new();
        entries.insert(consts::escape::DISCONNECT, EscapeAction::Disconnect);
        entries.insert(consts::escape::EOT, EscapeAction::Disconnect);
        entries.insert(consts::escape::SUB, EscapeAction::ToggleSuspend);
        entries.insert(consts::escape::EOM, EscapeAction::ToggleSuspendInput);
        EscapeTable { entries }
    }
}
