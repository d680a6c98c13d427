//! Key code translation tables.
//!
//! The canonical output representation is USB HID Usage IDs (page 0x07,
//! Keyboard/Keypad).  Input keys are 7-bit character codes or terminal special
//! keys, translated by one of the static tables in [`table`].

pub mod hid;
pub mod table;

use serde::{Deserialize, Serialize};

pub use hid::HidKeyCode;
pub use table::{InputKey, KeyCodeTable, SpecialKey, HOTKEYS, INTERACTIVE, TEXT};

/// Selects one of the built-in tables by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeymapProfile {
    /// Printable US-QWERTY text.
    Text,
    /// Text plus ctrl chords, for live typing.
    #[default]
    Interactive,
    /// Hotkey actions only.
    Hotkeys,
}

impl KeymapProfile {
    /// Returns the static table for this profile.
    pub fn table(self) -> &'static KeyCodeTable {
        match self {
            KeymapProfile::Text => &TEXT,
            KeymapProfile::Interactive => &INTERACTIVE,
            KeymapProfile::Hotkeys => &HOTKEYS,
        }
    }
}
