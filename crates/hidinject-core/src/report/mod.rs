//! The 3-byte keyboard report delivered on every interrupt-IN poll.
//!
//! Layout (3 bytes):
//! ```text
//! Byte 0: Modifier mask (bitfield)
//!         Bit 0 = Ctrl, Bit 1 = Shift, Bit 2 = Alt, Bit 3 = GUI
//! Byte 1: Reserved (always 0x00)
//! Byte 2: Key code (USB HID usage ID, 0x00 = no key)
//! ```
//!
//! This is a single-key variant of the boot keyboard report: the report
//! descriptor in [`descriptor`] declares a keycode array of exactly one
//! element, so at most one non-modifier key is reported per poll.

pub mod descriptor;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::keymap::hid::HidKeyCode;

/// Report size in bytes.
pub const REPORT_LEN: usize = 3;

/// Modifier mask carried in byte 0 of every report.
///
/// Bits combine freely: `Modifiers::CTRL | Modifiers::ALT` is ctrl+alt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(1 << 0);
    pub const SHIFT: Modifiers = Modifiers(1 << 1);
    pub const ALT: Modifiers = Modifiers(1 << 2);
    pub const GUI: Modifiers = Modifiers(1 << 3);

    /// Returns the union of two masks; usable in `const` tables.
    pub const fn with(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// Returns `true` if every bit of `other` is set in `self`.
    pub const fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        self.with(rhs)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Modifiers, &str); 4] = [
            (Modifiers::CTRL, "ctrl"),
            (Modifiers::SHIFT, "shift"),
            (Modifiers::ALT, "alt"),
            (Modifiers::GUI, "gui"),
        ];
        let mut first = true;
        for (flag, name) in NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str("+")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str("none")?;
        }
        Ok(())
    }
}

/// A single keyboard report: modifier mask, reserved byte, one key code.
///
/// Reports are immutable values.  The reserved byte is not stored because it
/// is always zero on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HidKeyReport {
    pub modifiers: Modifiers,
    pub key: HidKeyCode,
}

/// The all-zero "no key pressed" report.
///
/// Used both as the key-up sentinel after every key-down and as idle filler
/// while waiting for the host to finish reacting to a previous keystroke.
pub const KEY_UP: HidKeyReport = HidKeyReport::new(Modifiers::NONE, HidKeyCode::None);

impl HidKeyReport {
    pub const fn new(modifiers: Modifiers, key: HidKeyCode) -> Self {
        Self { modifiers, key }
    }

    /// A report for `key` with no modifiers held.
    pub const fn plain(key: HidKeyCode) -> Self {
        Self::new(Modifiers::NONE, key)
    }

    /// A report for `key` with shift held.
    pub const fn shifted(key: HidKeyCode) -> Self {
        Self::new(Modifiers::SHIFT, key)
    }

    /// Returns `true` if this is the all-zero key-up sentinel.
    pub const fn is_key_up(&self) -> bool {
        self.modifiers.is_empty() && self.key.is_none()
    }

    /// Serialises the report into its 3-byte wire form.
    pub const fn to_bytes(self) -> [u8; REPORT_LEN] {
        [self.modifiers.bits(), 0x00, self.key.as_u8()]
    }

    /// Parses a 3-byte wire report.
    ///
    /// Returns `None` if the reserved byte is non-zero or the key code is not
    /// a usage this keyboard can report.
    pub fn from_bytes(bytes: [u8; REPORT_LEN]) -> Option<Self> {
        if bytes[1] != 0 {
            return None;
        }
        let key = HidKeyCode::from_u8(bytes[2])?;
        Some(Self::new(Modifiers(bytes[0]), key))
    }
}

impl Default for HidKeyReport {
    fn default() -> Self {
        KEY_UP
    }
}

impl fmt::Display for HidKeyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [m, r, k] = self.to_bytes();
        write!(f, "{m:02x} {r:02x} {k:02x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_up_serializes_to_all_zero_bytes() {
        assert_eq!(KEY_UP.to_bytes(), [0x00, 0x00, 0x00]);
        assert!(KEY_UP.is_key_up());
    }

    #[test]
    fn test_shifted_report_sets_shift_bit_in_byte_zero() {
        // Arrange
        let report = HidKeyReport::shifted(HidKeyCode::KeyH);

        // Act
        let bytes = report.to_bytes();

        // Assert
        assert_eq!(bytes, [0x02, 0x00, 0x0B]);
        assert!(!report.is_key_up());
    }

    #[test]
    fn test_modifier_bits_combine() {
        let ctrl_alt = Modifiers::CTRL | Modifiers::ALT;
        assert_eq!(ctrl_alt.bits(), 5);
        assert!(ctrl_alt.contains(Modifiers::CTRL));
        assert!(ctrl_alt.contains(Modifiers::ALT));
        assert!(!ctrl_alt.contains(Modifiers::SHIFT));
    }

    #[test]
    fn test_modifier_only_report_is_not_key_up() {
        let report = HidKeyReport::new(Modifiers::SHIFT, HidKeyCode::None);
        assert!(!report.is_key_up());
    }

    #[test]
    fn test_from_bytes_rejects_non_zero_reserved_byte() {
        assert_eq!(HidKeyReport::from_bytes([0x00, 0x01, 0x04]), None);
    }

    #[test]
    fn test_from_bytes_rejects_unreportable_key_code() {
        assert_eq!(HidKeyReport::from_bytes([0x00, 0x00, 0xE0]), None);
    }

    #[test]
    fn test_from_bytes_accepts_ctrl_alt_t() {
        let parsed = HidKeyReport::from_bytes([0x05, 0x00, 0x17]);
        assert_eq!(
            parsed,
            Some(HidKeyReport::new(Modifiers::CTRL | Modifiers::ALT, HidKeyCode::KeyT))
        );
    }

    #[test]
    fn test_display_renders_hex_triple() {
        let report = HidKeyReport::shifted(HidKeyCode::Digit1);
        assert_eq!(report.to_string(), "02 00 1e");
    }

    #[test]
    fn test_modifiers_display_names_each_bit() {
        assert_eq!(Modifiers::NONE.to_string(), "none");
        assert_eq!((Modifiers::CTRL | Modifiers::SHIFT).to_string(), "ctrl+shift");
    }
}
