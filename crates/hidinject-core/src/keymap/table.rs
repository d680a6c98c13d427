//! Input key → HID report tables.
//!
//! Three tables are built at compile time and live in static memory for the
//! whole process:
//!
//! - [`TEXT`] – US-QWERTY printable characters plus newline, tab, space,
//!   escape and the terminal special keys.  Used for bulk typing.
//! - [`INTERACTIVE`] – everything in [`TEXT`] plus ctrl chords for the terminal
//!   control codes 1–26.  Used for live passthrough.
//! - [`HOTKEYS`] – a deliberately tiny table for driving hotkey-bound actions
//!   on the target (ctrl+shift+F-keys, ctrl+alt+del, print screen).
//!
//! A missing entry is a lookup miss (`None`), never a zero keycode.  Callers
//! must skip unmapped keys: sending a blank report for every unknown
//! character would look like stray keypresses on the target.

use crate::keymap::hid::{HidKeyCode, DIGIT_ROW, FUNCTION_KEYS, LETTERS};
use crate::report::{HidKeyReport, Modifiers};

/// Terminal control code produced by ctrl+`]`.
pub const CTRL_RIGHT_BRACKET: u8 = 0x1D;

/// ASCII escape.
pub const ESC: u8 = 0x1B;

/// Keys a terminal reports that have no ASCII representation of their own
/// (or whose ASCII form is ambiguous across terminals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SpecialKey {
    Backspace,
    Delete,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Escape,
    Tab,
}

impl SpecialKey {
    pub const COUNT: usize = 9;

    pub const ALL: [SpecialKey; SpecialKey::COUNT] = [
        SpecialKey::Backspace,
        SpecialKey::Delete,
        SpecialKey::ArrowUp,
        SpecialKey::ArrowDown,
        SpecialKey::ArrowLeft,
        SpecialKey::ArrowRight,
        SpecialKey::Enter,
        SpecialKey::Escape,
        SpecialKey::Tab,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// One captured or encoded key, before translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKey {
    /// A 7-bit character code, including terminal control codes.
    Ascii(u8),
    /// A key the terminal reports out of band.
    Special(SpecialKey),
}

impl InputKey {
    /// Returns the key for `c` if it is 7-bit ASCII.
    pub fn from_char(c: char) -> Option<InputKey> {
        if c.is_ascii() {
            Some(InputKey::Ascii(c as u8))
        } else {
            None
        }
    }
}

impl From<SpecialKey> for InputKey {
    fn from(key: SpecialKey) -> Self {
        InputKey::Special(key)
    }
}

/// An immutable key → report mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCodeTable {
    ascii: [Option<HidKeyReport>; 128],
    special: [Option<HidKeyReport>; SpecialKey::COUNT],
}

/// Unshifted/shifted character pairs sharing one physical punctuation key.
const PUNCTUATION: [(u8, u8, HidKeyCode); 11] = [
    (b'-', b'_', HidKeyCode::Minus),
    (b'=', b'+', HidKeyCode::Equal),
    (b'[', b'{', HidKeyCode::BracketLeft),
    (b']', b'}', HidKeyCode::BracketRight),
    (b'\\', b'|', HidKeyCode::Backslash),
    (b';', b':', HidKeyCode::Semicolon),
    (b'\'', b'"', HidKeyCode::Quote),
    (b'`', b'~', HidKeyCode::Backquote),
    (b',', b'<', HidKeyCode::Comma),
    (b'.', b'>', HidKeyCode::Period),
    (b'/', b'?', HidKeyCode::Slash),
];

const DIGITS: &[u8; 10] = b"1234567890";
const SHIFTED_DIGITS: &[u8; 10] = b"!@#$%^&*()";

impl KeyCodeTable {
    const fn empty() -> Self {
        Self {
            ascii: [None; 128],
            special: [None; SpecialKey::COUNT],
        }
    }

    const fn set(mut self, code: u8, report: HidKeyReport) -> Self {
        self.ascii[code as usize] = Some(report);
        self
    }

    const fn set_special(mut self, key: SpecialKey, report: HidKeyReport) -> Self {
        self.special[key.index()] = Some(report);
        self
    }

    /// Letters, digit row, punctuation, whitespace, escape, and special keys.
    const fn with_us_qwerty(mut self) -> Self {
        let mut i = 0;
        while i < LETTERS.len() {
            let key = LETTERS[i];
            self = self.set(b'a' + i as u8, HidKeyReport::plain(key));
            self = self.set(b'A' + i as u8, HidKeyReport::shifted(key));
            i += 1;
        }

        let mut i = 0;
        while i < DIGIT_ROW.len() {
            self = self.set(DIGITS[i], HidKeyReport::plain(DIGIT_ROW[i]));
            self = self.set(SHIFTED_DIGITS[i], HidKeyReport::shifted(DIGIT_ROW[i]));
            i += 1;
        }

        let mut i = 0;
        while i < PUNCTUATION.len() {
            let (plain, shifted, key) = PUNCTUATION[i];
            self = self.set(plain, HidKeyReport::plain(key));
            self = self.set(shifted, HidKeyReport::shifted(key));
            i += 1;
        }

        self = self
            .set(b'\n', HidKeyReport::plain(HidKeyCode::Enter))
            .set(b'\t', HidKeyReport::plain(HidKeyCode::Tab))
            .set(b' ', HidKeyReport::plain(HidKeyCode::Space))
            .set(ESC, HidKeyReport::plain(HidKeyCode::Escape));

        self.with_navigation()
    }

    const fn with_navigation(self) -> Self {
        self.set_special(SpecialKey::Backspace, HidKeyReport::plain(HidKeyCode::Backspace))
            .set_special(SpecialKey::Delete, HidKeyReport::plain(HidKeyCode::Delete))
            .set_special(SpecialKey::ArrowRight, HidKeyReport::plain(HidKeyCode::ArrowRight))
            .set_special(SpecialKey::ArrowLeft, HidKeyReport::plain(HidKeyCode::ArrowLeft))
            .set_special(SpecialKey::ArrowDown, HidKeyReport::plain(HidKeyCode::ArrowDown))
            .set_special(SpecialKey::ArrowUp, HidKeyReport::plain(HidKeyCode::ArrowUp))
            .set_special(SpecialKey::Enter, HidKeyReport::plain(HidKeyCode::Enter))
            .set_special(SpecialKey::Escape, HidKeyReport::plain(HidKeyCode::Escape))
            .set_special(SpecialKey::Tab, HidKeyReport::plain(HidKeyCode::Tab))
    }

    /// Terminal control codes 1..=26 as ctrl+letter.
    const fn with_ctrl_chords(mut self) -> Self {
        let mut i = 0;
        while i < LETTERS.len() {
            self = self.set(
                i as u8 + 1,
                HidKeyReport::new(Modifiers::CTRL, LETTERS[i]),
            );
            i += 1;
        }
        self
    }

    /// Table for bulk text typing.
    pub const fn text() -> Self {
        Self::empty().with_us_qwerty()
    }

    /// Table for live passthrough.  Tab (9) and newline (10) keep their
    /// plain meaning over ctrl+i / ctrl+j.
    pub const fn interactive() -> Self {
        Self::empty().with_ctrl_chords().with_us_qwerty()
    }

    /// Table for the hotkeys session: digits drive ctrl+shift+F1..F10, `d`
    /// sends ctrl+alt+del, `p` sends print screen.  Enter, escape and the
    /// arrows stay functional so modal dialogs on the target can be dismissed.
    pub const fn hotkeys() -> Self {
        let ctrl_shift = Modifiers::CTRL.with(Modifiers::SHIFT);
        let mut table = Self::empty();
        let mut i = 0;
        while i < DIGITS.len() {
            table = table.set(DIGITS[i], HidKeyReport::new(ctrl_shift, FUNCTION_KEYS[i]));
            i += 1;
        }
        table
            .set(
                b'd',
                HidKeyReport::new(Modifiers::CTRL.with(Modifiers::ALT), HidKeyCode::Delete),
            )
            .set(b'p', HidKeyReport::plain(HidKeyCode::PrintScreen))
            .set(b'\n', HidKeyReport::plain(HidKeyCode::Enter))
            .set(ESC, HidKeyReport::plain(HidKeyCode::Escape))
            .set_special(SpecialKey::Enter, HidKeyReport::plain(HidKeyCode::Enter))
            .set_special(SpecialKey::Escape, HidKeyReport::plain(HidKeyCode::Escape))
            .set_special(SpecialKey::ArrowRight, HidKeyReport::plain(HidKeyCode::ArrowRight))
            .set_special(SpecialKey::ArrowLeft, HidKeyReport::plain(HidKeyCode::ArrowLeft))
            .set_special(SpecialKey::ArrowDown, HidKeyReport::plain(HidKeyCode::ArrowDown))
            .set_special(SpecialKey::ArrowUp, HidKeyReport::plain(HidKeyCode::ArrowUp))
    }

    /// Looks up the report for `key`.  Never fails; a miss means "unsupported".
    pub fn lookup(&self, key: InputKey) -> Option<HidKeyReport> {
        match key {
            InputKey::Ascii(code) => self.ascii.get(usize::from(code)).copied().flatten(),
            InputKey::Special(special) => self.special[special.index()],
        }
    }

    /// Shorthand for `lookup(InputKey::Ascii(byte))`.
    pub fn lookup_byte(&self, byte: u8) -> Option<HidKeyReport> {
        self.lookup(InputKey::Ascii(byte))
    }

    /// Number of keys with an entry.
    pub fn len(&self) -> usize {
        self.ascii.iter().chain(self.special.iter()).flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over every mapped key and its report.
    pub fn entries(&self) -> impl Iterator<Item = (InputKey, HidKeyReport)> + '_ {
        let ascii = self
            .ascii
            .iter()
            .enumerate()
            .filter_map(|(code, r)| r.map(|r| (InputKey::Ascii(code as u8), r)));
        let special = SpecialKey::ALL
            .into_iter()
            .filter_map(move |k| self.special[k.index()].map(|r| (InputKey::Special(k), r)));
        ascii.chain(special)
    }
}

/// Bulk typing table.
pub static TEXT: KeyCodeTable = KeyCodeTable::text();

/// Live passthrough table.
pub static INTERACTIVE: KeyCodeTable = KeyCodeTable::interactive();

/// Hotkeys session table.
pub static HOTKEYS: KeyCodeTable = KeyCodeTable::hotkeys();
