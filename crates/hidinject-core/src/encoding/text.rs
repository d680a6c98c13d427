//! Bulk text typing and the "save file" here-document framing.
//!
//! The text encoder walks its input one byte at a time and pushes one
//! key-down (with its automatic key-up) per mapped byte.  Bytes that have no
//! entry in the table are skipped and recorded in the returned
//! [`EncodeSummary`]; they never abort the batch.
//!
//! # Saving a file on the target (for beginners)
//!
//! The device cannot transfer files, but it can type.  To recreate a file on
//! the target, it types a shell here-document into an open terminal:
//!
//! ```text
//! cat > notes.txt << EOL
//! ...file content, byte for byte...
//! EOL
//! ```
//!
//! The shell reads everything up to the terminator line and writes it to the
//! named file.  The content is not escaped, so a line consisting of just the
//! terminator would end the document early; pick a terminator that does not
//! occur in the file.

use tracing::{debug, warn};

use crate::domain::queue::ReportQueue;
use crate::keymap::table::KeyCodeTable;

/// A byte that had no mapping and was left out of the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedByte {
    /// Position within the typed stream (framing included).
    pub offset: usize,
    pub byte: u8,
}

/// Result of one encode call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeSummary {
    /// Bytes that produced a key press.
    pub encoded: usize,
    /// Bytes that were skipped, in input order.
    pub skipped: Vec<SkippedByte>,
}

impl EncodeSummary {
    /// Returns `true` when every byte was typed.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Reports this summary occupies in the queue.
    pub fn report_count(&self) -> usize {
        self.encoded * 2
    }
}

/// Shell here-document framing for [`TextEncoder::save_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HereDocument {
    terminator: String,
}

impl HereDocument {
    pub const DEFAULT_TERMINATOR: &'static str = "EOL";

    pub fn new(terminator: impl Into<String>) -> Self {
        Self {
            terminator: terminator.into(),
        }
    }

    pub fn terminator(&self) -> &str {
        &self.terminator
    }

    /// The opening line: `cat > {name} << {terminator}` plus newline.
    pub fn header(&self, file_name: &str) -> String {
        format!("cat > {} << {}\n", file_name, self.terminator)
    }

    /// The closing line: the terminator plus newline.
    pub fn footer(&self) -> String {
        format!("{}\n", self.terminator)
    }

    /// Returns `true` if a line of `content` equals the terminator, which
    /// would end the document before the content does.
    pub fn collides_with(&self, content: &[u8]) -> bool {
        let needle = self.terminator.as_bytes();
        content
            .split(|&b| b == b'\n')
            .any(|line| line.strip_suffix(b"\r").unwrap_or(line) == needle)
    }
}

impl Default for HereDocument {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TERMINATOR)
    }
}

/// Types byte strings through a [`KeyCodeTable`].
#[derive(Debug, Clone, Copy)]
pub struct TextEncoder {
    table: &'static KeyCodeTable,
}

impl TextEncoder {
    pub fn new(table: &'static KeyCodeTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'static KeyCodeTable {
        self.table
    }

    /// Appends one key press per mapped byte of `text` to `queue`.
    ///
    /// ```rust
    /// use hidinject_core::{ReportQueue, TextEncoder};
    /// use hidinject_core::keymap::TEXT;
    ///
    /// let mut queue = ReportQueue::new();
    /// let summary = TextEncoder::new(&TEXT).encode(&mut queue, "Hi!");
    /// assert_eq!(summary.encoded, 3);
    /// assert_eq!(queue.len(), 6);
    /// ```
    pub fn encode(&self, queue: &mut ReportQueue, text: impl AsRef<[u8]>) -> EncodeSummary {
        let mut summary = EncodeSummary::default();
        self.encode_at(queue, text.as_ref(), 0, &mut summary);
        if !summary.is_complete() {
            warn!(
                skipped = summary.skipped.len(),
                encoded = summary.encoded,
                "some bytes have no key mapping and were not typed"
            );
        }
        summary
    }

    /// Types the here-document that recreates `content` as `file_name` on
    /// the target: header, content verbatim, footer.
    ///
    /// Skipped offsets count from the first byte of the header.
    pub fn save_file(
        &self,
        queue: &mut ReportQueue,
        file_name: &str,
        content: impl AsRef<[u8]>,
        framing: &HereDocument,
    ) -> EncodeSummary {
        let content = content.as_ref();
        let header = framing.header(file_name);
        let footer = framing.footer();

        if framing.collides_with(content) {
            warn!(
                terminator = framing.terminator(),
                "file contains the here-document terminator on its own line; the saved file will be truncated"
            );
        }
        if !content.is_empty() && !content.ends_with(b"\n") {
            warn!("file does not end with a newline; the terminator will be joined to its last line");
        }

        let mut summary = EncodeSummary::default();
        let mut offset = 0;
        for segment in [header.as_bytes(), content, footer.as_bytes()] {
            self.encode_at(queue, segment, offset, &mut summary);
            offset += segment.len();
        }

        debug!(
            file_name,
            bytes = content.len(),
            encoded = summary.encoded,
            skipped = summary.skipped.len(),
            "save-file sequence queued"
        );
        if !summary.is_complete() {
            warn!(
                skipped = summary.skipped.len(),
                "some bytes have no key mapping and were not typed"
            );
        }
        summary
    }

    fn encode_at(
        &self,
        queue: &mut ReportQueue,
        bytes: &[u8],
        base: usize,
        summary: &mut EncodeSummary,
    ) {
        for (i, &byte) in bytes.iter().enumerate() {
            match self.table.lookup_byte(byte) {
                Some(report) => {
                    queue.push_keydown(report);
                    summary.encoded += 1;
                }
                None => {
                    debug!(offset = base + i, byte, "unmapped byte skipped");
                    summary.skipped.push(SkippedByte {
                        offset: base + i,
                        byte,
                    });
                }
            }
        }
    }
}
