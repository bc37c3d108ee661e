//! Text-mode byte accumulator.
//!
//! Text, feeds, codepage switches and drawer pulses are appended here and
//! reach the printer in one write when the buffer is flushed: before an
//! image, and once at the end of the job.

use tracing::debug;

use crate::error::OperationError;
use crate::protocol::codepage::Codepage;
use crate::protocol::commands;

/// Ordered bytes pending transmission, plus the active codepage.
///
/// The codepage survives [`TextBuffer::take`]: the printer keeps its
/// selected table until told otherwise.
#[derive(Debug, Default)]
pub struct TextBuffer {
    bytes: Vec<u8>,
    codepage: Codepage,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` encoded with the active codepage.
    pub fn write_text(&mut self, text: &str) {
        self.bytes.extend(self.codepage.encode(text));
    }

    pub fn feed(&mut self, lines: usize) {
        self.bytes.extend(commands::line_feeds(lines));
    }

    pub fn push(&mut self, command: &[u8]) {
        self.bytes.extend_from_slice(command);
    }

    /// Switch to `label`, emitting `ESC t table` when a table is given.
    ///
    /// Both values are checked before anything changes; on error the buffer
    /// is untouched.
    pub fn select_codepage(&mut self, table: Option<i64>, label: &str) -> Result<(), OperationError> {
        let codepage = Codepage::from_label(label)
            .ok_or_else(|| OperationError::Codepage(format!("unknown codepage '{}'", label)))?;

        let table = table
            .map(|n| {
                u8::try_from(n).map_err(|_| {
                    OperationError::Codepage(format!("code table {} is outside 0-255", n))
                })
            })
            .transpose()?;

        if let Some(table) = table {
            self.bytes.extend(commands::select_code_table(table));
        }
        debug!(from = self.codepage.name(), to = codepage.name(), ?table, "codepage selected");
        self.codepage = codepage;
        Ok(())
    }

    pub fn codepage(&self) -> Codepage {
        self.codepage
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Remove and return the pending bytes.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_and_feeds_in_order() {
        let mut buf = TextBuffer::new();
        buf.feed(2);
        buf.write_text("Hola");
        assert_eq!(buf.take(), b"\n\nHola".to_vec());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_default_codepage_is_cp437() {
        let mut buf = TextBuffer::new();
        buf.write_text("año");
        assert_eq!(buf.take(), vec![b'a', 0xA4, b'o']);
    }

    #[test]
    fn test_select_codepage_emits_table() {
        let mut buf = TextBuffer::new();
        buf.select_codepage(Some(16), "cp1252").unwrap();
        buf.write_text("€");
        assert_eq!(buf.take(), vec![0x1B, b't', 16, 0x80]);
    }

    #[test]
    fn test_select_codepage_without_table() {
        let mut buf = TextBuffer::new();
        buf.select_codepage(None, "cp1252").unwrap();
        buf.write_text("€");
        assert_eq!(buf.take(), vec![0x80]);
    }

    #[test]
    fn test_failed_selection_leaves_state() {
        let mut buf = TextBuffer::new();
        buf.write_text("x");

        assert!(buf.select_codepage(Some(16), "klingon").is_err());
        assert!(buf.select_codepage(Some(300), "cp1252").is_err());

        assert_eq!(buf.codepage(), Codepage::Cp437);
        assert_eq!(buf.take(), b"x".to_vec());
    }

    #[test]
    fn test_codepage_survives_take() {
        let mut buf = TextBuffer::new();
        buf.select_codepage(Some(16), "cp1252").unwrap();
        buf.take();
        buf.write_text("€");
        assert_eq!(buf.take(), vec![0x80]);
    }
}
