//! # Codepages
//!
//! The printer interprets text bytes through its active character table,
//! selected with `ESC t n`. The host has to encode text the same way, so a
//! [`Codepage`] pairs "which table the printer is in" with "how we turn a
//! `&str` into bytes".
//!
//! Labels accepted by [`Codepage::from_label`]:
//!
//! - `cp437`, `437`, `ibm437`, `pc437`: built-in table ([`super::cp437`])
//! - `cp850`, `cp852`, `cp858`, `cp860` and the same aliases: DOS tables
//!   ([`super::oem`])
//! - any WHATWG encoding label known to `encoding_rs`
//!   (`cp1252`, `windows-1252`, `iso-8859-15`, `cp866`, `gbk`, `utf-8`, …)

use encoding_rs::{EncoderResult, Encoding};

use super::cp437;
use super::oem::{self, OemTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Codepage {
    /// PC437, the printer's power-on table.
    #[default]
    Cp437,
    /// A DOS table without a WHATWG label.
    Oem(&'static OemTable),
    /// An `encoding_rs` encoding.
    Encoded(&'static Encoding),
}

impl Codepage {
    /// Resolve a client-supplied codepage label.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "cp437" | "437" | "ibm437" | "pc437" => Some(Self::Cp437),
            other => oem::for_label(other)
                .map(Self::Oem)
                .or_else(|| Encoding::for_label(other.as_bytes()).map(Self::Encoded)),
        }
    }

    /// Canonical name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cp437 => "cp437",
            Self::Oem(table) => table.name,
            Self::Encoded(encoding) => encoding.name(),
        }
    }

    /// Encode text for this codepage. Unmappable characters become `?`.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Self::Cp437 => cp437::encode(text),
            Self::Oem(table) => table.encode(text),
            Self::Encoded(encoding) => encode_lossy(encoding.output_encoding(), text),
        }
    }
}

/// `encoding_rs` replaces unmappables with HTML numeric references, which
/// would print literally on a receipt. Emit `?` instead.
fn encode_lossy(encoding: &'static Encoding, text: &str) -> Vec<u8> {
    let mut encoder = encoding.new_encoder();
    let mut out = Vec::with_capacity(text.len());
    let mut buf = [0u8; 512];
    let mut src = text;

    loop {
        let (result, read, written) =
            encoder.encode_from_utf8_without_replacement(src, &mut buf, true);
        out.extend_from_slice(&buf[..written]);
        src = &src[read..];
        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::OutputFull => {}
            EncoderResult::Unmappable(_) => out.push(b'?'),
        }
    }

    out
}
