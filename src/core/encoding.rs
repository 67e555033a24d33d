//! Ordered text-encoding fallback.
//!
//! The loader takes the first candidate that decodes without error. This does
//! not detect mis-decoded text: a Windows-1252 file may decode cleanly as
//! Latin-1 with different characters, and that is accepted.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::ConvertError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EncodingCandidate {
    Utf8,
    Utf16,
    Windows1252,
    Latin1,
}

/// Tried in this order unless configured otherwise.
pub const DEFAULT_ENCODINGS: [EncodingCandidate; 4] = [
    EncodingCandidate::Utf8,
    EncodingCandidate::Utf16,
    EncodingCandidate::Windows1252,
    EncodingCandidate::Latin1,
];

// Bytes with no mapping in the Windows-1252 code page.
const CP1252_UNDEFINED: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

impl EncodingCandidate {
    pub fn name(self) -> &'static str {
        match self {
            EncodingCandidate::Utf8 => "utf-8",
            EncodingCandidate::Utf16 => "utf-16",
            EncodingCandidate::Windows1252 => "windows-1252",
            EncodingCandidate::Latin1 => "latin-1",
        }
    }

    /// Decodes `bytes` strictly; `None` means this candidate does not apply.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            EncodingCandidate::Utf8 => {
                let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                strict_decode(UTF_8, body)
            }
            EncodingCandidate::Utf16 => {
                // Without a byte order mark almost any even-length input would
                // "decode", so UTF-16 is only taken when the BOM says so.
                let (encoding, bom_len) = Encoding::for_bom(bytes)?;
                if encoding != UTF_16LE && encoding != UTF_16BE {
                    return None;
                }
                strict_decode(encoding, &bytes[bom_len..])
            }
            EncodingCandidate::Windows1252 => {
                if bytes.iter().any(|b| CP1252_UNDEFINED.contains(b)) {
                    return None;
                }
                strict_decode(WINDOWS_1252, bytes)
            }
            EncodingCandidate::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

fn strict_decode(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

/// Returns the first candidate that decodes `bytes`, with the decoded text.
pub fn decode_first(
    bytes: &[u8],
    candidates: &[EncodingCandidate],
) -> Option<(EncodingCandidate, String)> {
    candidates.iter().find_map(|&candidate| match candidate.decode(bytes) {
        Some(text) => Some((candidate, text)),
        None => {
            tracing::debug!("Input does not decode as {}", candidate.name());
            None
        }
    })
}

pub fn candidate_names(candidates: &[EncodingCandidate]) -> String {
    candidates
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for EncodingCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EncodingCandidate {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "utf-8" | "utf8" => Ok(EncodingCandidate::Utf8),
            "utf-16" | "utf16" => Ok(EncodingCandidate::Utf16),
            "windows-1252" | "cp1252" => Ok(EncodingCandidate::Windows1252),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(EncodingCandidate::Latin1),
            _ => Err(ConvertError::InvalidConfigValueError {
                field: "encodings".to_string(),
                value: s.to_string(),
                reason: "Supported encodings: utf-8, utf-16, windows-1252, latin-1".to_string(),
            }),
        }
    }
}

impl TryFrom<String> for EncodingCandidate {
    type Error = ConvertError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EncodingCandidate> for String {
    fn from(value: EncodingCandidate) -> Self {
        value.name().to_string()
    }
}
