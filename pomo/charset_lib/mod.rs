//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Character set normalization and transcoding
//!
//! Catalogs name their encoding in free form (`UTF8`, `latin1`, `WIN1257`,
//! or the template placeholder `CHARSET`). This module maps those aliases to
//! canonical names and converts byte buffers between encodings.
//!
//! Conversion goes through the [`Transcoder`] trait so callers may supply
//! their own implementation. [`BuiltinTranscoder`] handles the encodings in
//! [`Charset`], routing every conversion through Unicode scalar values.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

pub mod ascii;
pub mod utf_16;
pub mod utf_32;

use utf_16::UTF16Variant;
use utf_32::UTF32Variant;

/// Charset assumed for byte input that does not declare one
pub const DEFAULT_CHARSET: &str = "iso-8859-1";

/// Canonical name of UTF-8
pub const UTF_8: &str = "utf-8";

/// Encodings understood by [`BuiltinTranscoder`]
#[derive(EnumString, EnumIter, Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    #[strum(to_string = "ascii")]
    Ascii,
    #[strum(to_string = "utf-8")]
    Utf8,
    #[strum(to_string = "iso-8859-1")]
    Latin1,
    #[strum(to_string = "utf-16")]
    Utf16,
    #[strum(to_string = "utf-16le")]
    Utf16Le,
    #[strum(to_string = "utf-16be")]
    Utf16Be,
    #[strum(to_string = "utf-32")]
    Utf32,
    #[strum(to_string = "utf-32le")]
    Utf32Le,
    #[strum(to_string = "utf-32be")]
    Utf32Be,
}

impl Charset {
    /// Look up an encoding by name, normalizing aliases first
    pub fn lookup(name: &str) -> Result<Self, CharsetError> {
        let canonical = normalize_charset(name, DEFAULT_CHARSET);
        Charset::from_str(&canonical).map_err(|_| CharsetError::Unsupported(canonical))
    }

    /// Decode bytes in this encoding into text
    pub fn decode(self, input: &[u8]) -> Result<String, CharsetError> {
        match self {
            Charset::Ascii => ascii::decode_ascii(input),
            Charset::Latin1 => Ok(ascii::decode_latin1(input)),
            Charset::Utf8 => match std::str::from_utf8(input) {
                Ok(s) => Ok(s.to_string()),
                Err(e) => Err(CharsetError::InvalidInput {
                    charset: self.to_string(),
                    position: e.valid_up_to(),
                }),
            },
            Charset::Utf16 => utf_16::decode(input, UTF16Variant::UTF16),
            Charset::Utf16Le => utf_16::decode(input, UTF16Variant::UTF16LE),
            Charset::Utf16Be => utf_16::decode(input, UTF16Variant::UTF16BE),
            Charset::Utf32 => utf_32::decode(input, UTF32Variant::UTF32),
            Charset::Utf32Le => utf_32::decode(input, UTF32Variant::UTF32LE),
            Charset::Utf32Be => utf_32::decode(input, UTF32Variant::UTF32BE),
        }
    }

    /// Encode text into this encoding
    pub fn encode(self, text: &str) -> Result<Vec<u8>, CharsetError> {
        match self {
            Charset::Ascii => ascii::encode_ascii(text),
            Charset::Latin1 => ascii::encode_latin1(text),
            Charset::Utf8 => Ok(text.as_bytes().to_vec()),
            Charset::Utf16 => Ok(utf_16::encode(text, UTF16Variant::UTF16)),
            Charset::Utf16Le => Ok(utf_16::encode(text, UTF16Variant::UTF16LE)),
            Charset::Utf16Be => Ok(utf_16::encode(text, UTF16Variant::UTF16BE)),
            Charset::Utf32 => Ok(utf_32::encode(text, UTF32Variant::UTF32)),
            Charset::Utf32Le => Ok(utf_32::encode(text, UTF32Variant::UTF32LE)),
            Charset::Utf32Be => Ok(utf_32::encode(text, UTF32Variant::UTF32BE)),
        }
    }
}

/// Names of all encodings supported by [`BuiltinTranscoder`]
pub fn supported_charsets() -> Vec<String> {
    Charset::iter().map(|cs| cs.to_string()).collect()
}

/// Error type for charset lookups and conversions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharsetError {
    /// No converter exists for this (canonical) charset name
    Unsupported(String),
    /// Input bytes are not valid in the source charset
    InvalidInput { charset: String, position: usize },
    /// A character cannot be expressed in the target charset
    Unrepresentable { charset: String, ch: char },
}

impl fmt::Display for CharsetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharsetError::Unsupported(name) => write!(f, "unsupported charset: {}", name),
            CharsetError::InvalidInput { charset, position } => {
                write!(f, "invalid {} input at byte {}", charset, position)
            }
            CharsetError::Unrepresentable { charset, ch } => {
                write!(f, "character U+{:04X} cannot be encoded as {}", *ch as u32, charset)
            }
        }
    }
}

impl std::error::Error for CharsetError {}

fn alias_rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            (r"^utf[-_]?(\d+)$", "utf-$1"),
            (r"^win(?:dows)?[-_]?(\d+)$", "windows-$1"),
            (r"^latin[-_]?(\d+)$", "iso-8859-$1"),
            (r"^iso[-_]?8859[-_]?(\d+)$", "iso-8859-$1"),
            (r"^(?:us[-_]?)?ascii$", "ascii"),
        ]
        .into_iter()
        .map(|(pattern, replacement)| {
            (
                Regex::new(pattern).expect("charset alias pattern"),
                replacement,
            )
        })
        .collect()
    })
}

/// Map a charset alias to its canonical, lower-case name
///
/// The placeholder `charset` (from `charset=CHARSET` in templates) and the
/// empty string resolve to `default`.
pub fn normalize_charset(name: &str, default: &str) -> String {
    let name = name.trim().to_lowercase();
    if name.is_empty() || name == "charset" {
        return default.trim().to_lowercase();
    }

    for (re, replacement) in alias_rules() {
        if re.is_match(&name) {
            return re.replace(&name, *replacement).into_owned();
        }
    }

    name
}

/// Converts bytes between named charsets
pub trait Transcoder: fmt::Debug + Send + Sync {
    /// Convert `input` from charset `from` into charset `to`
    ///
    /// Converting between identical charsets must return the input unchanged.
    fn convert(&self, input: &[u8], to: &str, from: &str) -> Result<Vec<u8>, CharsetError>;
}

/// Transcoder for the encodings listed in [`Charset`]
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTranscoder;

impl Transcoder for BuiltinTranscoder {
    fn convert(&self, input: &[u8], to: &str, from: &str) -> Result<Vec<u8>, CharsetError> {
        let to = normalize_charset(to, DEFAULT_CHARSET);
        let from = normalize_charset(from, DEFAULT_CHARSET);
        if to == from {
            return Ok(input.to_vec());
        }

        let text = Charset::lookup(&from)?.decode(input)?;
        Charset::lookup(&to)?.encode(&text)
    }
}

/// Decode catalog bytes in `charset` into text
///
/// UTF-8 input is taken as-is, replacing invalid sequences.
pub fn bytes_to_text(
    transcoder: &dyn Transcoder,
    input: &[u8],
    charset: &str,
) -> Result<String, CharsetError> {
    if charset == UTF_8 {
        return Ok(String::from_utf8_lossy(input).into_owned());
    }

    let utf8 = transcoder.convert(input, UTF_8, charset)?;
    Ok(String::from_utf8_lossy(&utf8).into_owned())
}

/// Encode text into `charset`
///
/// UTF-8 and ASCII targets pass the UTF-8 bytes through unchanged.
pub fn text_to_bytes(
    transcoder: &dyn Transcoder,
    text: &str,
    charset: &str,
) -> Result<Vec<u8>, CharsetError> {
    if charset == UTF_8 || charset == "ascii" {
        return Ok(text.as_bytes().to_vec());
    }

    transcoder.convert(text.as_bytes(), charset, UTF_8)
}
