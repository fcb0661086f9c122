//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! GNU .mo file reader
//!
//! The .mo (Machine Object) file format is the binary format used by GNU gettext
//! for storing translated message catalogs:
//!
//! ```text
//! offset  0: magic 0x950412de, in the byte order of the file
//! offset  4: revision
//! offset  8: number of strings N
//! offset 12: offset of the original string table
//! offset 16: offset of the translated string table
//! offset 20: hash table size
//! offset 24: hash table offset
//! ```
//!
//! Each string table holds N (length, offset) pairs pointing at the string
//! bodies. Keys are `[msgctxt \x04] msgid [\0 msgid_plural]`; plural values
//! hold the translations separated by `\0`.

use std::io::Read;
use std::sync::{Arc, OnceLock};

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use regex::bytes::Regex;

use crate::catalog_lib::error::MoError;
use crate::catalog_lib::headers::parse_headers;
use crate::catalog_lib::table::{TranslationEntry, TranslationTable};
use crate::charset_lib::{
    bytes_to_text, normalize_charset, BuiltinTranscoder, Transcoder, DEFAULT_CHARSET,
};

/// Magic number of a .mo file, as read in the file's own byte order
pub const MO_MAGIC: u32 = 0x950412de;

/// Separates msgctxt from msgid in a key
pub const CONTEXT_SEPARATOR: char = '\u{4}';

/// Separates plural forms in keys and values
pub const PLURAL_SEPARATOR: char = '\0';

/// Byte order of the 32-bit fields of a .mo file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

impl Endianness {
    pub fn read_u32(self, buf: &[u8]) -> u32 {
        match self {
            Endianness::Little => LittleEndian::read_u32(buf),
            Endianness::Big => BigEndian::read_u32(buf),
        }
    }

    pub fn write_u32(self, buf: &mut [u8], value: u32) {
        match self {
            Endianness::Little => LittleEndian::write_u32(buf, value),
            Endianness::Big => BigEndian::write_u32(buf, value),
        }
    }
}

/// Header of a .mo file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoHeader {
    pub magic: u32,
    /// File format revision
    pub revision: u32,
    /// Number of strings
    pub nstrings: u32,
    /// Offset of table with original strings
    pub orig_tab_offset: u32,
    /// Offset of table with translation strings
    pub trans_tab_offset: u32,
    /// Size of hashing table
    pub hash_tab_size: u32,
    /// Offset of hashing table
    pub hash_tab_offset: u32,
}

impl MoHeader {
    /// Size of the header in bytes
    pub const SIZE: usize = 28;
}

/// A string descriptor (length + offset pair) in the .mo file
#[derive(Debug, Clone, Copy, Default)]
pub struct StringDescriptor {
    /// Length of the string (excluding null terminator)
    pub length: u32,
    /// Offset of the string from the start of the file
    pub offset: u32,
}

impl StringDescriptor {
    /// Size of a string descriptor in bytes
    pub const SIZE: usize = 8;
}

/// Byte order of `data` if it starts with the .mo magic number
pub fn detect_endianness(data: &[u8]) -> Option<Endianness> {
    if data.len() < 4 {
        return None;
    }
    if LittleEndian::read_u32(data) == MO_MAGIC {
        Some(Endianness::Little)
    } else if BigEndian::read_u32(data) == MO_MAGIC {
        Some(Endianness::Big)
    } else {
        None
    }
}

/// Options for decoding .mo data
#[derive(Debug, Clone)]
pub struct MoParseOptions {
    /// Charset assumed when the header entry does not declare one
    pub default_charset: String,
    pub transcoder: Arc<dyn Transcoder>,
}

impl Default for MoParseOptions {
    fn default() -> Self {
        MoParseOptions {
            default_charset: DEFAULT_CHARSET.to_string(),
            transcoder: Arc::new(BuiltinTranscoder),
        }
    }
}

/// Decoder for .mo files
#[derive(Debug, Clone, Default)]
pub struct MoParser {
    options: MoParseOptions,
}

fn read_u32_at(
    data: &[u8],
    offset: usize,
    endianness: Endianness,
    what: &'static str,
) -> Result<u32, MoError> {
    match offset.checked_add(4) {
        Some(end) if end <= data.len() => Ok(endianness.read_u32(&data[offset..end])),
        _ => Err(MoError::OutOfBounds { what, offset }),
    }
}

fn read_descriptor(
    data: &[u8],
    table: u32,
    index: usize,
    endianness: Endianness,
    what: &'static str,
) -> Result<StringDescriptor, MoError> {
    let offset = index
        .checked_mul(StringDescriptor::SIZE)
        .and_then(|n| n.checked_add(table as usize))
        .ok_or(MoError::OutOfBounds {
            what,
            offset: table as usize,
        })?;

    Ok(StringDescriptor {
        length: read_u32_at(data, offset, endianness, what)?,
        offset: read_u32_at(data, offset + 4, endianness, what)?,
    })
}

fn read_body<'a>(
    data: &'a [u8],
    desc: &StringDescriptor,
    what: &'static str,
) -> Result<&'a [u8], MoError> {
    let start = desc.offset as usize;
    match start.checked_add(desc.length as usize) {
        Some(end) if end <= data.len() => Ok(&data[start..end]),
        _ => Err(MoError::OutOfBounds {
            what,
            offset: start,
        }),
    }
}

fn header_charset(header: &[u8]) -> Option<String> {
    static CHARSET: OnceLock<Regex> = OnceLock::new();
    let re = CHARSET.get_or_init(|| {
        Regex::new(r"(?i-u)[; ]charset\s*=\s*([\w-]+)").expect("charset pattern")
    });
    re.captures(header)
        .map(|caps| String::from_utf8_lossy(&caps[1]).into_owned())
}

/// Build an entry from a decoded key and value
fn split_entry(key: &str, value: &str) -> TranslationEntry {
    let (context, rest) = match key.split_once(CONTEXT_SEPARATOR) {
        Some((context, rest)) => (Some(context), rest),
        None => (None, key),
    };
    let (id, plural_id) = match rest.split_once(PLURAL_SEPARATOR) {
        Some((id, plural_id)) => (id, Some(plural_id)),
        None => (rest, None),
    };

    TranslationEntry {
        context: context.filter(|c| !c.is_empty()).map(str::to_string),
        id: id.to_string(),
        plural_id: plural_id.map(str::to_string),
        translations: value.split(PLURAL_SEPARATOR).map(str::to_string).collect(),
        ..Default::default()
    }
}

impl MoParser {
    pub fn new(options: MoParseOptions) -> Self {
        MoParser { options }
    }

    /// Read the fixed header fields
    pub fn read_header(data: &[u8]) -> Option<(MoHeader, Endianness)> {
        let endianness = detect_endianness(data)?;
        if data.len() < MoHeader::SIZE {
            return None;
        }
        let field = |i: usize| endianness.read_u32(&data[i * 4..i * 4 + 4]);
        let header = MoHeader {
            magic: MO_MAGIC,
            revision: field(1),
            nstrings: field(2),
            orig_tab_offset: field(3),
            trans_tab_offset: field(4),
            hash_tab_size: field(5),
            hash_tab_offset: field(6),
        };
        Some((header, endianness))
    }

    /// Decode .mo data
    ///
    /// Returns `Ok(None)` when `data` is not a .mo file.
    pub fn parse(&self, data: &[u8]) -> Result<Option<TranslationTable>, MoError> {
        let endianness = match detect_endianness(data) {
            Some(endianness) if data.len() >= 20 => endianness,
            _ => return Ok(None),
        };

        let nstrings = endianness.read_u32(&data[8..12]) as usize;
        let orig_tab = endianness.read_u32(&data[12..16]);
        let trans_tab = endianness.read_u32(&data[16..20]);

        let transcoder = self.options.transcoder.as_ref();
        let mut charset = normalize_charset(&self.options.default_charset, DEFAULT_CHARSET);
        let mut table = TranslationTable::new(&charset);

        for i in 0..nstrings {
            let orig = read_descriptor(data, orig_tab, i, endianness, "original string table")?;
            let trans =
                read_descriptor(data, trans_tab, i, endianness, "translation string table")?;
            let key = read_body(data, &orig, "original string")?;
            let value = read_body(data, &trans, "translated string")?;

            // an empty key is the header wherever it sits; the last one
            // wins, but only the first one can set the charset
            if key.is_empty() {
                if i == 0 {
                    if let Some(declared) = header_charset(value) {
                        charset = normalize_charset(&declared, &charset);
                        table.charset = charset.clone();
                    }
                }
                let text = bytes_to_text(transcoder, value, &charset)?;
                table.headers = parse_headers(&text);
                continue;
            }

            let key = bytes_to_text(transcoder, key, &charset)?;
            let value = bytes_to_text(transcoder, value, &charset)?;
            table.insert(split_entry(&key, &value));
        }

        Ok(Some(table))
    }

    /// Decode a .mo file from a reader
    pub fn parse_from<R: Read>(&self, mut reader: R) -> Result<Option<TranslationTable>, MoError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.parse(&data)
    }
}

impl TranslationTable {
    /// Decode .mo data with default options; `Ok(None)` if it is not .mo
    pub fn from_mo(data: &[u8]) -> Result<Option<Self>, MoError> {
        MoParser::default().parse(data)
    }
}
