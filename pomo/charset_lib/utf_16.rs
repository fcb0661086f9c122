//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use super::CharsetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UTF16Variant {
    UTF16LE,
    UTF16BE,
    UTF16,
}

const BOM: u16 = 0xFEFF;
const BOM_SWAPPED: u16 = 0xFFFE;

fn invalid(variant: UTF16Variant, position: usize) -> CharsetError {
    let charset = match variant {
        UTF16Variant::UTF16LE => "utf-16le",
        UTF16Variant::UTF16BE => "utf-16be",
        UTF16Variant::UTF16 => "utf-16",
    };
    CharsetError::InvalidInput {
        charset: charset.to_string(),
        position,
    }
}

/// Decode UTF-16 text
///
/// The unsuffixed variant consumes a leading byte order mark and defaults
/// to big-endian without one.
pub fn decode(input: &[u8], variant: UTF16Variant) -> Result<String, CharsetError> {
    if input.len() % 2 != 0 {
        return Err(invalid(variant, input.len() - 1));
    }

    let mut data = input;
    let mut start = 0;
    let mut little = variant == UTF16Variant::UTF16LE;
    if variant == UTF16Variant::UTF16 && data.len() >= 2 {
        match BigEndian::read_u16(&data[0..2]) {
            BOM => start = 2,
            BOM_SWAPPED => {
                little = true;
                start = 2;
            }
            _ => {}
        }
    }
    data = &data[start..];

    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|pair| {
            if little {
                LittleEndian::read_u16(pair)
            } else {
                BigEndian::read_u16(pair)
            }
        })
        .collect();

    let mut text = String::with_capacity(units.len());
    let mut unit_index = 0;
    for decoded in char::decode_utf16(units.iter().copied()) {
        match decoded {
            Ok(ch) => {
                text.push(ch);
                unit_index += ch.len_utf16();
            }
            Err(_) => return Err(invalid(variant, start + unit_index * 2)),
        }
    }
    Ok(text)
}

/// Encode text as UTF-16; the unsuffixed variant writes a big-endian BOM
pub fn encode(text: &str, variant: UTF16Variant) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2 + 2);
    let mut unit = [0u8; 2];

    if variant == UTF16Variant::UTF16 {
        BigEndian::write_u16(&mut unit, BOM);
        out.extend_from_slice(&unit);
    }

    for code_unit in text.encode_utf16() {
        match variant {
            UTF16Variant::UTF16LE => LittleEndian::write_u16(&mut unit, code_unit),
            UTF16Variant::UTF16BE | UTF16Variant::UTF16 => {
                BigEndian::write_u16(&mut unit, code_unit)
            }
        }
        out.extend_from_slice(&unit);
    }
    out
}
