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
pub enum UTF32Variant {
    UTF32LE,
    UTF32BE,
    UTF32,
}

const BOM: u32 = 0x0000_FEFF;
const BOM_SWAPPED: u32 = 0xFFFE_0000;

fn invalid(variant: UTF32Variant, position: usize) -> CharsetError {
    let charset = match variant {
        UTF32Variant::UTF32LE => "utf-32le",
        UTF32Variant::UTF32BE => "utf-32be",
        UTF32Variant::UTF32 => "utf-32",
    };
    CharsetError::InvalidInput {
        charset: charset.to_string(),
        position,
    }
}

/// Decode UTF-32 text, honouring a BOM for the unsuffixed variant
pub fn decode(input: &[u8], variant: UTF32Variant) -> Result<String, CharsetError> {
    if input.len() % 4 != 0 {
        return Err(invalid(variant, input.len() - input.len() % 4));
    }

    let mut start = 0;
    let mut little = variant == UTF32Variant::UTF32LE;
    if variant == UTF32Variant::UTF32 && input.len() >= 4 {
        match BigEndian::read_u32(&input[0..4]) {
            BOM => start = 4,
            BOM_SWAPPED => {
                little = true;
                start = 4;
            }
            _ => {}
        }
    }

    let mut text = String::with_capacity((input.len() - start) / 4);
    for (i, quad) in input[start..].chunks_exact(4).enumerate() {
        let code_point = if little {
            LittleEndian::read_u32(quad)
        } else {
            BigEndian::read_u32(quad)
        };
        match char::from_u32(code_point) {
            Some(ch) => text.push(ch),
            None => return Err(invalid(variant, start + i * 4)),
        }
    }
    Ok(text)
}

/// Encode text as UTF-32; the unsuffixed variant writes a big-endian BOM
pub fn encode(text: &str, variant: UTF32Variant) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 4 + 4);
    let mut quad = [0u8; 4];

    if variant == UTF32Variant::UTF32 {
        BigEndian::write_u32(&mut quad, BOM);
        out.extend_from_slice(&quad);
    }

    for ch in text.chars() {
        match variant {
            UTF32Variant::UTF32LE => LittleEndian::write_u32(&mut quad, u32::from(ch)),
            UTF32Variant::UTF32BE | UTF32Variant::UTF32 => {
                BigEndian::write_u32(&mut quad, u32::from(ch))
            }
        }
        out.extend_from_slice(&quad);
    }
    out
}
