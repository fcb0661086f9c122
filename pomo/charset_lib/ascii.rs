//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Single-byte encodings: ASCII and ISO-8859-1

use super::CharsetError;

/// Decode ASCII, rejecting bytes above 0x7F
pub fn decode_ascii(input: &[u8]) -> Result<String, CharsetError> {
    match input.iter().position(|&b| b > 0x7F) {
        Some(position) => Err(CharsetError::InvalidInput {
            charset: "ascii".to_string(),
            position,
        }),
        None => Ok(input.iter().map(|&b| b as char).collect()),
    }
}

pub fn encode_ascii(text: &str) -> Result<Vec<u8>, CharsetError> {
    text.chars()
        .map(|ch| {
            if ch.is_ascii() {
                Ok(ch as u8)
            } else {
                Err(CharsetError::Unrepresentable {
                    charset: "ascii".to_string(),
                    ch,
                })
            }
        })
        .collect()
}

/// Decode ISO-8859-1; every byte maps to the code point of the same value
pub fn decode_latin1(input: &[u8]) -> String {
    input.iter().map(|&b| char::from(b)).collect()
}

pub fn encode_latin1(text: &str) -> Result<Vec<u8>, CharsetError> {
    text.chars()
        .map(|ch| {
            u8::try_from(u32::from(ch)).map_err(|_| CharsetError::Unrepresentable {
                charset: "iso-8859-1".to_string(),
                ch,
            })
        })
        .collect()
}
