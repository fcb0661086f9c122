//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! GNU .mo file writer
//!
//! Output layout: the 28-byte header, the original string table, the
//! translation string table, then the original string bodies followed by the
//! translation bodies, each NUL-terminated. No hash table is written.

use std::io::Write;
use std::sync::Arc;

use crate::catalog_lib::error::MoError;
use crate::catalog_lib::headers::{
    canonical_header_name, generate_headers, sync_content_type, POT_CREATION_DATE,
};
use crate::catalog_lib::mo_parser::{
    Endianness, MoHeader, StringDescriptor, CONTEXT_SEPARATOR, MO_MAGIC, PLURAL_SEPARATOR,
};
use crate::catalog_lib::table::{Headers, TranslationEntry, TranslationTable};
use crate::charset_lib::{
    normalize_charset, text_to_bytes, BuiltinTranscoder, Transcoder, DEFAULT_CHARSET,
};

/// Options for encoding .mo output
#[derive(Debug, Clone)]
pub struct MoCompileOptions {
    pub endianness: Endianness,
    /// Output charset when the table does not name one
    pub default_charset: String,
    pub transcoder: Arc<dyn Transcoder>,
}

impl Default for MoCompileOptions {
    fn default() -> Self {
        MoCompileOptions {
            endianness: Endianness::Little,
            default_charset: DEFAULT_CHARSET.to_string(),
            transcoder: Arc::new(BuiltinTranscoder),
        }
    }
}

/// Encoder for .mo files
#[derive(Debug, Clone, Default)]
pub struct MoCompiler {
    options: MoCompileOptions,
}

/// `[msgctxt \x04] msgid [\0 msgid_plural]`
fn entry_key(entry: &TranslationEntry) -> String {
    let mut key = String::new();
    if let Some(context) = entry.context.as_deref().filter(|c| !c.is_empty()) {
        key.push_str(context);
        key.push(CONTEXT_SEPARATOR);
    }
    key.push_str(&entry.id);
    if let Some(plural_id) = &entry.plural_id {
        key.push(PLURAL_SEPARATOR);
        key.push_str(plural_id);
    }
    key
}

/// Header fields as written to .mo: canonical names, no POT-Creation-Date
fn mo_headers(headers: &Headers) -> Headers {
    headers
        .iter()
        .map(|(key, value)| (canonical_header_name(key), value.clone()))
        .filter(|(key, _)| key != POT_CREATION_DATE)
        .collect()
}

fn put_u32(buf: &mut [u8], at: usize, value: usize, endianness: Endianness) {
    endianness.write_u32(&mut buf[at..at + 4], value as u32);
}

impl MoCompiler {
    pub fn new(options: MoCompileOptions) -> Self {
        MoCompiler { options }
    }

    /// Charset the strings are written in
    pub fn output_charset(&self, table: &TranslationTable) -> String {
        let fallback = normalize_charset(&self.options.default_charset, DEFAULT_CHARSET);
        normalize_charset(&table.charset, &fallback)
    }

    /// Encode the table
    pub fn compile(&self, table: &TranslationTable) -> Result<Vec<u8>, MoError> {
        let charset = self.output_charset(table);
        let transcoder = self.options.transcoder.as_ref();

        let mut headers = mo_headers(&table.headers);
        sync_content_type(&mut headers, &charset);

        let mut list: Vec<(Vec<u8>, Vec<u8>)> = vec![(
            Vec::new(),
            text_to_bytes(transcoder, &generate_headers(&headers), &charset)?,
        )];

        for entry in table.entries() {
            if entry.is_header() || entry.translations.iter().all(String::is_empty) {
                continue;
            }
            let key = entry_key(entry);
            let value = entry.translations.join("\0");
            list.push((
                text_to_bytes(transcoder, &key, &charset)?,
                text_to_bytes(transcoder, &value, &charset)?,
            ));
        }

        list.sort_by(|a, b| a.0.cmp(&b.0));

        self.layout(&list)
    }

    /// Encode the table into a writer
    pub fn compile_to<W: Write>(
        &self,
        table: &TranslationTable,
        writer: &mut W,
    ) -> Result<(), MoError> {
        let data = self.compile(table)?;
        writer.write_all(&data)?;
        Ok(())
    }

    fn layout(&self, list: &[(Vec<u8>, Vec<u8>)]) -> Result<Vec<u8>, MoError> {
        let n = list.len();
        let orig_tab = MoHeader::SIZE;
        let trans_tab = orig_tab + n * StringDescriptor::SIZE;
        let bodies = trans_tab + n * StringDescriptor::SIZE;

        let size = list
            .iter()
            .try_fold(bodies, |size, (key, value)| {
                size.checked_add(key.len() + 1)?.checked_add(value.len() + 1)
            })
            .filter(|&size| size <= u32::MAX as usize)
            .ok_or(MoError::TooLarge)?;

        let e = self.options.endianness;
        let mut buf = vec![0u8; size];

        put_u32(&mut buf, 0, MO_MAGIC as usize, e);
        put_u32(&mut buf, 4, 0, e);
        put_u32(&mut buf, 8, n, e);
        put_u32(&mut buf, 12, orig_tab, e);
        put_u32(&mut buf, 16, trans_tab, e);
        put_u32(&mut buf, 20, 0, e);
        put_u32(&mut buf, 24, bodies, e);

        let mut offset = bodies;
        let strings = list
            .iter()
            .map(|(key, _)| key)
            .chain(list.iter().map(|(_, value)| value));
        for (i, body) in strings.enumerate() {
            let desc = orig_tab + i * StringDescriptor::SIZE;
            put_u32(&mut buf, desc, body.len(), e);
            put_u32(&mut buf, desc + 4, offset, e);
            buf[offset..offset + body.len()].copy_from_slice(body);
            offset += body.len() + 1;
        }

        Ok(buf)
    }
}

impl TranslationTable {
    /// Encode as little-endian .mo with default options
    pub fn to_mo(&self) -> Result<Vec<u8>, MoError> {
        MoCompiler::default().compile(self)
    }
}
