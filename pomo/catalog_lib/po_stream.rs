//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Chunked .po parsing
//!
//! [`PoStreamParser`] accepts the input in arbitrary byte chunks. The first
//! chunks are buffered until enough data is present to find the header
//! charset; after that every chunk is decoded and lexed as it arrives.

use crate::catalog_lib::error::PoError;
use crate::catalog_lib::po_lexer::PoLexer;
use crate::catalog_lib::po_parser::{detect_charset, normalize, PoParseOptions};
use crate::catalog_lib::table::TranslationTable;
use crate::charset_lib::{bytes_to_text, normalize_charset, Charset, DEFAULT_CHARSET};

/// Bytes buffered before the charset is detected
pub const INITIAL_THRESHOLD: usize = 2048;

/// Incremental .po parser fed with byte chunks
#[derive(Debug)]
pub struct PoStreamParser {
    options: PoParseOptions,
    initial_threshold: usize,
    buffer: Vec<u8>,
    charset: String,
    lexer: Option<PoLexer>,
}

impl PoStreamParser {
    pub fn new(options: PoParseOptions) -> Self {
        PoStreamParser {
            options,
            initial_threshold: INITIAL_THRESHOLD,
            buffer: Vec::new(),
            charset: String::new(),
            lexer: None,
        }
    }

    /// Change the number of bytes collected before charset detection
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.initial_threshold = threshold;
        self
    }

    /// Charset in use, once it has been detected
    pub fn charset(&self) -> Option<&str> {
        self.lexer.as_ref().map(|_| self.charset.as_str())
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), PoError> {
        self.buffer.extend_from_slice(chunk);

        if self.lexer.is_none() {
            if self.buffer.len() < self.initial_threshold {
                return Ok(());
            }
            self.start();
        }

        self.process(false)
    }

    /// Flush the remaining input and build the table
    pub fn finish(mut self) -> Result<TranslationTable, PoError> {
        if self.lexer.is_none() {
            if self.buffer.is_empty() {
                let charset = normalize_charset(&self.options.default_charset, DEFAULT_CHARSET);
                return Ok(TranslationTable::new(&charset));
            }
            self.start();
        }

        self.process(true)?;

        let lexer = self.lexer.take().unwrap_or_default();
        normalize(lexer.finish()?, &self.charset, self.options.validation)
    }

    fn start(&mut self) {
        self.charset = detect_charset(&self.buffer, &self.options.default_charset);
        self.lexer = Some(PoLexer::new());
    }

    /// Decode and lex everything that cannot be part of a split character
    fn process(&mut self, last: bool) -> Result<(), PoError> {
        let cut = if last {
            self.buffer.len()
        } else {
            self.safe_prefix_len()
        };
        if cut == 0 {
            return Ok(());
        }

        let ready: Vec<u8> = self.buffer.drain(..cut).collect();
        let text = bytes_to_text(self.options.transcoder.as_ref(), &ready, &self.charset)?;
        match self.lexer.as_mut() {
            Some(lexer) => lexer.feed(&text),
            None => Ok(()),
        }
    }

    // Trailing bytes with the high bit set may start a multi-byte
    // character and wait for the next chunk. Wide encodings are kept
    // whole until the end.
    fn safe_prefix_len(&self) -> usize {
        let wide = matches!(
            Charset::lookup(&self.charset),
            Ok(Charset::Utf16
                | Charset::Utf16Le
                | Charset::Utf16Be
                | Charset::Utf32
                | Charset::Utf32Le
                | Charset::Utf32Be)
        );
        if wide {
            return 0;
        }

        let mut cut = self.buffer.len();
        while cut > 0 && self.buffer[cut - 1] >= 0x80 {
            cut -= 1;
        }
        cut
    }
}
