//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! .po file writer
//!
//! Renders a [`TranslationTable`] as PO text. The header entry is rebuilt
//! from the table's header fields and always comes first, followed by the
//! active entries and then the obsolete ones (every line prefixed `#~ `).

use std::cmp::Ordering;
use std::sync::Arc;

use crate::catalog_lib::error::PoError;
use crate::catalog_lib::headers::{generate_headers, sync_content_type};
use crate::catalog_lib::table::{CommentBlock, TranslationEntry, TranslationTable};
use crate::charset_lib::{
    normalize_charset, text_to_bytes, BuiltinTranscoder, Transcoder, DEFAULT_CHARSET,
};

/// Order of entries in the output
#[derive(Debug, Clone, Copy, Default)]
pub enum SortMode {
    /// Table order
    #[default]
    Off,
    /// By msgid
    ById,
    Custom(fn(&TranslationEntry, &TranslationEntry) -> Ordering),
}

/// Options for writing .po output
#[derive(Debug, Clone)]
pub struct PoCompileOptions {
    /// Column at which string bodies are folded; 0 disables folding
    pub fold_length: usize,
    pub eol: String,
    /// Escape backslashes, quotes, tabs and carriage returns
    pub escape_characters: bool,
    pub sort: SortMode,
    /// Output charset when the table does not name one
    pub default_charset: String,
    pub transcoder: Arc<dyn Transcoder>,
}

impl Default for PoCompileOptions {
    fn default() -> Self {
        PoCompileOptions {
            fold_length: 76,
            eol: "\n".to_string(),
            escape_characters: true,
            sort: SortMode::Off,
            default_charset: DEFAULT_CHARSET.to_string(),
            transcoder: Arc::new(BuiltinTranscoder),
        }
    }
}

/// A piece of an escaped string body that may not be split
#[derive(Debug, Clone, Copy)]
struct Unit {
    start: usize,
    end: usize,
    first: char,
    last: char,
}

impl Unit {
    fn is_newline_escape(&self) -> bool {
        self.first == '\\' && self.last == 'n' && self.end - self.start == 2
    }

    fn is_whitespace(&self) -> bool {
        self.end - self.start == 1 && self.first.is_whitespace()
    }

    fn is_special(&self) -> bool {
        matches!(self.last, '!'..='/' | '0'..='9' | '['..='`' | '{'..='~')
    }
}

fn split_units(chars: &[char]) -> Vec<Unit> {
    let mut units = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let len = if chars[i] == '\\' && i + 1 < chars.len() {
            2
        } else {
            1
        };
        units.push(Unit {
            start: i,
            end: i + len,
            first: chars[i],
            last: chars[i + len - 1],
        });
        i += len;
    }
    units
}

/// Split an escaped string body into lines of about `max_len` characters
///
/// A line ends after the first `\n` escape inside the window when there is
/// one; otherwise after the last whitespace run, or else after the last run
/// of punctuation and digits, provided the line would not consist of those
/// characters alone. A backslash escape is never split.
pub fn fold_line(text: &str, max_len: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let units = split_units(&chars);
    let max_len = max_len.max(1);
    let mut lines = Vec::new();

    let mut first = 0;
    while first < units.len() {
        let begin = units[first].start;

        // every unit that starts inside the window; a straddling escape
        // stretches the line by one character
        let mut last = first;
        while last + 1 < units.len() && units[last + 1].start - begin < max_len {
            last += 1;
        }
        let window = &units[first..=last];
        let at_end = last + 1 == units.len();

        let take = if let Some(i) = window.iter().position(Unit::is_newline_escape) {
            i + 1
        } else if at_end {
            window.len()
        } else if let Some(i) = window
            .iter()
            .rposition(Unit::is_whitespace)
            .filter(|&i| window[..=i].iter().any(|u| !u.is_whitespace()))
        {
            i + 1
        } else if let Some(i) = window
            .iter()
            .rposition(Unit::is_special)
            .filter(|&i| window[..=i].iter().any(|u| !u.is_special()))
        {
            i + 1
        } else {
            window.len()
        };

        let end = window[take - 1].end;
        lines.push(chars[begin..end].iter().collect());
        first += take;
    }

    lines
}

/// Writer for .po files
#[derive(Debug, Clone, Default)]
pub struct PoCompiler {
    options: PoCompileOptions,
}

impl PoCompiler {
    pub fn new(options: PoCompileOptions) -> Self {
        PoCompiler { options }
    }

    /// Charset the output is written in
    pub fn output_charset(&self, table: &TranslationTable) -> String {
        let fallback = normalize_charset(&self.options.default_charset, DEFAULT_CHARSET);
        normalize_charset(&table.charset, &fallback)
    }

    /// Render the table and encode it in its charset
    pub fn compile(&self, table: &TranslationTable) -> Result<Vec<u8>, PoError> {
        let charset = self.output_charset(table);
        let text = self.render(table, &charset);
        Ok(text_to_bytes(
            self.options.transcoder.as_ref(),
            &text,
            &charset,
        )?)
    }

    /// Render the table as text, without encoding it
    pub fn compile_to_string(&self, table: &TranslationTable) -> String {
        let charset = self.output_charset(table);
        self.render(table, &charset)
    }

    fn render(&self, table: &TranslationTable, charset: &str) -> String {
        let eol = self.options.eol.as_str();

        let mut headers = table.headers.clone();
        sync_content_type(&mut headers, charset);
        let header = TranslationEntry {
            translations: vec![generate_headers(&headers)],
            comments: table.header_comments.clone(),
            ..Default::default()
        };

        let mut blocks = vec![self.draw_block(&header)];

        for entry in self.sorted(table.entries()) {
            blocks.push(self.draw_block(entry));
        }

        let prefix = format!("{}#~ ", eol);
        for entry in self.sorted(table.obsolete_entries()) {
            let block = self.draw_block(entry);
            blocks.push(format!("#~ {}", block.replace(eol, &prefix)));
        }

        let mut text = blocks.join(&format!("{}{}", eol, eol));
        text.push_str(eol);
        text
    }

    fn sorted<'a, I>(&self, entries: I) -> Vec<&'a TranslationEntry>
    where
        I: Iterator<Item = &'a TranslationEntry>,
    {
        let mut entries: Vec<&TranslationEntry> = entries.filter(|e| !e.is_header()).collect();
        match self.options.sort {
            SortMode::Off => {}
            SortMode::ById => entries.sort_by(|a, b| a.id.cmp(&b.id)),
            SortMode::Custom(compare) => entries.sort_by(|a, b| compare(a, b)),
        }
        entries
    }

    fn draw_comments(&self, comments: &CommentBlock, lines: &mut Vec<String>) {
        let fields = [
            ("# ", &comments.translator),
            ("#: ", &comments.reference),
            ("#. ", &comments.extracted),
            ("#, ", &comments.flag),
            ("#| ", &comments.previous),
        ];

        for (prefix, field) in fields {
            let text = match field.as_deref() {
                Some(text) if !text.is_empty() => text,
                _ => continue,
            };
            for line in text.split('\n') {
                let line = line.strip_suffix('\r').unwrap_or(line);
                for part in line.split('\r') {
                    lines.push(format!("{}{}", prefix, part));
                }
            }
        }
    }

    fn draw_block(&self, entry: &TranslationEntry) -> String {
        let mut lines = Vec::new();
        self.draw_comments(&entry.comments, &mut lines);

        if let Some(context) = entry.context.as_deref().filter(|c| !c.is_empty()) {
            lines.push(self.po_string("msgctxt", context));
        }
        lines.push(self.po_string("msgid", &entry.id));

        match &entry.plural_id {
            Some(plural_id) => {
                lines.push(self.po_string("msgid_plural", plural_id));
                for (i, msgstr) in entry.translations.iter().enumerate() {
                    lines.push(self.po_string(&format!("msgstr[{}]", i), msgstr));
                }
            }
            None => {
                let msgstr = entry.translations.first().map(String::as_str).unwrap_or("");
                lines.push(self.po_string("msgstr", msgstr));
            }
        }

        lines.join(&self.options.eol)
    }

    fn escape(&self, value: &str) -> String {
        let escape = self.options.escape_characters;
        let mut out = String::with_capacity(value.len());
        for ch in value.chars() {
            match ch {
                '\n' => out.push_str("\\n"),
                '\\' if escape => out.push_str("\\\\"),
                '"' if escape => out.push_str("\\\""),
                '\t' if escape => out.push_str("\\t"),
                '\r' if escape => out.push_str("\\r"),
                _ => out.push(ch),
            }
        }
        out
    }

    /// `KEY "value"`, or `KEY ""` and one quoted line per fold
    fn po_string(&self, key: &str, value: &str) -> String {
        let escaped = self.escape(value);
        let lines = if self.options.fold_length > 0 {
            fold_line(&escaped, self.options.fold_length)
        } else {
            vec![escaped]
        };

        if lines.len() < 2 {
            let line = lines.first().map(String::as_str).unwrap_or("");
            return format!("{} \"{}\"", key, line);
        }

        let eol = &self.options.eol;
        let separator = format!("\"{}\"", eol);
        format!("{} \"\"{}\"{}\"", key, eol, lines.join(&separator))
    }
}

impl TranslationTable {
    /// Render as .po with default options
    pub fn to_po(&self) -> Result<Vec<u8>, PoError> {
        PoCompiler::default().compile(self)
    }
}
