//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! .po (Portable Object) file parser
//!
//! The .po file format is a human-readable format for translated message catalogs.
//! Parsing runs the [`PoLexer`] over the decoded source and then normalizes
//! the token stream in four passes:
//!
//! 1. adjacent strings are concatenated, adjacent comments joined by `\n`
//! 2. each comment is classified into a [`CommentBlock`]:
//!    - `#  ` translator comments
//!    - `#. ` extracted comments
//!    - `#: ` references (file:line)
//!    - `#, ` flags (fuzzy, c-format, etc.)
//!    - `#| ` previous msgid
//!    - `#~ ` obsolete marker, dropped
//! 3. every keyword collects the strings that follow it
//! 4. keywords are grouped into entries: `msgctxt` applies to the next
//!    `msgid`, `msgid_plural` and `msgstr`/`msgstr[N]` to the current one
//!
//! The entries are then folded into a [`TranslationTable`], with the header
//! entry (empty msgid) parsed into header fields.

use std::io::Read;
use std::sync::{Arc, OnceLock};

use regex::bytes::Regex;

use crate::catalog_lib::error::PoError;
use crate::catalog_lib::headers::{self, parse_headers};
use crate::catalog_lib::po_lexer::{PoLexer, Token};
use crate::catalog_lib::table::{CommentBlock, Section, TranslationEntry, TranslationTable};
use crate::charset_lib::{
    bytes_to_text, normalize_charset, BuiltinTranscoder, Transcoder, DEFAULT_CHARSET, UTF_8,
};

/// Options for parsing .po input
#[derive(Debug, Clone)]
pub struct PoParseOptions {
    /// Charset assumed when the header does not declare one
    pub default_charset: String,
    /// Reject duplicate msgids and msgstr counts that do not match
    pub validation: bool,
    pub transcoder: Arc<dyn Transcoder>,
}

impl Default for PoParseOptions {
    fn default() -> Self {
        PoParseOptions {
            default_charset: DEFAULT_CHARSET.to_string(),
            validation: false,
            transcoder: Arc::new(BuiltinTranscoder),
        }
    }
}

impl CommentBlock {
    /// Classify the lines of a joined comment token by their first character
    pub fn parse(raw: &str) -> Self {
        let mut translator = Vec::new();
        let mut extracted = Vec::new();
        let mut reference = Vec::new();
        let mut flag = Vec::new();
        let mut previous = Vec::new();

        for line in raw.split('\n') {
            let mut chars = line.chars();
            match chars.next() {
                Some(':') => reference.push(chars.as_str().trim()),
                Some('.') => extracted.push(chars.as_str().trim_start()),
                Some(',') => flag.push(chars.as_str().trim_start()),
                Some('|') => previous.push(chars.as_str().trim_start()),
                Some('~') => {}
                _ => translator.push(line.trim_start()),
            }
        }

        fn join(lines: Vec<&str>) -> Option<String> {
            if lines.is_empty() {
                None
            } else {
                Some(lines.join("\n"))
            }
        }

        CommentBlock {
            translator: join(translator),
            extracted: join(extracted),
            reference: join(reference),
            flag: join(flag),
            previous: join(previous),
        }
    }
}

/// Find the charset declared in the header of raw .po data
pub fn detect_charset(input: &[u8], default: &str) -> String {
    static FIRST_MSGID: OnceLock<Regex> = OnceLock::new();
    static NEXT_ENTRY: OnceLock<Regex> = OnceLock::new();
    static CHARSET: OnceLock<Regex> = OnceLock::new();

    let first_msgid = FIRST_MSGID.get_or_init(|| {
        Regex::new(r"(?im-u)^(?:\xEF\xBB\xBF)?\s*msgid").expect("msgid pattern")
    });
    let next_entry = NEXT_ENTRY.get_or_init(|| {
        Regex::new(r"(?im-u)^\s*(?:msgid|msgctxt)").expect("entry pattern")
    });
    let charset = CHARSET.get_or_init(|| {
        Regex::new(r#"(?im-u)[; ]charset\s*=\s*([\w-]+)(?:[\s;]|\\n)*"\s*$"#)
            .expect("charset pattern")
    });

    let header = match first_msgid.find(input) {
        Some(m) => match next_entry.find_at(input, m.end()) {
            Some(next) => &input[..next.start()],
            None => input,
        },
        None => &input[..0],
    };

    match charset.captures(header) {
        Some(caps) => normalize_charset(&String::from_utf8_lossy(&caps[1]), default),
        None => normalize_charset(default, DEFAULT_CHARSET),
    }
}

/// Token stream after comment classification
#[derive(Debug)]
enum Node {
    Str(String),
    Comments(CommentBlock),
    Key { name: String, obsolete: bool },
}

/// A keyword together with its value
#[derive(Debug)]
struct KeyValue {
    key: String,
    value: String,
    obsolete: bool,
    comments: Option<CommentBlock>,
}

fn join_tokens(tokens: Vec<Token>) -> Vec<Token> {
    let mut joined: Vec<Token> = Vec::with_capacity(tokens.len());

    for token in tokens {
        match (joined.last_mut(), token) {
            (Some(Token::Str(last)), Token::Str(value)) => last.push_str(&value),
            (Some(Token::Comment(last)), Token::Comment(value)) => {
                last.push('\n');
                last.push_str(&value);
            }
            (_, token) => joined.push(token),
        }
    }

    joined
}

fn classify_comments(tokens: Vec<Token>) -> Vec<Node> {
    tokens
        .into_iter()
        .map(|token| match token {
            Token::Str(value) => Node::Str(value),
            Token::Comment(raw) => Node::Comments(CommentBlock::parse(&raw)),
            Token::Key { name, obsolete } => Node::Key { name, obsolete },
        })
        .collect()
}

fn pair_keys(nodes: Vec<Node>) -> Vec<KeyValue> {
    let mut pairs: Vec<KeyValue> = Vec::new();
    let mut preceding: Option<CommentBlock> = None;

    for node in nodes {
        match node {
            Node::Key { name, obsolete } => pairs.push(KeyValue {
                key: name,
                value: String::new(),
                obsolete,
                comments: preceding.take(),
            }),
            Node::Str(value) => {
                preceding = None;
                if let Some(pair) = pairs.last_mut() {
                    pair.value.push_str(&value);
                }
            }
            Node::Comments(block) => preceding = Some(block),
        }
    }

    pairs
}

fn group_entries(
    pairs: Vec<KeyValue>,
    validation: bool,
) -> Result<Vec<TranslationEntry>, PoError> {
    let mut entries: Vec<TranslationEntry> = Vec::new();
    let mut pending_context: Option<String> = None;
    let mut pending_comments: Option<CommentBlock> = None;

    for pair in pairs {
        let comments = pair.comments.filter(|c| !c.is_empty());

        if pair.key == "msgctxt" {
            pending_context = Some(pair.value);
            pending_comments = comments;
            continue;
        }

        if pair.key == "msgid" {
            entries.push(TranslationEntry {
                context: pending_context.take().filter(|c| !c.is_empty()),
                id: pair.value,
                comments: pending_comments.take().or(comments).unwrap_or_default(),
                obsolete: pair.obsolete,
                ..Default::default()
            });
            continue;
        }

        pending_context = None;
        pending_comments = None;

        let entry = match entries.last_mut() {
            Some(entry) => entry,
            None => continue,
        };

        if pair.key == "msgid_plural" {
            if validation && entry.plural_id.is_some() {
                return Err(PoError::DuplicatePlural {
                    context: entry.context_key().to_string(),
                    id: entry.id.clone(),
                });
            }
            entry.plural_id = Some(pair.value);
        } else if pair.key.starts_with("msgstr") {
            entry.translations.push(pair.value);
        }

        if entry.comments.is_empty() {
            if let Some(comments) = comments {
                entry.comments = comments;
            }
        }
    }

    Ok(entries)
}

fn validate_entry(
    entry: &TranslationEntry,
    translations: &Section,
    nplurals: usize,
) -> Result<(), PoError> {
    let context = entry.context_key();
    let found = entry.translations.len();

    if translations.contains(context, &entry.id) {
        Err(PoError::Duplicate {
            context: context.to_string(),
            id: entry.id.clone(),
        })
    } else if entry.is_plural() && found != nplurals {
        Err(PoError::PluralRange {
            context: context.to_string(),
            id: entry.id.clone(),
            expected: nplurals,
            found,
        })
    } else if !entry.is_plural() && found != 1 {
        Err(PoError::SingularRange {
            context: context.to_string(),
            id: entry.id.clone(),
            found,
        })
    } else {
        Ok(())
    }
}

/// Turn a token stream into a translation table
pub fn normalize(
    tokens: Vec<Token>,
    charset: &str,
    validation: bool,
) -> Result<TranslationTable, PoError> {
    let pairs = pair_keys(classify_comments(join_tokens(tokens)));
    let entries = group_entries(pairs, validation)?;

    let mut table = TranslationTable::new(charset);
    let mut nplurals = 1;
    let mut header_seen = false;

    for entry in entries {
        if entry.obsolete {
            if !entry.is_header() {
                table.insert(entry);
            }
            continue;
        }

        if entry.is_header() {
            if validation && header_seen {
                return Err(PoError::Duplicate {
                    context: String::new(),
                    id: String::new(),
                });
            }
            let text = entry.translations.first().map(String::as_str).unwrap_or("");
            table.headers = parse_headers(text);
            table.header_comments = entry.comments;
            nplurals = headers::nplurals(&table.headers);
            header_seen = true;
            continue;
        }

        if validation {
            validate_entry(&entry, &table.translations, nplurals)?;
        }
        table.insert(entry);
    }

    Ok(table)
}

/// Parser for .po files
#[derive(Debug, Clone, Default)]
pub struct PoParser {
    options: PoParseOptions,
}

impl PoParser {
    pub fn new(options: PoParseOptions) -> Self {
        PoParser { options }
    }

    /// Parse raw .po data, decoding it with the charset its header declares
    pub fn parse(&self, input: &[u8]) -> Result<TranslationTable, PoError> {
        let charset = detect_charset(input, &self.options.default_charset);
        let text = bytes_to_text(self.options.transcoder.as_ref(), input, &charset)?;
        self.parse_text(&text, &charset)
    }

    /// Parse .po text that is already decoded; the table charset is UTF-8
    pub fn parse_str(&self, input: &str) -> Result<TranslationTable, PoError> {
        self.parse_text(input, UTF_8)
    }

    /// Parse a .po file from a reader
    pub fn parse_from<R: Read>(&self, mut reader: R) -> Result<TranslationTable, PoError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.parse(&data)
    }

    fn parse_text(&self, text: &str, charset: &str) -> Result<TranslationTable, PoError> {
        let mut lexer = PoLexer::new();
        lexer.feed(text)?;
        normalize(lexer.finish()?, charset, self.options.validation)
    }
}

impl TranslationTable {
    /// Parse raw .po data with default options
    pub fn from_po(input: &[u8]) -> Result<Self, PoError> {
        PoParser::default().parse(input)
    }

    /// Parse decoded .po text with default options
    pub fn from_po_str(input: &str) -> Result<Self, PoError> {
        PoParser::default().parse_str(input)
    }
}
