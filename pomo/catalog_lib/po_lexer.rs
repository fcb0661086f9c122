//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! .po tokenizer
//!
//! A character-at-a-time state machine turning PO source text into a flat
//! list of strings, comments and keywords. Input may be fed in pieces; the
//! state carries over between calls to [`PoLexer::feed`].

use crate::catalog_lib::error::PoError;

/// A lexical token of PO source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Quoted literal, escapes resolved
    Str(String),
    /// Comment text following `#`, unresolved
    Comment(String),
    /// Keyword such as `msgid` or `msgstr[1]`
    Key { name: String, obsolete: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    None,
    /// Like `None`, but keywords started here belong to a `#~` entry
    Obsolete,
    Comments,
    Str { quote: char, escaped: bool },
    Key,
}

fn is_key_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '[' | ']')
}

/// `msgctxt | msgid | msgid_plural | msgstr | msgstr[N]`
pub fn is_key_name(name: &str) -> bool {
    match name {
        "msgctxt" | "msgid" | "msgid_plural" | "msgstr" => true,
        _ => name
            .strip_prefix("msgstr[")
            .and_then(|rest| rest.strip_suffix(']'))
            .is_some_and(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit())),
    }
}

/// Incremental PO tokenizer
#[derive(Debug)]
pub struct PoLexer {
    state: State,
    tokens: Vec<Token>,
    line: usize,
    key_line: usize,
}

impl Default for PoLexer {
    fn default() -> Self {
        Self::new()
    }
}

impl PoLexer {
    pub fn new() -> Self {
        PoLexer {
            state: State::None,
            tokens: Vec::new(),
            line: 1,
            key_line: 1,
        }
    }

    /// Current 1-based line number
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Tokenize the next piece of input
    pub fn feed(&mut self, text: &str) -> Result<(), PoError> {
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
            }
            self.step(ch)?;
        }
        Ok(())
    }

    /// End of input: close a pending keyword and return the tokens
    pub fn finish(mut self) -> Result<Vec<Token>, PoError> {
        if self.state == State::Key {
            self.end_key()?;
        }
        Ok(self.tokens)
    }

    fn step(&mut self, ch: char) -> Result<(), PoError> {
        match self.state {
            State::None | State::Obsolete => self.start_token(ch),
            State::Comments => match ch {
                '\n' => self.state = State::None,
                '~' if self.current_is_empty() => {
                    self.push_char(ch);
                    self.state = State::Obsolete;
                }
                '\r' => {}
                _ => self.push_char(ch),
            },
            State::Str { quote, escaped } => {
                if escaped {
                    self.push_char(match ch {
                        't' => '\t',
                        'n' => '\n',
                        'r' => '\r',
                        other => other,
                    });
                    self.state = State::Str {
                        quote,
                        escaped: false,
                    };
                } else if ch == quote {
                    self.state = State::None;
                } else if ch == '\\' {
                    self.state = State::Str {
                        quote,
                        escaped: true,
                    };
                } else {
                    self.push_char(ch);
                }
            }
            State::Key => {
                if is_key_char(ch) {
                    self.push_char(ch);
                } else {
                    // the terminator is handled as if no token were open
                    self.end_key()?;
                    self.start_token(ch);
                }
            }
        }
        Ok(())
    }

    fn start_token(&mut self, ch: char) {
        let obsolete = self.state == State::Obsolete;
        match ch {
            '"' | '\'' => {
                self.tokens.push(Token::Str(String::new()));
                self.state = State::Str {
                    quote: ch,
                    escaped: false,
                };
            }
            '#' => {
                self.tokens.push(Token::Comment(String::new()));
                self.state = State::Comments;
            }
            // a byte order mark counts as whitespace
            _ if ch.is_whitespace() || ch == '\u{feff}' => {}
            _ => {
                self.tokens.push(Token::Key {
                    name: ch.to_string(),
                    obsolete,
                });
                self.key_line = self.line;
                self.state = State::Key;
            }
        }
    }

    fn end_key(&mut self) -> Result<(), PoError> {
        if let Some(Token::Key { name, .. }) = self.tokens.last() {
            if !is_key_name(name) {
                return Err(PoError::Syntax {
                    line: self.key_line,
                    key: name.clone(),
                });
            }
        }
        self.state = State::None;
        Ok(())
    }

    // The token being extended is always the most recently pushed one.
    fn push_char(&mut self, ch: char) {
        match self.tokens.last_mut() {
            Some(Token::Str(value)) | Some(Token::Comment(value)) => value.push(ch),
            Some(Token::Key { name, .. }) => name.push(ch),
            None => {}
        }
    }

    fn current_is_empty(&self) -> bool {
        match self.tokens.last() {
            Some(Token::Str(value)) | Some(Token::Comment(value)) => value.is_empty(),
            Some(Token::Key { name, .. }) => name.is_empty(),
            None => true,
        }
    }
}
