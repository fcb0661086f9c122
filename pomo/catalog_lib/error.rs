//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::error::Error;
use std::fmt;
use std::io;

use crate::charset_lib::CharsetError;

/// Error type for .po parsing and compilation
#[derive(Debug)]
pub enum PoError {
    /// Unrecognized keyword, with the 1-based line it started on
    Syntax { line: usize, key: String },
    /// msgid declared twice in one context (strict mode)
    Duplicate { context: String, id: String },
    /// msgid_plural declared twice for one entry (strict mode)
    DuplicatePlural { context: String, id: String },
    /// Plural entry whose msgstr count differs from nplurals (strict mode)
    PluralRange {
        context: String,
        id: String,
        expected: usize,
        found: usize,
    },
    /// Singular entry without exactly one msgstr (strict mode)
    SingularRange {
        context: String,
        id: String,
        found: usize,
    },
    Charset(CharsetError),
    Io(io::Error),
}

/// Broad classification of [`PoError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoErrorKind {
    Syntax,
    Duplicate,
    Range,
    Charset,
    Io,
}

impl PoError {
    pub fn kind(&self) -> PoErrorKind {
        match self {
            PoError::Syntax { .. } => PoErrorKind::Syntax,
            PoError::Duplicate { .. } | PoError::DuplicatePlural { .. } => PoErrorKind::Duplicate,
            PoError::PluralRange { .. } | PoError::SingularRange { .. } => PoErrorKind::Range,
            PoError::Charset(_) => PoErrorKind::Charset,
            PoError::Io(_) => PoErrorKind::Io,
        }
    }

    /// Source line of a syntax error
    pub fn line(&self) -> Option<usize> {
        match self {
            PoError::Syntax { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl fmt::Display for PoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoError::Syntax { line, key } => write!(
                f,
                "line {}: invalid key name \"{}\" (possibly an unescaped quote in a string)",
                line, key
            ),
            PoError::Duplicate { context, id } => write!(
                f,
                "duplicate msgid \"{}\" in context \"{}\"",
                id, context
            ),
            PoError::DuplicatePlural { context, id } => write!(
                f,
                "entry \"{}\" in context \"{}\" has multiple msgid_plural declarations",
                id, context
            ),
            PoError::PluralRange {
                context,
                id,
                expected,
                found,
            } => write!(
                f,
                "expected {} plural forms but found {} for \"{}\" in context \"{}\"",
                expected, found, id, context
            ),
            PoError::SingularRange { context, id, found } => write!(
                f,
                "expected 1 msgstr but found {} for \"{}\" in context \"{}\"",
                found, id, context
            ),
            PoError::Charset(e) => write!(f, "{}", e),
            PoError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl Error for PoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PoError::Charset(e) => Some(e),
            PoError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CharsetError> for PoError {
    fn from(e: CharsetError) -> Self {
        PoError::Charset(e)
    }
}

impl From<io::Error> for PoError {
    fn from(e: io::Error) -> Self {
        PoError::Io(e)
    }
}

/// Error type for .mo decoding and encoding
#[derive(Debug)]
pub enum MoError {
    /// A table entry or string body points outside the buffer
    OutOfBounds { what: &'static str, offset: usize },
    /// The catalog does not fit 32-bit offsets
    TooLarge,
    Charset(CharsetError),
    Io(io::Error),
}

impl fmt::Display for MoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoError::OutOfBounds { what, offset } => {
                write!(f, "{} out of bounds at offset {}", what, offset)
            }
            MoError::TooLarge => write!(f, "catalog too large for .mo format"),
            MoError::Charset(e) => write!(f, "{}", e),
            MoError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl Error for MoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MoError::Charset(e) => Some(e),
            MoError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CharsetError> for MoError {
    fn from(e: CharsetError) -> Self {
        MoError::Charset(e)
    }
}

impl From<io::Error> for MoError {
    fn from(e: io::Error) -> Self {
        MoError::Io(e)
    }
}
