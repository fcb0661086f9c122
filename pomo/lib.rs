//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! posixutils-pomo library
//!
//! This library converts gettext message catalogs between the PO text
//! format and the MO binary format:
//! - PO parsing, with optional strict validation, and PO writing
//! - MO decoding (either byte order) and encoding
//! - charset name normalization and transcoding

pub mod catalog_lib;
pub mod charset_lib;

pub use catalog_lib::error::{MoError, PoError, PoErrorKind};
pub use catalog_lib::mo_compiler::{MoCompileOptions, MoCompiler};
pub use catalog_lib::mo_parser::{Endianness, MoParseOptions, MoParser};
pub use catalog_lib::po_compiler::{PoCompileOptions, PoCompiler, SortMode};
pub use catalog_lib::po_parser::{PoParseOptions, PoParser};
pub use catalog_lib::po_stream::PoStreamParser;
pub use catalog_lib::table::{CommentBlock, Headers, Section, TranslationEntry, TranslationTable};
pub use charset_lib::{normalize_charset, BuiltinTranscoder, CharsetError, Transcoder};
