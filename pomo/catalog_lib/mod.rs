//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Message catalog library
//!
//! This module provides functionality for parsing and writing .po files,
//! reading and writing GNU .mo files, and the translation table both
//! formats are converted through.

pub mod error;
pub mod headers;
pub mod mo_compiler;
pub mod mo_parser;
pub mod po_compiler;
pub mod po_lexer;
pub mod po_parser;
pub mod po_stream;
pub mod table;
