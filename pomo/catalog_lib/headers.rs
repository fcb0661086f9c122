//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Catalog header fields
//!
//! The header is the msgstr of the entry with an empty msgid. It holds
//! `Key: Value` lines such as `Content-Type: text/plain; charset=UTF-8`
//! and `Plural-Forms: nplurals=2; plural=(n != 1);`.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::catalog_lib::table::Headers;
use crate::charset_lib::normalize_charset;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const PLURAL_FORMS: &str = "Plural-Forms";
pub const POT_CREATION_DATE: &str = "POT-Creation-Date";

/// Lower-case header name to canonical spelling
fn header_names() -> &'static HashMap<&'static str, &'static str> {
    static NAMES: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    NAMES.get_or_init(|| {
        let mut names = HashMap::new();
        names.extend(vec![
            ("project-id-version", "Project-Id-Version"),
            ("report-msgid-bugs-to", "Report-Msgid-Bugs-To"),
            ("pot-creation-date", POT_CREATION_DATE),
            ("po-revision-date", "PO-Revision-Date"),
            ("last-translator", "Last-Translator"),
            ("language-team", "Language-Team"),
            ("language", "Language"),
            ("mime-version", "MIME-Version"),
            ("content-type", CONTENT_TYPE),
            ("content-transfer-encoding", "Content-Transfer-Encoding"),
            ("plural-forms", PLURAL_FORMS),
            ("x-generator", "X-Generator"),
        ]);
        names
    })
}

/// Canonical spelling of a header name; unknown names are returned trimmed
pub fn canonical_header_name(key: &str) -> String {
    let key = key.trim();
    match header_names().get(key.to_lowercase().as_str()) {
        Some(name) => name.to_string(),
        None => key.to_string(),
    }
}

/// Parse `Key: Value` lines into header fields
pub fn parse_headers(text: &str) -> Headers {
    let mut headers = Headers::new();

    for line in text.split('\n') {
        let (key, value) = match line.split_once(':') {
            Some((key, value)) => (key, value),
            None => (line, ""),
        };
        if key.trim().is_empty() {
            continue;
        }
        headers.insert(canonical_header_name(key), value.trim().to_string());
    }

    headers
}

/// Render header fields as `Key: Value\n` lines
pub fn generate_headers(headers: &Headers) -> String {
    let mut text = String::new();
    for (key, value) in headers.iter() {
        if key.is_empty() {
            continue;
        }
        text.push_str(key);
        text.push_str(": ");
        text.push_str(value.trim());
        text.push('\n');
    }
    text
}

fn header_value<'a>(headers: &'a Headers, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Plural form count from `Plural-Forms`; 1 when absent or unusable
pub fn nplurals(headers: &Headers) -> usize {
    static NPLURALS: OnceLock<Regex> = OnceLock::new();
    let re = NPLURALS
        .get_or_init(|| Regex::new(r"nplurals\s*=\s*(\d+)").expect("nplurals pattern"));

    header_value(headers, PLURAL_FORMS)
        .and_then(|forms| re.captures(forms))
        .and_then(|caps| caps[1].parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(1)
}

/// Make the `Content-Type` header declare `charset`
///
/// A `charset=` parameter that already names the same charset (under any
/// alias) is left untouched; the `CHARSET` placeholder is replaced and a
/// missing header is created.
pub fn sync_content_type(headers: &mut Headers, charset: &str) {
    let current = match header_value(headers, CONTENT_TYPE) {
        Some(value) => value.to_string(),
        None => {
            headers.insert(
                CONTENT_TYPE.to_string(),
                format!("text/plain; charset={}", charset),
            );
            return;
        }
    };

    let mut parts: Vec<String> = current.split(';').map(|p| p.trim().to_string()).collect();
    let mut changed = false;
    if parts[0].is_empty() {
        parts[0] = "text/plain".to_string();
        changed = true;
    }

    let mut found = false;
    for part in parts.iter_mut().skip(1) {
        let declared = match part.split_once('=') {
            Some((key, value)) if key.trim().eq_ignore_ascii_case("charset") => value,
            _ => continue,
        };
        found = true;
        if normalize_charset(declared, "") != charset {
            *part = format!("charset={}", charset);
            changed = true;
        }
    }
    if !found {
        parts.push(format!("charset={}", charset));
        changed = true;
    }

    if changed {
        let key = headers
            .keys()
            .find(|key| key.eq_ignore_ascii_case(CONTENT_TYPE))
            .unwrap_or(CONTENT_TYPE)
            .to_string();
        let value = parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("; ");
        headers.insert(key, value);
    }
}
