//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Translation table: the representation shared by the PO and MO codecs
//!
//! A table holds the catalog charset, the parsed header fields, and the
//! entries grouped by context (`msgctxt`, with `""` as the default context)
//! and then by msgid. Obsolete (`#~`) entries live in a separate section so
//! they never collide with active ones.

use std::collections::HashMap;

use crate::catalog_lib::headers;

/// Insertion-ordered map keyed by string
///
/// Replacing the value of an existing key keeps the key's original position.
/// Equality ignores ordering.
#[derive(Debug, Clone)]
pub struct OrderedMap<V> {
    index: HashMap<String, usize>,
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        OrderedMap {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<V: PartialEq> PartialEq for OrderedMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|v| v == value))
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Insert or replace; returns the previous value if the key existed
    pub fn insert(&mut self, key: String, value: V) -> Option<V> {
        if let Some(&i) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[i].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    /// Get the value for `key`, inserting one built by `make` if absent
    pub fn get_or_insert_with<F: FnOnce() -> V>(&mut self, key: &str, make: F) -> &mut V {
        let i = match self.index.get(key) {
            Some(&i) => i,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), make()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[i].1
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<V> FromIterator<(String, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// Header fields of a catalog, in declaration order
pub type Headers = OrderedMap<String>;

/// Comments attached to an entry, one field per comment kind
///
/// Each field joins the lines of its kind with `\n`, in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentBlock {
    /// `# ...`
    pub translator: Option<String>,
    /// `#. ...`
    pub extracted: Option<String>,
    /// `#: file:line`
    pub reference: Option<String>,
    /// `#, fuzzy, c-format`
    pub flag: Option<String>,
    /// `#| msgid "..."`
    pub previous: Option<String>,
}

impl CommentBlock {
    pub fn is_empty(&self) -> bool {
        self.translator.is_none()
            && self.extracted.is_none()
            && self.reference.is_none()
            && self.flag.is_none()
            && self.previous.is_none()
    }

    /// True if the flag comment lists `flag` (e.g. `fuzzy`)
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flag.as_deref().is_some_and(|flags| {
            flags
                .split(|c| c == ',' || c == '\n')
                .any(|f| f.trim() == flag)
        })
    }
}

/// One original string and its translations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationEntry {
    /// Message context (msgctxt)
    pub context: Option<String>,
    /// Original string (msgid)
    pub id: String,
    /// Plural original (msgid_plural)
    pub plural_id: Option<String>,
    /// msgstr, or msgstr[0..n] for plural entries
    pub translations: Vec<String>,
    pub comments: CommentBlock,
    /// Commented out with `#~`
    pub obsolete: bool,
}

impl TranslationEntry {
    pub fn new(id: &str, translations: &[&str]) -> Self {
        TranslationEntry {
            id: id.to_string(),
            translations: translations.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_context(mut self, context: &str) -> Self {
        self.context = Some(context.to_string());
        self
    }

    pub fn with_plural(mut self, plural_id: &str) -> Self {
        self.plural_id = Some(plural_id.to_string());
        self
    }

    pub fn with_comments(mut self, comments: CommentBlock) -> Self {
        self.comments = comments;
        self
    }

    pub fn is_plural(&self) -> bool {
        self.plural_id.is_some()
    }

    /// Context key used in the table; absent context is `""`
    pub fn context_key(&self) -> &str {
        self.context.as_deref().unwrap_or("")
    }

    /// The reserved header slot: empty context and empty msgid
    pub fn is_header(&self) -> bool {
        self.id.is_empty() && self.context_key().is_empty()
    }
}

/// Entries grouped by context, then by msgid
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    contexts: OrderedMap<OrderedMap<TranslationEntry>>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries across all contexts
    pub fn len(&self) -> usize {
        self.contexts.values().map(|ids| ids.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, context: &str, id: &str) -> Option<&TranslationEntry> {
        self.contexts.get(context).and_then(|ids| ids.get(id))
    }

    pub fn contains(&self, context: &str, id: &str) -> bool {
        self.get(context, id).is_some()
    }

    /// Insert keyed by (context, id); an existing entry is replaced in place
    pub fn insert(&mut self, entry: TranslationEntry) -> Option<TranslationEntry> {
        let context = entry.context_key().to_string();
        let id = entry.id.clone();
        self.contexts
            .get_or_insert_with(&context, OrderedMap::new)
            .insert(id, entry)
    }

    /// All entries, context by context, in insertion order
    pub fn entries(&self) -> impl Iterator<Item = &TranslationEntry> {
        self.contexts.values().flat_map(|ids| ids.values())
    }
}

/// A parsed or decoded catalog
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationTable {
    /// Canonical charset name of the source (and default output) encoding
    pub charset: String,
    pub headers: Headers,
    /// Comments written above the header entry
    pub header_comments: CommentBlock,
    pub translations: Section,
    /// Present only when the catalog has obsolete entries
    pub obsolete: Option<Section>,
}

impl TranslationTable {
    pub fn new(charset: &str) -> Self {
        TranslationTable {
            charset: charset.to_string(),
            headers: Headers::new(),
            header_comments: CommentBlock::default(),
            translations: Section::new(),
            obsolete: None,
        }
    }

    pub fn get(&self, context: &str, id: &str) -> Option<&TranslationEntry> {
        self.translations.get(context, id)
    }

    /// Insert an entry into the active or obsolete section, last write wins
    pub fn insert(&mut self, entry: TranslationEntry) -> Option<TranslationEntry> {
        if entry.obsolete {
            self.obsolete.get_or_insert_with(Section::new).insert(entry)
        } else {
            self.translations.insert(entry)
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &TranslationEntry> {
        self.translations.entries()
    }

    pub fn obsolete_entries(&self) -> impl Iterator<Item = &TranslationEntry> {
        self.obsolete.iter().flat_map(|section| section.entries())
    }

    /// Plural form count declared by the `Plural-Forms` header
    pub fn nplurals(&self) -> usize {
        headers::nplurals(&self.headers)
    }
}
