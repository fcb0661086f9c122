//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use plib::testing::{run_test, TestPlan};
use pomo::{PoCompileOptions, PoCompiler, PoParser, TranslationEntry, TranslationTable};
use std::fs;
use tempfile::TempDir;

const CATALOG: &str = r#"# German translation
msgid ""
msgstr ""
"Project-Id-Version: demo 2.1\n"
"Language: de\n"
"Content-Type: text/plain; charset=utf-8\n"
"Plural-Forms: nplurals=2; plural=(n != 1);\n"

#: src/main.c:10
#, c-format
msgid "Hello %s"
msgstr "Hallo %s"

msgid "%d file"
msgid_plural "%d files"
msgstr[0] "%d Datei"
msgstr[1] "%d Dateien"

msgctxt "menu"
msgid "Open"
msgstr "Öffnen"

#~ msgid "Quit"
#~ msgstr "Beenden"
"#;

/// Reverse every 32-bit word of the header and descriptor tables
fn byte_swap(le: &[u8], nstrings: usize) -> Vec<u8> {
    let mut be = le.to_vec();
    for word in be[..28 + 16 * nstrings].chunks_mut(4) {
        word.reverse();
    }
    be
}

#[test]
fn test_po_text_round_trip() {
    let table = TranslationTable::from_po(CATALOG.as_bytes()).unwrap();
    assert_eq!(table.charset, "utf-8");
    assert_eq!(table.nplurals(), 2);
    assert_eq!(table.obsolete_entries().count(), 1);

    let out = table.to_po().unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), CATALOG);
}

#[test]
fn test_po_to_mo_keeps_translations() {
    let table = TranslationTable::from_po(CATALOG.as_bytes()).unwrap();
    let decoded = TranslationTable::from_mo(&table.to_mo().unwrap())
        .unwrap()
        .unwrap();

    assert_eq!(decoded.charset, "utf-8");
    assert!(decoded.obsolete.is_none());
    assert_eq!(decoded.translations.len(), 3);
    for entry in table.entries() {
        let other = decoded.get(entry.context_key(), &entry.id).unwrap();
        assert_eq!(other.plural_id, entry.plural_id);
        assert_eq!(other.translations, entry.translations);
    }
    assert_eq!(
        decoded.headers.get("Plural-Forms").map(String::as_str),
        Some("nplurals=2; plural=(n != 1);")
    );
}

#[test]
fn test_big_endian_copy_decodes_the_same() {
    let table = TranslationTable::from_po(CATALOG.as_bytes()).unwrap();
    let le = table.to_mo().unwrap();
    // header entry plus three messages
    let be = byte_swap(&le, 4);
    assert_eq!(&be[..4], &[0x95, 0x04, 0x12, 0xde]);

    let from_le = TranslationTable::from_mo(&le).unwrap().unwrap();
    let from_be = TranslationTable::from_mo(&be).unwrap().unwrap();
    assert_eq!(from_le, from_be);

    assert_eq!(from_be.to_mo().unwrap(), le);
}

#[test]
fn test_compiled_lines_respect_width() {
    let long = "The quick brown fox jumps over the lazy dog; \"quoted\", tab\there, \
                back\\slash and a newline\nthen more text after it";
    let mut table = TranslationTable::new("utf-8");
    table.insert(TranslationEntry::new(long, &[long]));

    for width in [2, 5, 13, 30, 76] {
        let compiler = PoCompiler::new(PoCompileOptions {
            fold_length: width,
            ..Default::default()
        });
        let text = compiler.compile_to_string(&table);

        for line in text.lines().filter(|l| l.starts_with('"')) {
            let body = &line[1..line.len() - 1];
            assert!(!body.ends_with('\\') || body.ends_with("\\\\"));
        }

        let reparsed = PoParser::default().parse_str(&text).unwrap();
        assert_eq!(reparsed.get("", long).unwrap().translations, vec![long]);
    }
}

#[test]
fn test_hello_bonjour() {
    let table = TranslationTable::from_po(b"msgid \"Hello\"\nmsgstr \"Bonjour\"\n").unwrap();
    let mo = table.to_mo().unwrap();

    let decoded = TranslationTable::from_mo(&mo).unwrap().unwrap();
    assert_eq!(decoded.charset, "iso-8859-1");
    assert_eq!(
        decoded.get("", "Hello").unwrap().translations,
        vec!["Bonjour"]
    );
    assert_eq!(
        String::from_utf8(decoded.to_po().unwrap()).unwrap(),
        "msgid \"\"\nmsgstr \"Content-Type: text/plain; charset=iso-8859-1\\n\"\n\nmsgid \"Hello\"\nmsgstr \"Bonjour\"\n"
    );
}

/// msgfmt then msgunfmt gives back the catalog without obsolete entries
#[test]
fn test_msgfmt_msgunfmt() {
    let temp_dir = TempDir::new().unwrap();
    let po_path = temp_dir.path().join("de.po");
    let mo_path = temp_dir.path().join("de.mo");
    fs::write(&po_path, CATALOG).unwrap();

    run_test(TestPlan {
        cmd: String::from("msgfmt"),
        args: vec![
            String::from("-c"),
            String::from("-o"),
            mo_path.to_str().unwrap().to_string(),
            po_path.to_str().unwrap().to_string(),
        ],
        stdin_data: String::new(),
        expected_out: String::new(),
        expected_err: String::new(),
        expected_exit_code: 0,
    });

    run_test(TestPlan {
        cmd: String::from("msgunfmt"),
        args: vec![mo_path.to_str().unwrap().to_string()],
        stdin_data: String::new(),
        expected_out: String::from(
            r#"msgid ""
msgstr ""
"Project-Id-Version: demo 2.1\n"
"Language: de\n"
"Content-Type: text/plain; charset=utf-8\n"
"Plural-Forms: nplurals=2; plural=(n != 1);\n"

msgid "%d file"
msgid_plural "%d files"
msgstr[0] "%d Datei"
msgstr[1] "%d Dateien"

msgid "Hello %s"
msgstr "Hallo %s"

msgctxt "menu"
msgid "Open"
msgstr "Öffnen"
"#,
        ),
        expected_err: String::new(),
        expected_exit_code: 0,
    });
}
