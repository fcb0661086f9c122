//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use plib::testing::{
    run_test, run_test_u8_with_checker, run_test_with_checker, TestPlan, TestPlanU8,
};
use pomo::TranslationTable;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temporary .po file for testing
fn create_temp_po_file(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let po_path = temp_dir.path().join("test.po");
    let mut file = File::create(&po_path).unwrap();
    write!(file, "{}", content).unwrap();
    (temp_dir, po_path)
}

fn arg(path: &Path) -> String {
    path.to_str().unwrap().to_string()
}

fn msgfmt_ok(args: Vec<String>) {
    run_test(TestPlan {
        cmd: String::from("msgfmt"),
        args,
        stdin_data: String::new(),
        expected_out: String::new(),
        expected_err: String::new(),
        expected_exit_code: 0,
    });
}

fn read_mo(path: &Path) -> TranslationTable {
    let data = fs::read(path).unwrap();
    TranslationTable::from_mo(&data)
        .unwrap()
        .expect("output should be a .mo file")
}

/// Test msgfmt with simple .po file
#[test]
fn test_msgfmt_simple() {
    let po_content = r#"
msgid ""
msgstr ""
"Content-Type: text/plain; charset=UTF-8\n"

msgid "Hello"
msgstr "Hola"
"#;

    let (temp_dir, po_path) = create_temp_po_file(po_content);
    let mo_path = temp_dir.path().join("test.mo");

    msgfmt_ok(vec![String::from("-o"), arg(&mo_path), arg(&po_path)]);

    let data = fs::read(&mo_path).unwrap();
    // Magic number should be 0x950412de (little-endian)
    assert_eq!(&data[..4], &[0xde, 0x12, 0x04, 0x95]);

    let table = read_mo(&mo_path);
    assert_eq!(table.charset, "utf-8");
    assert_eq!(table.get("", "Hello").unwrap().translations, vec!["Hola"]);
}

/// Test msgfmt with plural forms and context
#[test]
fn test_msgfmt_plural_and_context() {
    let po_content = r#"
msgid ""
msgstr ""
"Content-Type: text/plain; charset=UTF-8\n"
"Plural-Forms: nplurals=2; plural=(n != 1);\n"

msgid "One file"
msgid_plural "%d files"
msgstr[0] "Un archivo"
msgstr[1] "%d archivos"

msgctxt "menu"
msgid "Open"
msgstr "Abrir"
"#;

    let (temp_dir, po_path) = create_temp_po_file(po_content);
    let mo_path = temp_dir.path().join("plural.mo");

    msgfmt_ok(vec![
        String::from("-c"),
        String::from("-o"),
        arg(&mo_path),
        arg(&po_path),
    ]);

    let table = read_mo(&mo_path);
    let plural = table.get("", "One file").unwrap();
    assert_eq!(plural.plural_id.as_deref(), Some("%d files"));
    assert_eq!(plural.translations, vec!["Un archivo", "%d archivos"]);
    assert_eq!(table.get("menu", "Open").unwrap().translations, vec!["Abrir"]);
}

/// Test msgfmt derives the output name from the input
#[test]
fn test_msgfmt_default_output() {
    let (temp_dir, po_path) = create_temp_po_file("msgid \"a\"\nmsgstr \"b\"\n");

    msgfmt_ok(vec![arg(&po_path)]);

    let mo_path = temp_dir.path().join("test.mo");
    assert!(mo_path.exists(), "Output .mo file should exist");
    assert_eq!(read_mo(&mo_path).charset, "iso-8859-1");
}

/// Test msgfmt --big-endian
#[test]
fn test_msgfmt_big_endian() {
    let (temp_dir, po_path) = create_temp_po_file("msgid \"a\"\nmsgstr \"b\"\n");
    let mo_path = temp_dir.path().join("be.mo");

    msgfmt_ok(vec![
        String::from("--big-endian"),
        String::from("-o"),
        arg(&mo_path),
        arg(&po_path),
    ]);

    let data = fs::read(&mo_path).unwrap();
    assert_eq!(&data[..4], &[0x95, 0x04, 0x12, 0xde]);
    assert_eq!(read_mo(&mo_path).get("", "a").unwrap().translations, vec!["b"]);
}

/// Test msgfmt skips fuzzy entries by default and keeps them with -f
#[test]
fn test_msgfmt_fuzzy() {
    let po_content = r#"
#, fuzzy
msgid "Fuzzy message"
msgstr "Mensaje difuso"

msgid "Normal message"
msgstr "Mensaje normal"
"#;

    let (temp_dir, po_path) = create_temp_po_file(po_content);
    let mo_path = temp_dir.path().join("fuzzy.mo");

    msgfmt_ok(vec![String::from("-o"), arg(&mo_path), arg(&po_path)]);
    let table = read_mo(&mo_path);
    assert!(table.get("", "Fuzzy message").is_none());
    assert!(table.get("", "Normal message").is_some());

    msgfmt_ok(vec![
        String::from("-f"),
        String::from("-o"),
        arg(&mo_path),
        arg(&po_path),
    ]);
    let table = read_mo(&mo_path);
    assert!(table.get("", "Fuzzy message").is_some());
}

/// Test msgfmt --strict rejects duplicate messages
#[test]
fn test_msgfmt_strict_duplicate() {
    let po_content = "msgid \"hello\"\nmsgstr \"a\"\n\nmsgid \"hello\"\nmsgstr \"b\"\n";
    let (temp_dir, po_path) = create_temp_po_file(po_content);
    let mo_path = temp_dir.path().join("dup.mo");

    run_test(TestPlan {
        cmd: String::from("msgfmt"),
        args: vec![
            String::from("--strict"),
            String::from("-o"),
            arg(&mo_path),
            arg(&po_path),
        ],
        stdin_data: String::new(),
        expected_out: String::new(),
        expected_err: format!(
            "msgfmt: {}: error: duplicate msgid \"hello\" in context \"\"\n",
            po_path.display()
        ),
        expected_exit_code: 1,
    });
    assert!(!mo_path.exists());

    // without validation the later entry wins
    msgfmt_ok(vec![String::from("-o"), arg(&mo_path), arg(&po_path)]);
    assert_eq!(
        read_mo(&mo_path).get("", "hello").unwrap().translations,
        vec!["b"]
    );
}

/// Test msgfmt -c checks plural form counts
#[test]
fn test_msgfmt_plural_count() {
    let po_content = r#"msgid ""
msgstr "Plural-Forms: nplurals=3; plural=(n==1 ? 0 : n==2 ? 1 : 2);\n"

msgid "file"
msgid_plural "files"
msgstr[0] "a"
msgstr[1] "b"
"#;
    let (temp_dir, po_path) = create_temp_po_file(po_content);
    let mo_path = temp_dir.path().join("range.mo");

    run_test(TestPlan {
        cmd: String::from("msgfmt"),
        args: vec![
            String::from("-c"),
            String::from("-o"),
            arg(&mo_path),
            arg(&po_path),
        ],
        stdin_data: String::new(),
        expected_out: String::new(),
        expected_err: format!(
            "msgfmt: {}: error: expected 3 plural forms but found 2 for \"file\" in context \"\"\n",
            po_path.display()
        ),
        expected_exit_code: 1,
    });
}

/// Test msgfmt reports syntax errors with their line
#[test]
fn test_msgfmt_syntax_error() {
    let po_content = "msgid \"a\"\nmsgstr \"b\"\n\nmsgid \"c\" oops\nmsgstr \"d\"\n";
    let (temp_dir, po_path) = create_temp_po_file(po_content);
    let mo_path = temp_dir.path().join("bad.mo");

    run_test(TestPlan {
        cmd: String::from("msgfmt"),
        args: vec![String::from("-o"), arg(&mo_path), arg(&po_path)],
        stdin_data: String::new(),
        expected_out: String::new(),
        expected_err: format!(
            "msgfmt: {}: error: line 4: invalid key name \"oops\" (possibly an unescaped quote in a string)\n",
            po_path.display()
        ),
        expected_exit_code: 1,
    });
}

/// Test msgfmt -v prints statistics
#[test]
fn test_msgfmt_verbose() {
    let po_content = r#"msgid ""
msgstr "Content-Type: text/plain; charset=UTF-8\n"

msgid "one"
msgstr "uno"

msgid "two"
msgstr "dos"

msgid "untranslated"
msgstr ""

#~ msgid "old"
#~ msgstr "viejo"
"#;
    let (temp_dir, po_path) = create_temp_po_file(po_content);
    let mo_path = temp_dir.path().join("stats.mo");

    run_test(TestPlan {
        cmd: String::from("msgfmt"),
        args: vec![
            String::from("-v"),
            String::from("-o"),
            arg(&mo_path),
            arg(&po_path),
        ],
        stdin_data: String::new(),
        expected_out: String::new(),
        expected_err: format!(
            "msgfmt: {}: warning: 2 translated messages, 1 obsolete\n",
            po_path.display()
        ),
        expected_exit_code: 0,
    });

    let table = read_mo(&mo_path);
    assert_eq!(table.translations.len(), 2);
    assert!(table.obsolete.is_none());
}

/// Test msgfmt --po writes normalized .po text to stdout
#[test]
fn test_msgfmt_po_output_from_stdin() {
    run_test(TestPlan {
        cmd: String::from("msgfmt"),
        args: vec![String::from("--po"), String::from("-")],
        stdin_data: String::from("msgid  \"Hello\"\r\nmsgstr \"Bon\"\n\"jour\"\n"),
        expected_out: String::from(
            "msgid \"\"\nmsgstr \"Content-Type: text/plain; charset=iso-8859-1\\n\"\n\nmsgid \"Hello\"\nmsgstr \"Bonjour\"\n",
        ),
        expected_err: String::new(),
        expected_exit_code: 0,
    });
}

/// Test msgfmt writes .mo data to stdout
#[test]
fn test_msgfmt_mo_to_stdout() {
    run_test_u8_with_checker(
        TestPlanU8 {
            cmd: String::from("msgfmt"),
            args: vec![String::from("-o"), String::from("-"), String::from("-")],
            stdin_data: b"msgid \"x\"\nmsgstr \"y\"\n".to_vec(),
            expected_out: Vec::new(),
            expected_err: Vec::new(),
            expected_exit_code: 0,
        },
        |plan, output| {
            assert_eq!(output.status.code(), Some(plan.expected_exit_code));
            assert_eq!(output.stderr, plan.expected_err);
            let table = TranslationTable::from_mo(&output.stdout).unwrap().unwrap();
            assert_eq!(table.get("", "x").unwrap().translations, vec!["y"]);
        },
    );
}

/// Test msgfmt with a missing input file
#[test]
fn test_msgfmt_missing_file() {
    run_test_with_checker(
        TestPlan {
            cmd: String::from("msgfmt"),
            args: vec![String::from("/nonexistent/missing.po")],
            stdin_data: String::new(),
            expected_out: String::new(),
            expected_err: String::new(),
            expected_exit_code: 1,
        },
        |plan, output| {
            assert_eq!(output.status.code(), Some(plan.expected_exit_code));
            let stderr = String::from_utf8_lossy(&output.stderr);
            assert!(stderr.starts_with("msgfmt: /nonexistent/missing.po: error: "));
        },
    );
}

/// Test msgfmt refuses -o with several inputs
#[test]
fn test_msgfmt_output_with_many_inputs() {
    run_test(TestPlan {
        cmd: String::from("msgfmt"),
        args: vec![
            String::from("-o"),
            String::from("out.mo"),
            String::from("a.po"),
            String::from("b.po"),
        ],
        stdin_data: String::new(),
        expected_out: String::new(),
        expected_err: String::from("msgfmt: -o cannot be used with more than one input file\n"),
        expected_exit_code: 1,
    });
}

/// Test msgfmt --list-charsets prints the built-in charsets
#[test]
fn test_msgfmt_list_charsets() {
    run_test(TestPlan {
        cmd: String::from("msgfmt"),
        args: vec![String::from("--list-charsets")],
        stdin_data: String::new(),
        expected_out: String::from(
            "ascii\nutf-8\niso-8859-1\nutf-16\nutf-16le\nutf-16be\nutf-32\nutf-32le\nutf-32be\n",
        ),
        expected_err: String::new(),
        expected_exit_code: 0,
    });
}

/// Test msgfmt stops at the first syntax error of a long input
#[test]
fn test_msgfmt_syntax_error_long_input() {
    let mut input = String::from("msgid \"a\" oops\nmsgstr \"b\"\n");
    while input.len() < 64 * 1024 {
        input.push_str("msgid \"x\" bad\n");
    }

    run_test(TestPlan {
        cmd: String::from("msgfmt"),
        args: vec![String::from("--po"), String::from("-")],
        stdin_data: input,
        expected_out: String::new(),
        expected_err: String::from(
            "msgfmt: -: error: line 1: invalid key name \"oops\" (possibly an unescaped quote in a string)\n",
        ),
        expected_exit_code: 1,
    });
}

/// Test msgfmt accepts a UTF-8 byte order mark
#[test]
fn test_msgfmt_byte_order_mark() {
    let po_content = "\u{feff}msgid \"\"\nmsgstr \"Content-Type: text/plain; charset=UTF-8\\n\"\n\nmsgid \"tea\"\nmsgstr \"thé\"\n";
    let (temp_dir, po_path) = create_temp_po_file(po_content);
    let mo_path = temp_dir.path().join("bom.mo");

    msgfmt_ok(vec![String::from("-o"), arg(&mo_path), arg(&po_path)]);

    let table = read_mo(&mo_path);
    assert_eq!(table.charset, "utf-8");
    assert_eq!(table.get("", "tea").unwrap().translations, vec!["thé"]);
}
