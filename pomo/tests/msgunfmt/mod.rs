//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use plib::testing::{run_test, run_test_u8, TestPlan, TestPlanU8};
use pomo::catalog_lib::headers::parse_headers;
use pomo::{TranslationEntry, TranslationTable};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn sample_table() -> TranslationTable {
    let mut table = TranslationTable::new("utf-8");
    table.headers = parse_headers("Language: fr\n");
    table.insert(TranslationEntry::new("Hello", &["Bonjour"]));
    table.insert(TranslationEntry::new("Open", &["Ouvrir"]).with_context("menu"));
    table.insert(TranslationEntry::new("file", &["fichier", "fichiers"]).with_plural("files"));
    table
}

const SAMPLE_PO: &str = r#"msgid ""
msgstr ""
"Language: fr\n"
"Content-Type: text/plain; charset=utf-8\n"

msgid "Hello"
msgstr "Bonjour"

msgid "file"
msgid_plural "files"
msgstr[0] "fichier"
msgstr[1] "fichiers"

msgctxt "menu"
msgid "Open"
msgstr "Ouvrir"
"#;

/// Create a temporary .mo file for testing
fn create_temp_mo_file(data: &[u8]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let mo_path = temp_dir.path().join("test.mo");
    fs::write(&mo_path, data).unwrap();
    (temp_dir, mo_path)
}

/// Test msgunfmt writes the catalog as .po to stdout
#[test]
fn test_msgunfmt_simple() {
    let (_temp_dir, mo_path) = create_temp_mo_file(&sample_table().to_mo().unwrap());

    run_test(TestPlan {
        cmd: String::from("msgunfmt"),
        args: vec![mo_path.to_str().unwrap().to_string()],
        stdin_data: String::new(),
        expected_out: String::from(SAMPLE_PO),
        expected_err: String::new(),
        expected_exit_code: 0,
    });
}

/// Test msgunfmt reading standard input
#[test]
fn test_msgunfmt_stdin() {
    run_test_u8(TestPlanU8 {
        cmd: String::from("msgunfmt"),
        args: vec![String::from("-")],
        stdin_data: sample_table().to_mo().unwrap(),
        expected_out: SAMPLE_PO.as_bytes().to_vec(),
        expected_err: Vec::new(),
        expected_exit_code: 0,
    });
}

/// Test msgunfmt -s -o writes sorted output to a file
#[test]
fn test_msgunfmt_sorted_output_file() {
    let (temp_dir, mo_path) = create_temp_mo_file(&sample_table().to_mo().unwrap());
    let po_path = temp_dir.path().join("out.po");

    run_test(TestPlan {
        cmd: String::from("msgunfmt"),
        args: vec![
            String::from("-s"),
            String::from("-o"),
            po_path.to_str().unwrap().to_string(),
            mo_path.to_str().unwrap().to_string(),
        ],
        stdin_data: String::new(),
        expected_out: String::new(),
        expected_err: String::new(),
        expected_exit_code: 0,
    });

    let text = fs::read_to_string(&po_path).unwrap();
    let ids: Vec<&str> = text
        .lines()
        .filter_map(|line| line.strip_prefix("msgid \""))
        .collect();
    assert_eq!(ids, vec!["\"", "Hello\"", "Open\"", "file\""]);
}

/// Test msgunfmt -v reports the message count
#[test]
fn test_msgunfmt_verbose() {
    let (temp_dir, mo_path) = create_temp_mo_file(&sample_table().to_mo().unwrap());
    let po_path = temp_dir.path().join("out.po");

    run_test(TestPlan {
        cmd: String::from("msgunfmt"),
        args: vec![
            String::from("-v"),
            String::from("-o"),
            po_path.to_str().unwrap().to_string(),
            mo_path.to_str().unwrap().to_string(),
        ],
        stdin_data: String::new(),
        expected_out: String::new(),
        expected_err: format!("msgunfmt: {}: 3 translated messages\n", mo_path.display()),
        expected_exit_code: 0,
    });
}

/// Test msgunfmt rejects input that is not a .mo file
#[test]
fn test_msgunfmt_not_mo() {
    let (_temp_dir, mo_path) = create_temp_mo_file(b"msgid \"a\"\nmsgstr \"b\"\n");

    run_test(TestPlan {
        cmd: String::from("msgunfmt"),
        args: vec![mo_path.to_str().unwrap().to_string()],
        stdin_data: String::new(),
        expected_out: String::new(),
        expected_err: format!("msgunfmt: {}: not a valid .mo file\n", mo_path.display()),
        expected_exit_code: 1,
    });
}

/// Test msgunfmt reports a truncated .mo file
#[test]
fn test_msgunfmt_truncated() {
    let data = sample_table().to_mo().unwrap();
    let (_temp_dir, mo_path) = create_temp_mo_file(&data[..40]);

    run_test(TestPlan {
        cmd: String::from("msgunfmt"),
        args: vec![mo_path.to_str().unwrap().to_string()],
        stdin_data: String::new(),
        expected_out: String::new(),
        expected_err: format!(
            "msgunfmt: {}: translation string table out of bounds at offset 60\n",
            mo_path.display()
        ),
        expected_exit_code: 1,
    });
}
