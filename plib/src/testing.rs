//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

pub struct TestPlan {
    pub cmd: String,
    pub args: Vec<String>,
    pub stdin_data: String,
    pub expected_out: String,
    pub expected_err: String,
    pub expected_exit_code: i32,
}

pub struct TestPlanU8 {
    pub cmd: String,
    pub args: Vec<String>,
    pub stdin_data: Vec<u8>,
    pub expected_out: Vec<u8>,
    pub expected_err: Vec<u8>,
    pub expected_exit_code: i32,
}

/// Path of a workspace binary built for the current profile
pub fn test_bin_path(cmd: &str) -> PathBuf {
    let relpath = if cfg!(debug_assertions) {
        format!("target/debug/{}", cmd)
    } else {
        format!("target/release/{}", cmd)
    };
    std::env::current_dir()
        .unwrap()
        .parent()
        .unwrap() // Move up to the workspace root from the current package directory
        .join(relpath)
}

/// Run a workspace binary with `args`, feeding it `stdin_data`
pub fn run_test_base(cmd: &str, args: &[String], stdin_data: &[u8]) -> Output {
    let mut child = Command::new(test_bin_path(cmd))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap_or_else(|_| panic!("failed to spawn command {cmd}"));

    // a writer thread keeps a large stdin from deadlocking against stdout
    let stdin = child.stdin.take();
    let data = stdin_data.to_vec();
    let writer = std::thread::spawn(move || {
        if let Some(mut stdin) = stdin {
            if let Err(e) = stdin.write_all(&data) {
                eprintln!("Error writing to stdin: {}", e);
            }
        }
    });

    let output = child.wait_with_output().expect("failed to wait for child");
    writer.join().expect("stdin writer panicked");
    output
}

fn check_status(output: &Output, expected_exit_code: i32) {
    assert_eq!(output.status.code(), Some(expected_exit_code));
    if expected_exit_code == 0 {
        assert!(output.status.success());
    }
}

pub fn run_test(plan: TestPlan) {
    let output = run_test_base(&plan.cmd, &plan.args, plan.stdin_data.as_bytes());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, plan.expected_out);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr, plan.expected_err);

    check_status(&output, plan.expected_exit_code);
}

pub fn run_test_u8(plan: TestPlanU8) {
    let output = run_test_base(&plan.cmd, &plan.args, &plan.stdin_data);

    assert_eq!(output.stdout, plan.expected_out);
    assert_eq!(output.stderr, plan.expected_err);

    check_status(&output, plan.expected_exit_code);
}

/// Run the command, then hand the output to `checker` instead of comparing
pub fn run_test_with_checker<F: FnMut(&TestPlan, &Output)>(plan: TestPlan, mut checker: F) {
    let output = run_test_base(&plan.cmd, &plan.args, plan.stdin_data.as_bytes());
    checker(&plan, &output);
}

/// Like [`run_test_with_checker`], for binary stdin
pub fn run_test_u8_with_checker<F: FnMut(&TestPlanU8, &Output)>(plan: TestPlanU8, mut checker: F) {
    let output = run_test_base(&plan.cmd, &plan.args, &plan.stdin_data);
    checker(&plan, &output);
}
