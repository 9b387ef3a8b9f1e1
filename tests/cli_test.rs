// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Runs the `osbc` binary against temporary source files.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::tempdir;

fn osbc(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_osbc"))
        .args(args)
        .output()
        .unwrap()
}

fn write_source(dir: &Path, name: &str, src: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, src).unwrap();
    path.to_string_lossy().into_owned()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_compiles_file_to_stdout() {
    let dir = tempdir().unwrap();
    let file = write_source(dir.path(), "main.os", "function main() { _flush(); }\n");

    let output = osbc(&[&file]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "main:\n  JSR _flush\n  RTS\n\n");
}

#[test]
fn test_writes_output_file() {
    let dir = tempdir().unwrap();
    let file = write_source(dir.path(), "main.os", "function main() { }\n");
    let out = dir.path().join("main.asm");

    let output = osbc(&[&file, "-o", &out.to_string_lossy()]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).is_empty());
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "main:\n  RTS\n\n");
}

#[test]
fn test_reads_standard_input() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_osbc"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"function f() : int { return 1; }")
        .unwrap();

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "f:\n  LDC 1\n  RTS\n\n");
}

#[test]
fn test_compile_error_reports_line() {
    let dir = tempdir().unwrap();
    let file = write_source(
        dir.path(),
        "bad.os",
        "function main() {\n  var x : int;\n  x = 'c';\n}\n",
    );

    let output = osbc(&[&file]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());

    let err = stderr(&output);
    assert!(err.contains("ERROR"));
    assert!(
        err.contains("(3): Cannot assign value of 'char' to variable 'x' of type 'int'"),
        "{}",
        err
    );
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.os");

    let output = osbc(&[&missing.to_string_lossy()]);
    assert_eq!(output.status.code(), Some(1));

    let err = stderr(&output);
    assert!(err.contains("Error"));
    assert!(err.contains("Unable to open file"), "{}", err);
}

#[test]
fn test_emit_ast_and_symbols() {
    let dir = tempdir().unwrap();
    let file = write_source(dir.path(), "prog.os", "var g : int;\nfunction f(in a : int) { g = a; }\n");

    let output = osbc(&[&file, "--emit", "ast"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "var g : int;\n\nfunction f(in a : int) {\n    g = a;\n}\n"
    );

    let output = osbc(&[&file, "--emit", "symbols"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let symbols = stdout(&output);
    assert!(symbols.contains("  g : int  Variable (line 1)\n"));
    assert!(symbols.contains("  a : int  Parameter in (line 2)\n"));
}

#[test]
fn test_emit_tokens() {
    let dir = tempdir().unwrap();
    let file = write_source(dir.path(), "prog.os", "var g : int;\n");

    let output = osbc(&[&file, "--emit", "tokens"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let tokens = stdout(&output);
    assert_eq!(tokens.lines().count(), 6);
    assert!(tokens.lines().last().unwrap().contains("end of file"));
}
