// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! End-to-end tests over the programs in `tests/fixtures`.

use std::path::PathBuf;

use osbc_compiler::Error;
use osbc_compiler::compiler::OpCode;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn source(name: &str) -> String {
    osbc_compiler::read_source(&fixture(name)).unwrap()
}

#[test]
fn test_factorial_listing() {
    let bytecode = osbc_compiler::compile_file(&fixture("factorial.os")).unwrap();

    let expected = "\
factorial:
  LDV n
  LDC 1
  LTE
  NOT
  CBR __auto_lab_0
  LDC 1
  RTS
__auto_lab_0:
  LDV n
  LDV n
  LDC 1
  SUB
  JSR factorial
  MUL
  RTS

main:
  LDC 1
  STV i
__auto_lab_1:
  LDV i
  LDC limit
  LTE
  NOT
  CBR __auto_lab_2
  LDV total
  LDV i
  JSR factorial
  ADD
  STV total
  LDV i
  LDC 1
  ADD
  STV i
  BRA __auto_lab_1
__auto_lab_2:
  JSR _flush
  RTS

";
    assert_eq!(bytecode.to_string(), expected);
}

#[test]
fn test_swap_listing() {
    let bytecode = osbc_compiler::compile_file(&fixture("swap.os")).unwrap();

    let expected = "\
swap:
  LDV p
  STV t
  LDV q
  STV p
  LDV t
  STV q
  RTS

sign:
  LDV x
  LDC 0
  LT
  NOT
  CBR __auto_lab_0
  LDC 1
  NEG
  RTS
  BRA __auto_lab_1
__auto_lab_0:
  LDV x
  LDC 0
  EQU
  NOT
  CBR __auto_lab_2
  LDC 0
  RTS
__auto_lab_2:
__auto_lab_1:
  LDC 1
  RTS

main:
  JSR swap
  LDV p
  JSR sign
  POP
  LDV p
  LDV q
  NEQ
  NOT
  NOT
  CBR __auto_lab_3
  JSR _close
__auto_lab_3:
  RTS

";
    assert_eq!(bytecode.to_string(), expected);
}

#[test]
fn test_every_branch_target_is_defined() {
    for name in ["factorial.os", "swap.os"] {
        let bytecode = osbc_compiler::compile_file(&fixture(name)).unwrap();
        let labels = bytecode.labels();

        for instruction in bytecode.instructions() {
            if matches!(instruction.opcode, OpCode::Bra | OpCode::Cbr | OpCode::Jsr) {
                let target = instruction.operand.as_ref().unwrap().to_string();
                if target.starts_with('_') && !target.starts_with("__auto_lab_") {
                    // intrinsic
                    continue;
                }
                assert!(labels.contains_key(target.as_str()), "{}: {}", name, target);
            }
        }
    }
}

#[test]
fn test_symbols_dump() {
    let analysis = osbc_compiler::analyze(&source("factorial.os")).unwrap();
    let dump = analysis.symbols.to_string();

    assert!(dump.starts_with("scope 0\n"));
    assert!(dump.contains("  factorial : int  Function const (line 6)\n"));
    assert!(dump.contains("  main : void  Function const (line 13)\n"));
    assert!(dump.contains("  limit : int  Variable const (line 3)\n"));
    assert!(dump.contains("  total : int  Variable (line 4)\n"));
    assert!(dump.contains("  n : int  Parameter in (line 6)\n"));
    assert!(dump.contains("  i : int  Variable (line 14)\n"));
    assert!(dump.contains("  _flush : void  Function const special\n"));
}

#[test]
fn test_printed_fixtures_compile_identically() {
    for name in ["factorial.os", "swap.os"] {
        let src = source(name);
        let printed = osbc_compiler::parse(&src).unwrap().to_string();

        assert_eq!(
            osbc_compiler::parse(&printed).unwrap().to_string(),
            printed,
            "{}",
            name
        );
        assert_eq!(
            osbc_compiler::compile(&printed).unwrap(),
            osbc_compiler::compile(&src).unwrap(),
            "{}",
            name
        );
    }
}

#[test]
fn test_semantic_error_fixture() {
    let err = osbc_compiler::compile_file(&fixture("bad_return.os")).unwrap_err();

    assert!(matches!(err, Error::Semantic { line: 6, .. }));
    assert_eq!(
        err.message(),
        "Cannot return value of type 'char' from function 'number' of type 'int'"
    );
}

#[test]
fn test_syntax_error_fixture() {
    let err = osbc_compiler::compile_file(&fixture("missing_type.os")).unwrap_err();

    assert!(matches!(err, Error::Syntax { line: 2, .. }));
    assert_eq!(err.message(), "var 'broken' requires type in this compiler.");
}

#[test]
fn test_missing_fixture() {
    let err = osbc_compiler::compile_file(&fixture("absent.os")).unwrap_err();
    assert!(matches!(err, Error::Open { .. }));
}
