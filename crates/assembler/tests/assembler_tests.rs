//! Assembler integration tests: text through the validator and the VM.

use wvm_assembler::{assemble, disassemble, AsmError};
use wvm_validator::{validate, ValidationError};
use wvm_common::Word;
use wvm_vm::{execute, Status};

// ============================================================
// Helpers
// ============================================================

fn asm(text: &str) -> Vec<u8> {
    assemble(text).unwrap_or_else(|e| panic!("assembly failed: {e}\n{text}"))
}

// ============================================================
// Programs that run
// ============================================================

#[test]
fn countdown_loop_runs() {
    let code = asm("\
PUSH1 3
JUMPDEST          ; offset 2
PUSH1 1
SWAP1
SUB
DUP1
PUSH1 2
JUMPI
STOP
");
    let analysis = validate(&code).unwrap();
    assert!(analysis.jump_destinations.contains(2));
    let outcome = execute(&code, &[], 1_000);
    assert_eq!(outcome.status, Status::Stop);
    assert_eq!(outcome.gas_remaining, 1_000 - 81);
}

#[test]
fn return_word_from_memory() {
    let code = asm("\
PUSH32 0x00000000000000000000000000000000000000000000000000000000000000ff
PUSH0
MSTORE
PUSH1 32
PUSH0
RETURN
");
    let outcome = execute(&code, &[], 1_000);
    assert_eq!(outcome.status, Status::Return);
    assert_eq!(Word::from_big_endian(&outcome.output), Word::from(0xff));
}

#[test]
fn echo_calldata() {
    let code = asm("\
CALLDATASIZE
PUSH0
PUSH0
CALLDATACOPY
CALLDATASIZE
PUSH0
RETURN
");
    let outcome = execute(&code, b"hello", 1_000);
    assert_eq!(outcome.output, b"hello");
}

// ============================================================
// Validation of assembled text
// ============================================================

#[test]
fn data_bytes_fail_validation() {
    let code = asm("PUSH1 1\nDB 0x0c\n");
    let errors = validate(&code).unwrap_err();
    assert_eq!(
        errors,
        vec![ValidationError::UndefinedOpcode { at: 2, byte: 0x0c }]
    );
}

#[test]
fn truncated_push_from_data_bytes() {
    let code = asm("STOP\nDB 0x61\nDB 0x01\n");
    let errors = validate(&code).unwrap_err();
    assert!(matches!(
        errors.as_slice(),
        [ValidationError::TruncatedPush { at: 1, missing: 1, .. }]
    ));
    assert_eq!(disassemble(&code), "STOP\nDB 0x61\nDB 0x01\n");
}

// ============================================================
// Canonical form
// ============================================================

#[test]
fn decimal_and_hex_assemble_the_same() {
    assert_eq!(asm("PUSH2 258\n"), asm("PUSH2 0x0102\n"));
    assert_eq!(disassemble(&asm("PUSH2 258\n")), "PUSH2 0x0102\n");
}

#[test]
fn canonical_text_is_a_fixed_point() {
    let text = "push1 7\nkeccak256\ndifficulty\npush4 0x1\n";
    let canonical = disassemble(&asm(text));
    assert_eq!(
        canonical,
        "PUSH1 0x07\nSHA3\nPREVRANDAO\nPUSH4 0x00000001\n"
    );
    assert_eq!(disassemble(&asm(&canonical)), canonical);
}

#[test]
fn first_error_wins() {
    let err = assemble("PUSH1 0x100\nFOO\n").unwrap_err();
    assert_eq!(
        err,
        AsmError::ImmediateTooLarge {
            line: 1,
            mnemonic: "PUSH1",
            width: 1
        }
    );
}
