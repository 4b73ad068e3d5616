//! Integration tests for the WVM CLI.
//!
//! These tests invoke the `wvm` binary as a subprocess and check
//! exit codes, stdout, and stderr.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[allow(deprecated)]
fn wvm() -> Command {
    Command::cargo_bin("wvm").unwrap()
}

/// PUSH1 1, PUSH1 2, ADD, POP, STOP
const SIMPLE: &str = "60016002015000";

// ---- Help ----

#[test]
fn no_args_exits_with_usage() {
    wvm()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_lists_commands() {
    wvm()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("disassemble"));
}

// ---- Run ----

#[test]
fn run_simple_arithmetic() {
    wvm()
        .args(["run", SIMPLE, "--gas", "10000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("status: stop"))
        .stdout(predicate::str::contains("gas used: 11"))
        .stdout(predicate::str::contains("gas remaining: 9989"));
}

#[test]
fn run_reports_storage_writes() {
    wvm()
        .args(["run", "0x6001600255", "-g", "25000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sstore 0x1 = 0x2"));
}

#[test]
fn run_returns_calldata() {
    // CALLDATASIZE, PUSH0, PUSH0, CALLDATACOPY, CALLDATASIZE, PUSH0, RETURN
    wvm()
        .args(["run", "365f5f37365ff3", "--input", "cafe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("output: 0xcafe"));
}

#[test]
fn run_fault_exits_3() {
    // ADD on an empty stack
    wvm()
        .args(["run", "01"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("stack underflow"));
}

#[test]
fn run_revert_exits_3() {
    wvm()
        .args(["run", "60006000fd"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("status: revert"));
}

#[test]
fn run_out_of_gas_exits_3() {
    wvm()
        .args(["run", SIMPLE, "--gas", "1"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("out of gas"));
}

#[test]
fn run_invalid_code_exits_2() {
    wvm()
        .args(["run", "600c0c"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("undefined opcode"));
}

#[test]
fn run_skip_validation_reaches_the_fault() {
    wvm()
        .args(["run", "0c", "--skip-validation"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("invalid opcode 0x0c"));
}

#[test]
fn run_bad_hex_exits_1() {
    wvm()
        .args(["run", "zz"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("neither a file nor hex"));
}

#[test]
fn run_reads_hex_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("code.hex");
    fs::write(&path, format!("0x{SIMPLE}\n")).unwrap();
    wvm()
        .args(["run", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("gas used: 11"));
}

#[test]
fn run_reads_binary_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("code.bin");
    fs::write(&path, hex::decode(SIMPLE).unwrap()).unwrap();
    wvm()
        .args(["run", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("status: stop"));
}

#[test]
fn run_memory_limit_flag() {
    // PUSH1 1, PUSH2 0x0400, MSTORE
    wvm()
        .args(["run", "600161040052", "--memory-limit", "1024"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("memory limit exceeded"));
}

// ---- Bench ----

#[test]
fn bench_reports_timing() {
    wvm()
        .args(["bench", SIMPLE, "-n", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("iterations: 50"))
        .stdout(predicate::str::contains("ns/iter:"));
}

#[test]
fn bench_zero_iterations_exits_1() {
    wvm()
        .args(["bench", SIMPLE, "-n", "0"])
        .assert()
        .code(1);
}

// ---- Assemble / disassemble ----

#[test]
fn assemble_prints_hex() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("add.asm");
    fs::write(&path, "PUSH1 1\nPUSH1 2\nADD\nPOP\nSTOP\n").unwrap();
    wvm()
        .args(["assemble", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(SIMPLE));
}

#[test]
fn assemble_to_file_then_run() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("add.asm");
    let output = dir.path().join("add.bin");
    fs::write(&source, "PUSH1 1\nPUSH1 2\nADD\nPOP\nSTOP\n").unwrap();
    wvm()
        .args([
            "assemble",
            source.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();
    assert_eq!(fs::read(&output).unwrap(), hex::decode(SIMPLE).unwrap());
    wvm()
        .args(["run", output.to_str().unwrap(), "--gas", "10000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gas remaining: 9989"));
}

#[test]
fn assemble_error_exits_1_with_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.asm");
    fs::write(&path, "STOP\nFROB\n").unwrap();
    wvm()
        .args(["assemble", path.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("line 2: unknown mnemonic 'FROB'"));
}

#[test]
fn disassemble_hex() {
    wvm()
        .args(["disassemble", "6101020c"])
        .assert()
        .success()
        .stdout("PUSH2 0x0102\nDB 0x0c\n");
}

// ---- Check ----

#[test]
fn check_valid_code() {
    wvm()
        .args(["check", "6003565b00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 jump destinations"));
}

#[test]
fn check_reports_all_errors() {
    // undefined 0x0c, CREATE, truncated PUSH2
    wvm()
        .args(["check", "0cf061"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("undefined opcode").count(1))
        .stderr(predicate::str::contains("CREATE"))
        .stderr(predicate::str::contains("missing 2 immediate byte(s)"));
}
