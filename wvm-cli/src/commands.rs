//! CLI command implementations.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context};
use tracing::{debug, info};
use wvm_validator::validate;
use wvm_vm::{
    CallContext, CallFrame, Config, Environment, ExecutionOutcome, InMemoryHost, Interpreter,
    Program, Status,
};

use crate::{BenchArgs, CodeArg, ExecArgs};

/// How a command that ran to completion should exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    ValidationFailed,
    ExecutionFailed,
}

impl Exit {
    pub fn code(self) -> i32 {
        match self {
            Exit::Success => 0,
            Exit::ValidationFailed => 2,
            Exit::ExecutionFailed => 3,
        }
    }
}

/// Validate and execute once, printing the outcome.
pub fn run(args: &ExecArgs) -> anyhow::Result<Exit> {
    let code = read_code(&args.code.code)?;
    let input = decode_hex(&args.input).context("invalid --input hex")?;
    if !args.skip_validation && !report_validation(&code) {
        return Ok(Exit::ValidationFailed);
    }

    let config = config_for(args);
    let program = Program::new(code);
    let env = Environment::default();
    let context = CallContext::new(&input, &env);
    let mut host = InMemoryHost::with_config(&config);
    let outcome = Interpreter::new(&program, &context, &config, args.gas).run(&mut host);

    print_outcome(&outcome, args.gas);
    for write in host.storage_writes() {
        println!("sstore {:#x} = {:#x}", write.key, write.value);
    }
    for log in host.logs() {
        println!("log topics={} data=0x{}", log.topics.len(), hex::encode(&log.data));
    }
    Ok(exit_for(&outcome))
}

/// Execute `iterations` times on one reused frame and report ns/iteration.
pub fn bench(args: &BenchArgs) -> anyhow::Result<Exit> {
    let exec = &args.exec;
    let code = read_code(&exec.code.code)?;
    let input = decode_hex(&exec.input).context("invalid --input hex")?;
    if !exec.skip_validation && !report_validation(&code) {
        return Ok(Exit::ValidationFailed);
    }
    if args.iterations == 0 {
        bail!("--iterations must be at least 1");
    }

    let config = config_for(exec);
    let program = Program::new(code);
    let env = Environment::default();
    let context = CallContext::new(&input, &env);
    let mut host = InMemoryHost::with_config(&config);

    let mut frame = CallFrame::new(exec.gas);
    let mut outcome = None;
    let start = Instant::now();
    for _ in 0..args.iterations {
        frame.reset(exec.gas);
        let mut interpreter = Interpreter::with_frame(&program, &context, &config, frame);
        outcome = Some(interpreter.run(&mut host));
        frame = interpreter.into_frame();
    }
    let elapsed = start.elapsed();
    let Some(outcome) = outcome else {
        bail!("no iterations ran");
    };

    let per_iteration = elapsed.as_nanos() / u128::from(args.iterations);
    info!(iterations = args.iterations, ?elapsed, "bench finished");
    print_outcome(&outcome, exec.gas);
    println!("iterations: {}", args.iterations);
    println!("ns/iter: {per_iteration}");
    Ok(exit_for(&outcome))
}

/// Assemble a text file. Prints hex, or writes raw bytes to `output`.
pub fn assemble(input: &Path, output: Option<&Path>) -> anyhow::Result<Exit> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("cannot read '{}'", input.display()))?;
    let code = wvm_assembler::assemble(&text)?;
    match output {
        Some(path) => {
            fs::write(path, &code)
                .with_context(|| format!("cannot write '{}'", path.display()))?;
            eprintln!("assembled {} bytes -> {}", code.len(), path.display());
        }
        None => println!("{}", hex::encode(&code)),
    }
    Ok(Exit::Success)
}

pub fn disassemble(args: &CodeArg) -> anyhow::Result<Exit> {
    let code = read_code(&args.code)?;
    print!("{}", wvm_assembler::disassemble(&code));
    Ok(Exit::Success)
}

pub fn check(args: &CodeArg) -> anyhow::Result<Exit> {
    let code = read_code(&args.code)?;
    match validate(&code) {
        Ok(analysis) => {
            println!(
                "OK: {} bytes, {} instructions, {} jump destinations",
                code.len(),
                analysis.instruction_count,
                analysis.jump_destinations.len()
            );
            Ok(Exit::Success)
        }
        Err(errors) => {
            for e in &errors {
                eprintln!("error: {e}");
            }
            Ok(Exit::ValidationFailed)
        }
    }
}

/// Read bytecode from a file (hex text or raw bytes) or a hex argument.
fn read_code(source: &str) -> anyhow::Result<Vec<u8>> {
    let path = Path::new(source);
    if path.is_file() {
        let bytes = fs::read(path).with_context(|| format!("cannot read '{source}'"))?;
        let as_hex = std::str::from_utf8(&bytes).ok().and_then(|text| decode_hex(text).ok());
        debug!(path = source, hex = as_hex.is_some(), "read code file");
        return Ok(as_hex.unwrap_or(bytes));
    }
    decode_hex(source).with_context(|| format!("'{source}' is neither a file nor hex bytecode"))
}

/// Decode hex with an optional `0x` prefix, ignoring whitespace.
fn decode_hex(text: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let compact: String = digits.split_whitespace().collect();
    hex::decode(compact)
}

/// Print validation errors. True if the code passed.
fn report_validation(code: &[u8]) -> bool {
    match validate(code) {
        Ok(_) => true,
        Err(errors) => {
            for e in &errors {
                eprintln!("error: {e}");
            }
            false
        }
    }
}

fn config_for(args: &ExecArgs) -> Config {
    let config = Config::default();
    match args.memory_limit {
        Some(limit) => config.with_memory_limit(limit),
        None => config,
    }
}

fn print_outcome(outcome: &ExecutionOutcome, budget: u64) {
    println!("status: {}", outcome.status);
    println!("gas used: {}", budget - outcome.gas_remaining);
    println!("gas remaining: {}", outcome.gas_remaining);
    println!("pc: {}", outcome.pc);
    println!("output: 0x{}", hex::encode(&outcome.output));
}

fn exit_for(outcome: &ExecutionOutcome) -> Exit {
    match outcome.status {
        Status::Stop | Status::Return => Exit::Success,
        Status::Revert | Status::Fault(_) => Exit::ExecutionFailed,
    }
}
