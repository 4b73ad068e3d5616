//! WVM CLI: run, benchmark, assemble, disassemble and check bytecode.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Input, decode or assembly error
//! - 2: Validation failure
//! - 3: Execution ended in a fault or revert

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use commands::Exit;

#[derive(Parser, Debug)]
#[command(name = "wvm", version, about = "Gas-metered 256-bit stack machine")]
struct Cli {
    /// More logging: -v for halts and validation, -vv for every step.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate and execute bytecode once.
    Run(ExecArgs),
    /// Execute bytecode repeatedly on a reused frame and report timing.
    Bench(BenchArgs),
    /// Assemble mnemonic text into bytecode.
    Assemble {
        /// Assembly source file.
        input: PathBuf,
        /// Write raw bytes here instead of printing hex.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print bytecode as canonical assembly text.
    Disassemble(CodeArg),
    /// Run the static validator and report every issue.
    Check(CodeArg),
}

/// Bytecode as a hex string, or a path to a hex or binary file.
#[derive(Args, Debug)]
pub struct CodeArg {
    pub code: String,
}

#[derive(Args, Debug)]
pub struct ExecArgs {
    #[command(flatten)]
    pub code: CodeArg,

    /// Gas budget.
    #[arg(short, long, default_value_t = 1_000_000)]
    pub gas: u64,

    /// Call data as hex.
    #[arg(short, long, default_value = "")]
    pub input: String,

    /// Memory limit in bytes.
    #[arg(long)]
    pub memory_limit: Option<usize>,

    /// Execute even if static validation fails.
    #[arg(long)]
    pub skip_validation: bool,
}

#[derive(Args, Debug)]
pub struct BenchArgs {
    #[command(flatten)]
    pub exec: ExecArgs,

    /// Number of timed executions.
    #[arg(short = 'n', long, default_value_t = 10_000)]
    pub iterations: u32,
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        })
    });
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Run(args) => commands::run(&args),
        Command::Bench(args) => commands::bench(&args),
        Command::Assemble { input, output } => commands::assemble(&input, output.as_deref()),
        Command::Disassemble(args) => commands::disassemble(&args),
        Command::Check(args) => commands::check(&args),
    };

    let code = match result {
        Ok(exit) => exit.code(),
        Err(e) => {
            eprintln!("error: {e:#}");
            1
        }
    };
    process::exit(code);
}
