use std::process::ExitCode;

use clap::Parser as ClapParser;

use bfjit::{CompileOptions, Error, Program, TAPE_LEN};

/// Ahead-of-execution JIT compiler for Brainfuck, targeting x86-64.
#[derive(Debug, ClapParser)]
#[command(author, version, about)]
struct Cli {
    /// Brainfuck source file to compile and run.
    program: std::path::PathBuf,

    /// Print the optimized linear IR to stderr before codegen.
    #[arg(long)]
    dump_ir: bool,

    /// Disassemble the emitted machine code to stderr after codegen.
    #[arg(long)]
    dump_asm: bool,
}

fn run(cli: &Cli) -> Result<(), Error> {
    let source = std::fs::read_to_string(&cli.program)?;

    let opts = CompileOptions {
        dump_ir: cli.dump_ir,
        dump_asm: cli.dump_asm,
    };

    log::info!("compiling {}", cli.program.display());
    let program = Program::compile_with(&source, &opts)?;

    let mut tape = vec![0u8; TAPE_LEN];
    log::info!("running compiled program");
    unsafe { program.run(&mut tape) };

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
