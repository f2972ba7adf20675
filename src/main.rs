use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use y86sim::driver::Driver;

/// Sequential simulator for the Y86-64 instruction set.
///
/// Reads a `.yo` object-file listing, runs it to completion, and writes the
/// final architectural state as YAML.
#[derive(Parser, Debug)]
#[command(name = "y86sim", version, about)]
struct Cli {
    /// Path to the input .yo object file.
    input: PathBuf,

    /// Path to write the final-state YAML to.
    output: PathBuf,

    /// Maximum number of instructions to step before giving up on a
    /// diverging program.
    #[arg(long, default_value_t = y86sim::driver::DEFAULT_STEP_CAP)]
    step_cap: u64,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("y86sim: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> y86sim::Result<()> {
    let source = std::fs::read_to_string(&cli.input)?;

    let driver = Driver::with_step_cap(cli.step_cap);
    let state = driver.run(&source)?;

    let yaml = serde_yaml::to_string(&[state])?;
    std::fs::write(&cli.output, yaml)?;

    Ok(())
}
