use std::env;
use std::fs;
use std::process::ExitCode;

use log::LevelFilter;
use pdp11::asm;
use pdp11::error::{AsmError, MainError};

fn run(input: &str, output: &str) -> Result<(), MainError> {
    let source = fs::read_to_string(input).map_err(AsmError::from)?;
    let object = asm::assemble(&source)?;
    fs::write(output, &object).map_err(AsmError::from)?;
    log::info!("assembled {} into {} ({} bytes)", input, output, object.len());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("usage: {} <asm-file> <object-file>", args[0]);
        return ExitCode::from(2);
    }

    match run(&args[1], &args[2]) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(1)
        }
    }
}
