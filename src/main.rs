use std::env;
use std::process::ExitCode;

use log::LevelFilter;
use pdp11::Program;
use pdp11::error::MainError;
use pdp11::machine::{Machine, PC, START_ADDRESS};

fn run(path: &str) -> Result<(), MainError> {
    let program = Program::from_file(path)?;
    let mut machine = Machine::new();
    program.load(&mut machine);
    log::info!("loaded {} block(s) from {}", program.blocks.len(), path);

    machine.reg[PC] = START_ADDRESS;
    println!("---------------- running --------------");
    machine.run()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("usage: {} <object-file>", args[0]);
        return ExitCode::from(2);
    }

    match run(&args[1]) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(1)
        }
    }
}
