use clap::Parser;
use std::process::ExitCode;

mod command_line;

fn main() -> ExitCode {
    env_logger::init();

    let cli = command_line::Cli::parse();
    match command_line::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
