use std::process::ExitCode;

use contact_sim::runner::{run_with_args, summary};

fn main() -> ExitCode {
    match run_with_args() {
        Ok(simulation) => {
            println!("{}", summary(&simulation));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
