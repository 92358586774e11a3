use std::process::ExitCode;

use clap::Parser;

use obcon::cli::{self, Cli};
use obcon::progress;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli::run(cli) {
        Ok(code) => code,
        Err(err) => {
            progress::error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}
