use clap::Parser;
use tickergrid::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
