use clap::Parser;
use std::process::ExitCode;
use tubechat::cli::{Cli, init_tracing, run};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    run(Cli::parse()).await
}
