use std::io;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use be_calc_cli::cli::Cli;
use be_calc_cli::{commands, logging};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.global.verbose, cli.global.log_file.as_deref())?;
    debug!(command = ?cli.command, "starting");

    let stdin = io::stdin();
    let stdout = io::stdout();
    commands::run(&cli, &mut stdin.lock(), &mut stdout.lock())
}
