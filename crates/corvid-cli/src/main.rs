//! Corvid CLI entry point.

use clap::Parser;
use corvid_cli::cli::{Cli, Command};
use corvid_cli::error::cli_error_to_miette;
use corvid_cli::{commands, logger, ui};

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    logger::init_logger(cli.verbose, cli.quiet, cli.no_color);
    ui::init_colors(cli.no_color);

    let result = match &cli.command {
        Command::Build(args) => commands::build_execute(args, cli.verbose).await,
        Command::Dev(args) => commands::dev_execute(args).await,
        Command::Serve(args) => commands::serve_execute(args).await,
    };

    result.map_err(cli_error_to_miette)
}
