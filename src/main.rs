use clap::Parser;
use dayflags::cli::{self, Cli};
use dayflags::logging::init_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;
    cli::run(&cli)?;
    Ok(())
}
