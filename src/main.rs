use clap::Parser;
use sable::cli::{Cli, Command};

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::TRACE
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Command::Cc { args } => {
            let code = sable::commands::cc(&args)?;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Command::Run {
            file,
            include,
            phase,
        } => sable::commands::run(&file, include, phase, cli.verbose),
    }
}
