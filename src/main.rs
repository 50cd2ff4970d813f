use clap::Parser;
use tracing_subscriber::EnvFilter;

use transcription_eval::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("transcription_eval=debug,info")
    } else {
        EnvFilter::new("transcription_eval=warn")
    };

    // Keep stdout clean for JSON/TSV output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Evaluate(args) => {
            cli::evaluate::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Match(args) => {
            cli::matches::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
