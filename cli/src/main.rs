use clap::Parser;
use scenekeep_cli::{Cli, exit_code, is_notice};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.run() {
        if is_notice(&err) {
            eprintln!("Notice: {err}");
        } else {
            eprintln!("Error: {err:#}");
        }
        std::process::exit(exit_code(&err));
    }
}
