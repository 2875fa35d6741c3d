use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use viewmap::cli::{self, Cli};
use viewmap::config::DefaultConfigLoader;

fn setup_tracing() {
    use tracing_subscriber::fmt;

    let filter = EnvFilter::try_from_env("VIEWMAP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_tracing();

    let mut loader = DefaultConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_path(path.clone());
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let mut stdout = std::io::stdout().lock();
    match cli::run(&cli, &loader, &cwd, &mut stdout) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("viewmap: {e}");
            ExitCode::from(2)
        }
    }
}
