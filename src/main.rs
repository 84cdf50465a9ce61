use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sql_compose::cli::Args;
use sql_compose::config::ConfigFile;

const DEFAULT_LOG_FILTER: &str = "sql_compose=warn";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = ConfigFile::resolve(args.config.as_deref())?;

    let fallback = config.log_filter.clone().unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!(dialect = ?config.dialect, "loaded configuration");
    let output = args.command.run(&config, args.format)?;
    println!("{}", output);
    Ok(())
}
