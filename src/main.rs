use ronbun::{
    cli::{Cli, CliHandler},
    error::RonbunError,
};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Parse command line arguments
    let cli = match Cli::parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("❌ Argument parsing failed: {}", e);
            process::exit(2);
        }
    };

    // Initialize logging based on verbosity
    let default_filter = if cli.is_debug() {
        "ronbun=debug"
    } else if cli.is_verbose() {
        "ronbun=info"
    } else {
        "ronbun=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Execute the main workflow
    let handler = CliHandler::new(cli);
    let exit_code = match handler.run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ Analysis failed: {}", e);
            match e {
                RonbunError::NoInput => 2,
                RonbunError::NoUsableSections { .. } => 3,
                RonbunError::SynthesisFailed { .. } => 4,
                RonbunError::LlmClientError(_) | RonbunError::ExhaustedRetries { .. } => 5,
                RonbunError::ConfigError(_) | RonbunError::InvalidArguments(_) => 2,
                _ => 1,
            }
        }
    };

    process::exit(exit_code);
}
