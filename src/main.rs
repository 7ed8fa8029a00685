use clap::Parser;
use lucky::ProviderKind;
use lucky::core::config::{CliOverrides, load_config, resolve};
use lucky::inference::ProviderChain;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "lucky", about = "Terminal chat client with provider fallback")]
struct Args {
    /// Primary LLM provider
    #[arg(short, long, value_enum)]
    provider: Option<ProviderKind>,

    /// Provider tried once when the primary fails
    #[arg(short, long, value_enum, conflicts_with = "no_fallback")]
    fallback: Option<ProviderKind>,

    /// Never fall back to a second provider
    #[arg(long)]
    no_fallback: bool,

    /// Model name for the primary provider
    #[arg(short, long)]
    model: Option<String>,

    /// Show replies at once instead of revealing them word by word
    #[arg(long)]
    no_reveal: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to lucky.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("lucky.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("lucky: {e}");
            std::process::exit(1);
        }
    };
    let cli = CliOverrides {
        provider: args.provider,
        fallback: args.fallback,
        model: args.model,
        no_reveal: args.no_reveal,
    };
    let mut config = resolve(&file_config, &cli);
    if args.no_fallback {
        config.fallback = None;
    }

    let providers = match ProviderChain::from_config(&config) {
        Ok(providers) => providers,
        Err(e) => {
            log::error!("Startup failed: {}", e);
            eprintln!("lucky: {e}");
            std::process::exit(1);
        }
    };

    log::info!(
        "Lucky starting up with primary {} and fallback {}",
        config.primary.label(),
        config.fallback.map(ProviderKind::label).unwrap_or("none"),
    );

    lucky::tui::run(config, providers)
}
