use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, warn};

use cloudport::app::{handle_fatal_error, init_logging, AppContext};
use cloudport::config::ConfigLoader;
use cloudport::error::Error;
use cloudport::server::ApiServer;
use cloudport::storage::Platform;
use cloudport::translate::TranslationOutcome;

/// Translate AWS Terraform into GCP Terraform and apply it
#[derive(Parser)]
#[command(name = "cloudport", version)]
#[command(about = "Translate AWS Terraform to GCP with a hosted model, then apply it", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file (default: ./cloudport.toml when present)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to listen on, overriding the configuration
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Translate every stored file of a user once and print the report
    Translate {
        /// User identifier (e-mail) owning the files
        #[arg(long)]
        user: String,

        /// Source platform (aws or gcp)
        #[arg(long)]
        platform: Platform,
    },
    /// Download a user's files and run terraform init and apply
    Apply {
        /// User identifier (e-mail) owning the files
        #[arg(long)]
        user: String,

        /// Platform folder to apply (aws or gcp)
        #[arg(long)]
        platform: Platform,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    let config = match ConfigLoader::new().with_path(cli.config.clone()).load().await {
        Ok(config) => config,
        Err(e) => {
            init_logging(verbose, "info");
            handle_fatal_error(Error::from(e).into(), verbose);
        }
    };
    init_logging(verbose, &config.log_level);

    match run(cli.command, config).await {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => handle_fatal_error(e, verbose),
    }
}

async fn run(command: Commands, mut config: cloudport::config::AppConfig) -> anyhow::Result<i32> {
    if let Commands::Serve { bind: Some(bind) } = &command {
        config.server.bind = *bind;
    }

    let context = AppContext::from_config(&config).await?;

    match command {
        Commands::Serve { .. } => {
            ApiServer::new(&context, config.server.clone()).start().await?;
            Ok(0)
        }
        Commands::Translate { user, platform } => {
            match context.translation.run(&user, platform).await.map_err(Error::from)? {
                TranslationOutcome::Completed(report) => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                    info!("{}", report.summary());
                    Ok(if report.is_partial() { 1 } else { 0 })
                }
                TranslationOutcome::NotFound { prefix } => {
                    warn!("No files found under '{}'", prefix);
                    eprintln!("No files found for the specified user and platform: {platform}");
                    Ok(1)
                }
            }
        }
        Commands::Apply { user, platform } => {
            let report = context.apply.run(&user, platform).await.map_err(Error::from)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if report.succeeded {
                info!("{}", report.summary());
                Ok(0)
            } else {
                eprintln!("{}", report.summary());
                Ok(1)
            }
        }
    }
}
