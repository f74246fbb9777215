use std::{path::PathBuf, process, time::Duration};

use clap::{Parser, Subcommand};
use tracing::{error, info, span, Instrument, Level};
use tracing_subscriber::EnvFilter;

use bunnystore::{BunnyStorage, ClientConfig, OperationResult};

#[derive(Parser, Debug)]
#[command(name = "bunnystore", version, about = "List and download files in a BunnyCDN storage zone")]
struct Cli {
    /// Storage zone password / API key.
    #[arg(long, env = "BUNNY_ACCESS_KEY", hide_env_values = true)]
    api_key: String,

    #[arg(long, env = "BUNNY_STORAGE_ZONE")]
    zone: String,

    /// Region code, empty or `de` for the primary endpoint.
    #[arg(long, env = "BUNNY_STORAGE_REGION", default_value = "")]
    region: String,

    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List a directory of the zone.
    List {
        #[arg(default_value = "")]
        path: String,
    },
    /// Download a file.
    Download {
        file: String,

        /// Destination, defaults to the last segment of FILE.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let span = span!(Level::INFO, "main", context = "main");
    run(cli).instrument(span).await;
}

async fn run(cli: Cli) {
    info!("called");
    info!(zone = %cli.zone, region = %cli.region, "args");

    let mut config = match ClientConfig::new(cli.api_key, cli.zone, cli.region) {
        Err(err) => {
            error!(error_message=%err, error_group="config");
            process::exit(1);
        }
        Ok(config) => config,
    };

    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let storage = match BunnyStorage::connect(config) {
        Err(err) => {
            error!(error_message=%err, error_group="connect");
            process::exit(1);
        }
        Ok(storage) => storage,
    };

    match cli.command {
        Command::List { path } => {
            let entries = unwrap_or_exit(storage.list_directory(&path).await);
            for entry in entries {
                let marker = if entry.is_directory() { "d" } else { "f" };
                println!("{} {}", marker, entry.name);
            }
        }
        Command::Download { file, output } => {
            let data = unwrap_or_exit(storage.download_file(&file).await);
            let output = output.unwrap_or_else(|| default_output(&file));

            if let Err(err) = tokio::fs::write(&output, &data).await {
                error!(error_message=%err, error_group="write_output", output=%output.display());
                process::exit(1);
            }

            info!(output=%output.display(), size=data.len(), "written");
        }
    }
}

fn unwrap_or_exit<T>(result: OperationResult<T>) -> T {
    match result {
        OperationResult::Error { status, message } => {
            error!(status = status, error_message = %message, error_group = "operation");
            process::exit(1);
        }
        OperationResult::Success { status, message, data } => {
            info!(status = status, message = %message, "done");
            data
        }
    }
}

fn default_output(file: &str) -> PathBuf {
    let name = file.trim_end_matches('/').rsplit('/').next().unwrap_or(file);
    PathBuf::from(name)
}
