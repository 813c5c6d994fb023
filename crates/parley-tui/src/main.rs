//! Parley terminal client entry point.

use std::{fs::OpenOptions, path::PathBuf, sync::Mutex};

use clap::Parser;
use parley_client::ClientConfig;
use parley_tui::Runtime;
use reqwest::Url;
use tracing_subscriber::EnvFilter;

/// Parley terminal relay client
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(about = "Terminal chat client for a Parley SSE relay")]
#[command(version)]
struct Args {
    /// URL of the server-sent-event stream
    #[arg(long, env = "PARLEY_STREAM_URL", value_parser = http_url)]
    stream_url: Url,

    /// URL that outbound messages are POSTed to
    #[arg(long, env = "PARLEY_SEND_URL", value_parser = http_url)]
    send_url: Url,

    /// File receiving log output (the terminal is in raw mode)
    #[arg(long, default_value = "parley.log")]
    log_file: PathBuf,

    /// Log level used when `RUST_LOG` is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Accept absolute `http`/`https` URLs only.
fn http_url(value: &str) -> Result<Url, String> {
    let url = Url::parse(value).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(format!("unsupported scheme `{scheme}`, expected http or https")),
    }
}

fn init_logging(args: &Args) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(&args.log_file)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    let runtime = Runtime::new(args.stream_url.as_str(), args.send_url.as_str(), ClientConfig::default())?;

    Ok(runtime.run().await?)
}
