use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use iptv_crawler::{
    config::Config,
    crawler::CrawlOrchestrator,
    models::CrawlRequest,
    utils::http_client::{HttpTransport, ReqwestTransport},
    web::{CrawlResponse, WebServer},
};

#[derive(Parser)]
#[command(name = "iptv-crawler")]
#[command(version)]
#[command(about = "Discovers IPTV playlists on web pages and serves the streams they list")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Crawl a single URL and print the streams as JSON
    Crawl {
        /// Page or provider endpoint to crawl
        url: String,

        /// Only keep streams tagged with this keyword
        #[arg(short, long)]
        filter: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = if cli.log_level == "trace" {
        format!("iptv_crawler={},tower_http=trace", cli.log_level)
    } else {
        format!("iptv_crawler={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting IPTV Crawler v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration from specified file
    std::env::set_var("CONFIG_FILE", &cli.config);
    let mut config = Config::load()?;
    info!("Configuration loaded from: {}", cli.config);

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }

    match cli.command {
        Some(Command::Crawl { url, filter }) => run_crawl(&config, url, filter).await,
        None => {
            let web_server = WebServer::new(config).await?;
            info!(
                "Starting web server on {}:{}",
                web_server.host(),
                web_server.port()
            );
            web_server.serve().await
        }
    }
}

async fn run_crawl(config: &Config, url: String, filter: Option<String>) -> Result<()> {
    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(&config.crawler)?);
    let orchestrator = CrawlOrchestrator::new(transport, &config.crawler);

    let result = orchestrator.crawl(&CrawlRequest::new(url, filter)).await;
    if result.is_empty() {
        eprintln!("No IPTV streams found at the provided URL");
        std::process::exit(1);
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&CrawlResponse::from(result))?
    );
    Ok(())
}
