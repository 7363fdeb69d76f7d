//! Web layer module
//!
//! This module provides the HTTP interface for the IPTV crawler. Handlers are
//! thin: they validate the request at the boundary and delegate to the crawl
//! orchestrator, the stream proxy or the stream validator held in
//! [`AppState`].

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    crawler::CrawlOrchestrator,
    errors::AppResult,
    proxy::HttpStreamProxy,
    services::StreamValidator,
    utils::http_client::{HttpTransport, ReqwestTransport},
};

pub mod handlers;
pub mod responses;

pub use responses::{handle_error, CrawlResponse};

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub async fn new(config: Config) -> Result<Self> {
        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(&config.crawler)?);
        let state = AppState::new(config.clone(), transport)?;
        let app = Self::create_router(state);

        let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;

        Ok(Self { app, addr })
    }

    /// Create the router with all routes and middleware
    pub fn create_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(handlers::health::index))
            .route("/health", get(handlers::health::health_check))
            .route("/crawl", post(handlers::crawl::crawl))
            .route("/proxy-video", get(handlers::proxy::proxy_video))
            .route("/validate-stream", post(handlers::validation::validate_stream))
            .route("/validate-streams", post(handlers::validation::validate_streams))
            // Middleware (applied in reverse order)
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Start the web server
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, self.app).await?;
        Ok(())
    }

    /// Get the host address
    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    /// Get the port number
    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub orchestrator: CrawlOrchestrator,
    pub stream_proxy: HttpStreamProxy,
    pub validator: StreamValidator,
}

impl AppState {
    /// Wire every component to one shared transport
    pub fn new(config: Config, transport: Arc<dyn HttpTransport>) -> AppResult<Self> {
        let orchestrator = CrawlOrchestrator::new(transport.clone(), &config.crawler);
        let stream_proxy =
            HttpStreamProxy::new(&config.proxy, config.crawler.accept_invalid_certs)?;
        let validator = StreamValidator::new(transport, &config.validation);

        Ok(Self {
            config,
            orchestrator,
            stream_proxy,
            validator,
        })
    }
}
