use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use decision_flow_engine::config::Config;
use decision_flow_engine::migrations::Migrator;
use decision_flow_engine::repositories::{FlowSeaOrmRepository, SymbolicEventSeaOrmRepository, UserSeaOrmRepository};
use decision_flow_engine::services::{AuthServiceImpl, EvaluationServiceImpl, FlowServiceImpl};
use decision_flow_engine::telemetry::TelemetryService;
use decision_flow_engine::web::rate_limit::RateLimiter;
use decision_flow_engine::web::{create_router, AppState};

#[derive(Parser)]
#[command(name = "decision-flow-engine")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Decision flow storage and evaluation engine")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address (overrides config file)
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port (overrides config file)
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Log level
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!("decision_flow_engine={},tower_http=info", cli.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| log_filter.into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("starting decision flow evaluation engine v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load(&cli.config)?;
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    info!(config_path = %cli.config, "configuration loaded");

    let connection = Database::connect(&config.database.url).await?;
    Migrator::up(&connection, None).await?;
    info!("database connection established and migrations applied");
    let connection = Arc::new(connection);

    let flow_repository = Arc::new(FlowSeaOrmRepository::new(connection.clone()));
    let symbolic_event_repository = Arc::new(SymbolicEventSeaOrmRepository::new(connection.clone()));
    let user_repository = Arc::new(UserSeaOrmRepository::new(connection.clone()));

    let telemetry = TelemetryService::new(symbolic_event_repository);

    let flow_service = Arc::new(FlowServiceImpl::new(flow_repository.clone(), telemetry.clone()));
    let evaluation_service = Arc::new(EvaluationServiceImpl::new(
        flow_repository,
        telemetry,
        config.solver.timeout_ms,
    ));
    let auth_service = Arc::new(AuthServiceImpl::new(
        user_repository,
        config.auth.jwt_secret.clone(),
        config.auth.token_ttl_seconds,
    ));

    let rate_limiter = Arc::new(RateLimiter::new(&config.rate_limit));

    PrometheusBuilder::new()
        .install()
        .expect("failed to install Prometheus metrics recorder");

    let host = config.web.host.clone();
    let port = config.web.port;
    let state = AppState {
        flow_service,
        evaluation_service,
        auth_service,
        config: Arc::new(config),
        rate_limiter,
    };

    let app = create_router(state);
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
