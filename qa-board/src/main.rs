use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use clap::Parser;
use qa_board::config::Config;
use qa_board::routes::configure_routes;
use qa_board::validation::ValidationRules;
use qa_board::{AppState, Database};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Question-and-answer board API server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to an additional configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration first to get logging settings
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    info!("Starting qa-board on {}", config.bind_address());

    let database = Database::new(&config.database)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.url))?;
    database
        .init()
        .await
        .context("Failed to initialize database schema")?;
    info!(url = %config.database.url, "Database ready");

    let app_state = web::Data::new(AppState::new(
        database,
        ValidationRules::from(&config.validation),
    ));

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(NormalizePath::trim())
            .wrap(Logger::default())
            .configure(configure_routes)
    })
    .bind(config.bind_address())?
    .run()
    .await?;

    info!("qa-board stopped");
    Ok(())
}
