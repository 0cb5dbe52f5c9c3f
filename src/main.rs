use std::{env, sync::Arc};

use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use contact_backend::{
    background_task::start_purge_task,
    constants::record_start_time,
    db::postgres::{create_pool, run_migrations},
    graceful_shutdown::shutdown_signal,
    limiter::clock::SystemClock,
    notifier,
    repositories::{
        contact_me::SubmissionRepository, memory::InMemorySubmissionRepo,
        sqlx_repo::SqlxSubmissionRepo,
    },
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment},
    telemetry::init_tracing,
    web::cors::build_cors,
    AppState,
};
use tracing_actix_web::TracingLogger;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    let app_env = env::var("APP_ENV")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(AppEnvironment::Development);
    init_tracing(&app_env);
    let started_at = record_start_time();

    let config = match AppConfig::new() {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        },
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let submission_repo: Arc<dyn SubmissionRepository> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = create_pool(url).await.map_err(std::io::Error::other)?;
            run_migrations(&pool).await.map_err(|e| std::io::Error::other(e.to_string()))?;
            Arc::new(SqlxSubmissionRepo::new(pool))
        }
        None => {
            tracing::warn!("No database configured; submissions are kept in memory and lost on restart");
            Arc::new(InMemorySubmissionRepo::new())
        }
    };

    let app_state = web::Data::new(AppState::new(
        &config,
        submission_repo,
        notifier::from_config(&config),
        Arc::new(SystemClock),
    ));

    let server_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        "🚀 Starting {} v{} on {} (boot at {})",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr,
        started_at.to_rfc3339()
    );

    tokio::spawn(start_purge_task(
        app_state.contact_handler.rate_limiter.clone(),
        app_state.contact_handler.policy.window,
        config.rate_limit_purge_interval(),
    ));

    let cors_origins = config.cors_origins();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(build_cors(&cors_origins))
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .bind(server_addr)?
    .disable_signals()
    .run();

    let handle = server.handle();
    tokio::spawn(async move {
        shutdown_signal().await;
        handle.stop(true).await;
    });

    server.await
}
