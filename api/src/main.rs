use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tours_api::{create_app, AppPorts, AppState};
use tours_core::repositories::Repositories;
use tours_core::services::AuthServiceConfig;
use tours_infra::database::{mysql_repositories, DatabasePool};
use tours_infra::email::create_email_service;
use tours_infra::payment::create_payment_gateway;
use tours_infra::rate_limiter::create_rate_limiter;
use tours_shared::AppConfig;

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.environment.default_log_filter()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.environment.is_production() {
        builder.compact().init();
    } else {
        builder.pretty().init();
    }
}

/// Wires repositories and outbound services from the configuration
async fn build_ports(config: &AppConfig) -> anyhow::Result<AppPorts> {
    let (repositories, database) = match &config.database.url {
        Some(_) => {
            let pool = DatabasePool::new(&config.database)
                .await
                .context("failed to connect to the database")?;
            if config.database.run_migrations {
                pool.migrate().await.context("failed to run migrations")?;
            }
            (mysql_repositories(&pool), Some(pool))
        }
        None => {
            warn!("DATABASE_URL is not set; data is kept in memory and lost on restart");
            (Repositories::in_memory(), None)
        }
    };

    Ok(AppPorts {
        repositories,
        email: create_email_service(&config.email),
        payments: create_payment_gateway(&config.payment),
        rate_limiter: create_rate_limiter(&config.rate_limit).await,
        database,
    })
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    init_tracing(&config);

    info!(environment = %config.environment, "starting Natours server");
    if config.environment.is_production() && config.jwt.is_using_default_secret() {
        warn!("JWT_SECRET is not set; sessions are signed with the development secret");
    }

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let workers = config.server.workers;
    let ports = build_ports(&config).await?;
    let state = web::Data::new(AppState::new(config, ports, AuthServiceConfig::default()));

    info!("listening on {}", bind_address);
    let server = HttpServer::new(move || create_app(state.clone()));
    let server = if workers > 0 { server.workers(workers) } else { server };

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await
        .context("server terminated with an error")?;

    info!("server stopped");
    Ok(())
}
