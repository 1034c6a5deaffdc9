use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tracing::info;

mod app;
mod app_state;
mod config;
mod db;
mod error;
mod middleware;
mod modules;
mod telemetry;

use app_state::AppState;
use db::repositories::{AppointmentRepository, AvailabilityRepository};
use modules::booking::engine::BookingEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _telemetry = telemetry::init_telemetry(None).await?;

    let env = config::init()?.clone();

    let pool = db::init_pool()
        .await
        .context("Failed to initialize database pool")?;

    let engine = BookingEngine::new(
        Arc::new(AvailabilityRepository::new(pool.clone())),
        Arc::new(AppointmentRepository::new(pool.clone())),
    );

    let addr = env.server_addr();
    let state = AppState::new(pool, env, engine);
    let app = app::create_router(state);

    info!("{} listening on {}", config::get().app.name, addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Failed to serve application")?;

    Ok(())
}
