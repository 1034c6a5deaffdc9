use sqlx::PgPool;

use crate::config;
use crate::modules::booking::engine::BookingEngine;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub env: config::Config,
    pub engine: BookingEngine,
}

impl AppState {
    pub fn new(db: PgPool, env: config::Config, engine: BookingEngine) -> Self {
        Self { db, env, engine }
    }
}
