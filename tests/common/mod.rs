//! Shared helpers for integration tests: an in-memory SQLite database with the
//! schema applied, and an application state around it.

#![allow(dead_code)]

use energy_consumption::common::AppState;
use energy_consumption::config::{Config, Deployment};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// A fresh database with every migration applied.
///
/// A single pooled connection keeps the in-memory database alive for the
/// whole test and shared by every query.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("apply migrations");
    db
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        api_host: "127.0.0.1".to_string(),
        api_port: 0,
        max_upload_bytes: 1024 * 1024,
        chart_cache_ttl_seconds: 60,
        deployment: Deployment::Local,
    }
}

pub async fn test_state() -> AppState {
    AppState::new(setup_db().await, test_config())
}
