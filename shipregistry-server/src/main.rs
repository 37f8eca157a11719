#![deny(missing_docs)]
//! Ship registry server executable.
//!
//! Hosts the HTTP endpoints for registering, querying and rating ships.

mod config;
mod db;
mod models;
mod openapi;
mod routes;
mod schema;
mod store;

#[cfg(not(test))]
use std::sync::Arc;

#[cfg(not(test))]
use actix_cors::Cors;
#[cfg(not(test))]
use actix_web::{App, HttpServer, http::header, web};
#[cfg(not(test))]
use dotenvy::dotenv;
#[cfg(not(test))]
use shipregistry_core::InMemoryShipStore;

#[cfg(not(test))]
use crate::config::{ServerConfig, StoreKind};
#[cfg(not(test))]
use crate::db::{DbSetupError, init_pool};
#[cfg(not(test))]
use crate::routes::{AppState, SharedStore, configure};
#[cfg(not(test))]
use crate::store::PgShipStore;

#[cfg(not(test))]
fn build_store(config: &ServerConfig) -> Result<SharedStore, DbSetupError> {
    match (config.store, config.database_url.as_deref()) {
        (StoreKind::Postgres, Some(database_url)) => {
            let pool = init_pool(database_url)?;
            Ok(Arc::new(PgShipStore::new(pool)))
        }
        (StoreKind::Postgres, None) => Err("DATABASE_URL must be set".into()),
        (StoreKind::Memory, _) => {
            log::warn!("using the in-memory ship store; records are lost on restart");
            Ok(Arc::new(InMemoryShipStore::new()))
        }
    }
}

#[cfg(not(test))]
fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;
    let store = build_store(&config).map_err(std::io::Error::other)?;
    let state = web::Data::new(AppState::new(store));

    log::info!(
        "starting ship registry on {}:{} with {:?} store",
        config.host,
        config.port,
        config.store
    );

    let ServerConfig {
        host,
        port,
        allowed_origins,
        ..
    } = config;

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            let mut cors = Cors::default()
                .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::CONTENT_TYPE])
                .max_age(3600);
            for origin in &allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            App::new()
                .wrap(actix_web::middleware::Logger::default())
                .wrap(cors)
                .app_data(state.clone())
                .configure(configure)
        })
        .bind((host, port))?
        .run()
        .await
    })
}

#[cfg(test)]
fn main() {}
