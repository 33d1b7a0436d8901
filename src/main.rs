use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use hr_portal_backend::config::AppConfig;
use hr_portal_backend::seed::RandomUserClient;
use hr_portal_backend::{db, AppState};
use log::info;
use std::io;
use std::sync::Arc;

fn startup_error(err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(startup_error)?;

    // Employee data and the session flag live side by side in the data dir
    let kv = db::open_store(&config.data_dir).map_err(startup_error)?;
    let source = RandomUserClient::new(config.seed.url.clone(), config.seed.nationality.clone())
        .map_err(startup_error)?;

    let state = web::Data::new(AppState::from_config(&config, kv, Arc::new(source)));

    info!(
        "Starting server at {} (data dir {})",
        config.bind_addr,
        config.data_dir.display()
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(hr_portal_backend::configure)
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
