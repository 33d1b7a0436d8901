pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod seed;
pub mod state;
pub mod utils;

use actix_web::web;

pub use state::AppState;

/// Registers the API resources and the page fallback on an `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/auth/login")
            .route(web::post().to(handlers::auth::login)),
    )
    .service(
        web::resource("/api/auth/logout")
            .route(web::post().to(handlers::auth::logout)),
    )
    .service(
        web::resource("/api/employees")
            .route(web::get().to(handlers::employee::list_employees))
            .route(web::post().to(handlers::employee::save_employee)),
    )
    .service(
        web::resource("/api/employees/{id}")
            .route(web::get().to(handlers::employee::get_employee))
            .route(web::delete().to(handlers::employee::delete_employee)),
    )
    .service(
        web::resource("/api/stats")
            .route(web::get().to(handlers::employee::get_stats)),
    )
    .service(
        web::resource("/api/images")
            .route(web::post().to(handlers::image::upload_image)),
    )
    .default_service(web::to(handlers::pages::page_handler));
}
