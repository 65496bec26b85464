pub mod health;
pub mod photos;
pub mod uploads;

use crate::config::Config;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::index))
        .route("/upload", web::post().to(photos::upload_photo))
        .route("/photos", web::get().to(photos::list_photos))
        .route("/uploads/{filename}", web::get().to(uploads::get_upload));
}

/// Any origin when none are configured, otherwise just the listed ones.
pub fn cors(cfg: &Config) -> Cors {
    if cfg.allowed_origins.is_empty() {
        return Cors::permissive();
    }
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600);
    for origin in &cfg.allowed_origins {
        cors = cors.allowed_origin(origin);
    }
    cors
}
