mod config;
mod errors;
mod ingest;
mod models;
mod routes;
mod store;

use actix::Actor;
use actix_web::{App, HttpServer};
use actix_web::middleware::Logger;
use actix_web::web::Data;
use crate::config::Config;
use crate::store::{PhotoStore, server::StoreServer};
use env_logger::Env;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Init logger to show info by default, but can be overridden by RUST_LOG
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cfg = Config::from_env_config()?;

    let store = PhotoStore::new(&cfg.database_path);
    log::info!(
        "metadata at {}, uploads in {}",
        store.path().display(),
        cfg.uploads_dir
    );
    let store_server = StoreServer::new(store).start();

    log::info!("Backend running on {}", cfg.listen);
    let listen_addr = cfg.listen.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(routes::cors(&cfg))
            .app_data(Data::new(cfg.clone()))
            .app_data(Data::new(store_server.clone()))
            .configure(routes::configure)
    })
    .bind(listen_addr)?
    .run()
    .await?;
    Ok(())
}
