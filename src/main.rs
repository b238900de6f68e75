use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::io;

use taskvault::{config::Config, routes, state::AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        log::error!("invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let state = AppState::from_config(&config).await.map_err(|e| {
        log::error!("failed to initialise application state: {}", e);
        io::Error::new(io::ErrorKind::Other, e.to_string())
    })?;

    log::info!(
        "Starting taskvault server at {} (token ttl {} min, bcrypt cost {})",
        config.server_url(),
        state.tokens().ttl().num_minutes(),
        state.hasher.cost()
    );

    let state = web::Data::new(state);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
