use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;

use taskpad::auth::{AuthMiddleware, TokenKeys};
use taskpad::config::Config;
use taskpad::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    // Config::from_env aborts here on a missing or undersized signing
    // secret; the keys are derived once and handed to everything by clone.
    let config = Config::from_env();
    let keys = TokenKeys::from_config(&config);

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    log::info!("Starting taskpad server at {}", config.server_url());

    let bind_addr = (config.server_host.clone(), config.server_port);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(keys.clone()))
            .wrap(AuthMiddleware::new(keys.clone()))
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .configure(routes::config)
    })
    .bind(bind_addr)?
    .run()
    .await
}
