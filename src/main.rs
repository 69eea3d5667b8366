use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::info;

use wayfarer_api::db;
use wayfarer_api::routes;
use wayfarer_api::services::distance_service::DistanceService;
use wayfarer_api::services::planner_service::PlannerConfig;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);

    let mongo_uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    let client = db::mongo::create_mongo_client(&mongo_uri).await;

    let estimator = web::Data::new(
        DistanceService::from_env().expect("Failed to build routing HTTP client"),
    );
    let planner_config = web::Data::new(PlannerConfig::default());

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .route("/health", web::get().to(routes::health::health_check))
            .app_data(web::Data::new(client.clone()))
            .app_data(estimator.clone())
            .app_data(planner_config.clone())
            .service(
                web::scope("/api")
                    .route("/place", web::get().to(routes::place::get_places))
                    .service(
                        web::scope("/trips")
                            .route("/plan", web::post().to(routes::trip::plan_trip))
                            .route("/user", web::get().to(routes::trip::get_user_trips))
                            .route("", web::post().to(routes::trip::save_trip))
                            .route("/{id}", web::put().to(routes::trip::update_trip))
                            .route("/{id}", web::delete().to(routes::trip::delete_trip)),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
