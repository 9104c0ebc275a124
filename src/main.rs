use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use marine_billing_api::{db, middleware, routes};

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);
    println!("Attempting to bind to {}:{}", host, port);

    let mongo_uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    let client = db::mongo::create_mongo_client(&mongo_uri).await;
    println!("MongoDB connection established");

    println!("Starting HTTP server...");

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
            .app_data(web::Data::new(client.clone()))
            .route("/health", web::get().to(routes::health::health_check))
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/auth")
                            .route("/signin", web::post().to(routes::auth::signin))
                            .service(
                                web::scope("").wrap(middleware::auth::AuthMiddleware).route(
                                    "/session",
                                    web::get().to(routes::auth::operator_session),
                                ),
                            ),
                    )
                    .service(
                        web::scope("")
                            .wrap(middleware::auth::AuthMiddleware)
                            .service(
                                web::scope("/customers")
                                    .route("", web::get().to(routes::customer::search_customers))
                                    .route("", web::post().to(routes::customer::create_customer))
                                    .route("/{id}", web::get().to(routes::customer::get_customer))
                                    .route(
                                        "/{id}/stripe-customer",
                                        web::post().to(routes::customer::ensure_stripe_customer),
                                    )
                                    .route(
                                        "/{id}/payment-methods",
                                        web::get().to(routes::customer::get_payment_methods),
                                    )
                                    .route(
                                        "/{id}/boats",
                                        web::get().to(routes::customer::get_customer_boats),
                                    )
                                    .route(
                                        "/{id}/boats",
                                        web::post().to(routes::customer::add_customer_boat),
                                    )
                                    .route(
                                        "/{id}/orders",
                                        web::get().to(routes::service_order::get_customer_orders),
                                    ),
                            )
                            .service(
                                web::scope("/anodes")
                                    .route("", web::get().to(routes::anode::get_catalog))
                                    .route("", web::post().to(routes::anode::add_catalog_item)),
                            )
                            .service(
                                web::scope("/pricing")
                                    .route("/preview", web::post().to(routes::pricing::preview))
                                    .route("/quote", web::post().to(routes::pricing::create_quote)),
                            )
                            .service(
                                web::scope("/payment")
                                    .route("/charge", web::post().to(routes::charge::charge_quote)),
                            ),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
