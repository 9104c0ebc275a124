use actix_cors::Cors;
use actix_web::{dev::Service as _, middleware::Logger, web, App};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use marine_billing_api::db::mongo::create_mongo_client;
use marine_billing_api::middleware::auth::AuthMiddleware;
use marine_billing_api::routes;

pub struct TestApp {
    pub client: Arc<mongodb::Client>,
}

impl TestApp {
    pub async fn new() -> Self {
        let mongo_uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let client = create_mongo_client(&mongo_uri).await;

        Self { client }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.client.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            // Render service errors into HTTP responses the way the real
            // server's dispatcher does; test::call_service panics on Err.
            .wrap_fn(|req, srv| {
                let fut = srv.call(req);
                async move {
                    match fut.await {
                        Ok(res) => Ok(res.map_into_left_body()),
                        Err(err) => {
                            // The original request can't be cloned across
                            // routing, and only the error's status/body
                            // matter here.
                            let http_req =
                                actix_web::test::TestRequest::default().to_http_request();
                            let res = actix_web::HttpResponse::from_error(err);
                            Ok(actix_web::dev::ServiceResponse::new(http_req, res)
                                .map_into_right_body())
                        }
                    }
                }
            })
            .route("/health", web::get().to(routes::health::health_check))
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/auth")
                            .route("/signin", web::post().to(routes::auth::signin))
                            .service(web::scope("").wrap(AuthMiddleware).route(
                                "/session",
                                web::get().to(routes::auth::operator_session),
                            )),
                    )
                    .service(
                        web::scope("")
                            .wrap(AuthMiddleware)
                            .service(
                                web::scope("/customers")
                                    .route("", web::get().to(routes::customer::search_customers))
                                    .route("", web::post().to(routes::customer::create_customer))
                                    .route("/{id}", web::get().to(routes::customer::get_customer))
                                    .route(
                                        "/{id}/payment-methods",
                                        web::get().to(routes::customer::get_payment_methods),
                                    )
                                    .route(
                                        "/{id}/boats",
                                        web::get().to(routes::customer::get_customer_boats),
                                    )
                                    .route(
                                        "/{id}/orders",
                                        web::get().to(routes::service_order::get_customer_orders),
                                    ),
                            )
                            .service(
                                web::scope("/anodes")
                                    .route("", web::get().to(routes::anode::get_catalog)),
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
    }
}

/// Mint a bearer token the auth middleware will accept. Tests run serially,
/// so setting the shared secret here is safe.
pub fn auth_header() -> String {
    std::env::set_var("JWT_SECRET", "test-secret");
    let token = routes::auth::generate_token("ops@example.com", ObjectId::new())
        .expect("token generation");
    format!("Bearer {}", token)
}
