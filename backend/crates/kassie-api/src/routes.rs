//! Route table for the Kassie API.
//!
//! Paths under /v1/api are guarded by the auth middleware except for the
//! entries in `middleware::auth::PUBLIC_PATHS`.

use crate::handlers;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/healthz", web::get().to(handlers::health::healthz))
        .service(
            web::scope("/v1/api")
                .service(
                    web::scope("/session")
                        .route("/login", web::post().to(handlers::session::login))
                        .route("/refresh", web::post().to(handlers::session::refresh))
                        .route("/logout", web::post().to(handlers::session::logout))
                        .route("/profiles", web::get().to(handlers::session::profiles)),
                )
                .service(
                    web::scope("/schema")
                        .route("/keyspaces", web::get().to(handlers::schema::list_keyspaces))
                        .route(
                            "/keyspaces/{keyspace}/tables",
                            web::get().to(handlers::schema::list_tables),
                        )
                        .route(
                            "/keyspaces/{keyspace}/tables/{table}",
                            web::get().to(handlers::schema::get_table_schema),
                        ),
                )
                .service(
                    web::scope("/data")
                        .route("/query", web::post().to(handlers::data::query_rows))
                        .route("/page", web::post().to(handlers::data::get_next_page))
                        .route("/filter", web::post().to(handlers::data::filter_rows)),
                ),
        );
}
