// Liveness probe

use actix_web::HttpResponse;
use serde_json::json;

/// GET /healthz. Public, no cluster round trip.
pub async fn healthz() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "name": "kassie",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
