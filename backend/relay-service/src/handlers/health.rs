use actix_web::HttpResponse;

pub const GREETING: &str = "Hai, ini adalah REST API untuk aplikasi wisatanyware!";

/// GET /
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GREETING)
}

/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
