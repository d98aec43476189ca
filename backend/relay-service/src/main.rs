use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use fcm_shared::FCMClient;
use relay_service::{register_routes, Config, SharedProvider};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting push relay service");

    let config = Config::from_env().context("Failed to load configuration")?;

    let mut client = FCMClient::from_service_account_file(&config.firebase.credentials_path)
        .with_context(|| {
            format!(
                "Failed to load Firebase credentials from {}",
                config.firebase.credentials_path.display()
            )
        })?;
    if let Some(project_id) = config.firebase.project_id.clone() {
        client = client.with_project_id(project_id);
    }
    info!("FCM client initialized for project {}", client.project_id);

    let provider: SharedProvider = Arc::new(client);
    let addr = config.app.bind_address();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(provider.clone()))
            .wrap(middleware::Logger::default())
            .wrap(Cors::permissive())
            .configure(register_routes)
    })
    .bind(&addr)
    .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Push relay listening on http://{}", addr);

    server.run().await.context("HTTP server error")
}
