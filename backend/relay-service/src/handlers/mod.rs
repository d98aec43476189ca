/// HTTP handlers for the push relay API
pub mod health;
pub mod messaging;

use actix_web::web;

use crate::error::AppError;

pub use health::{health_check, index};
pub use messaging::{send_to_device, send_to_multiple, send_to_topic};

/// Register all relay routes, including the JSON body error handler
pub fn register_routes(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| AppError::InvalidPayload(err.to_string()).into());

    cfg.app_data(json_config)
        .route("/", web::get().to(index))
        .route("/health", web::get().to(health_check));

    messaging::register_routes(cfg);
}
