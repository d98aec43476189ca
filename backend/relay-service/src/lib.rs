pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;

use std::sync::Arc;

pub use config::Config;
pub use error::{AppError, Result};
pub use handlers::register_routes;

/// Process-wide messaging backend shared by every worker
pub type SharedProvider = Arc<dyn fcm_shared::MessagingProvider>;
