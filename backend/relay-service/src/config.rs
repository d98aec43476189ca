use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CREDENTIALS_PATH: &str = "serviceAccountKey.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub firebase: FirebaseConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    /// Service account JSON downloaded from the Firebase console
    pub credentials_path: PathBuf,
    /// Overrides the project named in the service account
    pub project_id: Option<String>,
}

impl AppConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Reads a variable, treating an empty value as unset.
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let port = match non_empty_var("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| AppError::Config(format!("PORT must be a valid u16, got {:?}", raw)))?,
            None => DEFAULT_PORT,
        };

        let credentials_path = non_empty_var("FIREBASE_CREDENTIALS_PATH")
            .or_else(|| non_empty_var("GOOGLE_APPLICATION_CREDENTIALS"))
            .unwrap_or_else(|| DEFAULT_CREDENTIALS_PATH.to_string());

        Ok(Config {
            app: AppConfig {
                host: non_empty_var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
            },
            firebase: FirebaseConfig {
                credentials_path: PathBuf::from(credentials_path),
                project_id: non_empty_var("FIREBASE_PROJECT_ID"),
            },
        })
    }
}
