//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;

use axum::http::StatusCode;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Document store configuration
    pub store: StoreConfig,
    /// API behavior configuration
    pub api: ApiConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Document store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// MongoDB connection URI
    pub uri: String,
    /// Database name
    pub db_name: String,
}

/// API behavior configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Status code for not-found outcomes (400 or 404)
    pub not_found_status: u16,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(3500),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            store: StoreConfig {
                uri: env::var("MONGO_URI")
                    .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
                db_name: env::var("MONGO_DB").unwrap_or_else(|_| "lifeboard".to_string()),
            },
            api: ApiConfig {
                not_found_status: env::var("NOT_FOUND_STATUS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .filter(|s| *s == 400 || *s == 404)
                    .unwrap_or(404),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ApiConfig {
    /// The configured not-found status as a `StatusCode`
    pub fn not_found_status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.not_found_status).unwrap_or(StatusCode::NOT_FOUND)
    }
}
