//! Server configuration from command-line flags, with environment fallbacks.

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use clap::Parser;
use std::net::SocketAddr;

use crate::domain::PageSettings;

#[derive(Debug, Clone, Parser)]
#[command(name = "splitledger-server")]
#[command(about = "Shared expense tracker backend", long_about = None)]
pub struct ServerConfig {
    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:splitledger.db")]
    pub database_url: String,

    /// Address to listen on
    #[arg(long = "bind", env = "BIND_ADDR", default_value = "127.0.0.1:3000")]
    pub bind_addr: SocketAddr,

    /// Origin allowed to call the API from a browser
    #[arg(long, env = "CORS_ORIGIN", default_value = "http://localhost:8080")]
    pub cors_origin: String,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Page size used when a list request gives none
    #[arg(long, default_value_t = 20)]
    pub default_page_size: u32,

    /// Largest page size a list request may ask for
    #[arg(long, default_value_t = 100)]
    pub max_page_size: u32,
}

impl ServerConfig {
    pub fn page_settings(&self) -> PageSettings {
        PageSettings {
            default_limit: self.default_page_size,
            max_limit: self.max_page_size.max(self.default_page_size),
        }
    }

    pub fn cors_origin_header(&self) -> Result<HeaderValue> {
        self.cors_origin
            .parse::<HeaderValue>()
            .with_context(|| format!("Invalid CORS origin: {}", self.cors_origin))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:splitledger.db".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cors_origin: "http://localhost:8080".to_string(),
            log_level: "info".to_string(),
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let config = ServerConfig::parse_from([
            "splitledger-server",
            "--database-url",
            "sqlite::memory:",
            "--bind",
            "0.0.0.0:8000",
            "--max-page-size",
            "50",
        ]);

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.bind_addr.port(), 8000);
        assert_eq!(config.page_settings(), PageSettings { default_limit: 20, max_limit: 50 });
    }

    #[test]
    fn test_invalid_cors_origin_is_an_error() {
        let config = ServerConfig {
            cors_origin: "bad\norigin".to_string(),
            ..Default::default()
        };

        assert!(config.cors_origin_header().is_err());
    }
}
