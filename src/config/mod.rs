//! Configuration module for the blog backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::AppError;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Directory holding the page templates
    pub template_dir: PathBuf,
    /// Directory served under `/static/`
    pub static_dir: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    /// Insert the sample post on startup
    pub seed_sample_post: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("BLOG_DB_PATH")
            .unwrap_or_else(|_| "./data/blog.sqlite".to_string())
            .into();

        let bind_addr_raw =
            env::var("BLOG_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let bind_addr = parse_bind_addr(&bind_addr_raw)?;

        let template_dir = env::var("BLOG_TEMPLATE_DIR")
            .unwrap_or_else(|_| "./templates".to_string())
            .into();

        let static_dir = env::var("BLOG_STATIC_DIR")
            .unwrap_or_else(|_| "./static".to_string())
            .into();

        let log_level = env::var("BLOG_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format_raw = env::var("BLOG_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
        let log_format = LogFormat::parse(&log_format_raw).ok_or_else(|| {
            AppError::Config(format!("Invalid BLOG_LOG_FORMAT: {}", log_format_raw))
        })?;

        let seed_sample_post = match env::var("BLOG_SEED_SAMPLE_POST") {
            Ok(raw) => parse_bool(&raw).ok_or_else(|| {
                AppError::Config(format!("Invalid BLOG_SEED_SAMPLE_POST: {}", raw))
            })?,
            Err(_) => false,
        };

        Ok(Self {
            db_path,
            bind_addr,
            template_dir,
            static_dir,
            log_level,
            log_format,
            seed_sample_post,
        })
    }
}

fn parse_bind_addr(raw: &str) -> Result<SocketAddr, AppError> {
    raw.parse()
        .map_err(|_| AppError::Config(format!("Invalid BLOG_BIND_ADDR format: {}", raw)))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 7] = [
        "BLOG_DB_PATH",
        "BLOG_BIND_ADDR",
        "BLOG_TEMPLATE_DIR",
        "BLOG_STATIC_DIR",
        "BLOG_LOG_LEVEL",
        "BLOG_LOG_FORMAT",
        "BLOG_SEED_SAMPLE_POST",
    ];

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        for var in VARS {
            env::remove_var(var);
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.db_path, PathBuf::from("./data/blog.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.template_dir, PathBuf::from("./templates"));
        assert_eq!(config.static_dir, PathBuf::from("./static"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(!config.seed_sample_post);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" ON "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool(""), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_invalid_bind_addr_is_config_error() {
        let err = parse_bind_addr("localhost-8080").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(parse_bind_addr("not an address").is_err());

        let addr = parse_bind_addr("127.0.0.1:3000").unwrap();
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_parse_log_format() {
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("xml"), None);
    }
}
