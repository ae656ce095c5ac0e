use crate::core::ports::limiter::Limit;
use crate::impls::generators::gemini::DEFAULT_ENDPOINT;
use std::str::FromStr;

/// Per-action request limits over a sliding window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub export: Limit,
    pub add_question: Limit,
    pub generate_questions: Limit,
    pub submit: Limit,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            export: Limit::per_minute(5),
            add_question: Limit::per_minute(20),
            generate_questions: Limit::per_minute(5),
            submit: Limit::per_minute(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub upload_path: String,
    pub bind_addr: String,
    pub port: u16,
    pub generator_endpoint: String,
    pub generator_api_key: String,
    pub limits: Limits,
}

fn var_or(key: &str, default: &str) -> String {
    dotenv::var(key).ok().filter(|v| !v.is_empty()).unwrap_or_else(|| default.to_owned())
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    dotenv::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn limit_or(key: &str, default: Limit) -> Limit {
    Limit::per_minute(parsed_or(key, default.max_requests))
}

impl Config {
    /// Reads the environment (and `.env`, once loaded), falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Limits::default();
        Self {
            database_url: var_or("DATABASE_URL", "sqlite://survey.db"),
            db_max_connections: parsed_or("DB_MAX_CONNECTIONS", 5),
            upload_path: var_or("UPLOAD_PATH", "static/uploads"),
            bind_addr: var_or("BIND_ADDR", "0.0.0.0"),
            port: parsed_or("PORT", 5000),
            generator_endpoint: var_or("GENERATOR_ENDPOINT", DEFAULT_ENDPOINT),
            generator_api_key: var_or("GENERATOR_API_KEY", ""),
            limits: Limits {
                export: limit_or("RATE_LIMIT_EXPORT", defaults.export),
                add_question: limit_or("RATE_LIMIT_ADD_QUESTION", defaults.add_question),
                generate_questions: limit_or("RATE_LIMIT_GENERATE_QUESTIONS", defaults.generate_questions),
                submit: limit_or("RATE_LIMIT_SUBMIT", defaults.submit),
            },
        }
    }
}
