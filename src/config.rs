use dotenvy::dotenv;
use std::env;

use crate::attendance::writer::DEFAULT_BATCH_SIZE;

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub database_url: String,
    pub api_prefix: String,

    /// Marks per transaction during imports.
    pub import_batch_size: usize,
    /// Substrings that classify a biometric status text as an exit.
    pub biometric_exit_tokens: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            import_batch_size: env::var("IMPORT_BATCH_SIZE")
                .unwrap_or_else(|_| DEFAULT_BATCH_SIZE.to_string())
                .parse()
                .unwrap(),
            biometric_exit_tokens: env::var("BIOMETRIC_EXIT_TOKENS")
                .unwrap_or_else(|_| "sal,out".to_string())
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }
}
