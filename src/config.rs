use crate::error::{AppError, AppResult};
use std::env;

pub const DEFAULT_PORT: u16 = 4000;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub log_level: String,
    pub log_file: Option<String>,
    pub auto_migrate: bool,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| AppError::Config("DATABASE_URL is required".to_string()))?;

        Ok(Config {
            database_url,
            server_host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port: match lookup("PORT") {
                Some(port) => port
                    .trim()
                    .parse()
                    .map_err(|_| AppError::Config(format!("Invalid PORT: {}", port)))?,
                None => DEFAULT_PORT,
            },
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_file: lookup("LOG_FILE").filter(|value| !value.trim().is_empty()),
            auto_migrate: lookup("AUTO_MIGRATE")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
                .unwrap_or(true),
        })
    }

    /// 日志中展示的数据库地址，隐藏用户名和密码
    pub fn redacted_database_url(&self) -> String {
        match self.database_url.rsplit_once('@') {
            Some((prefix, host)) => {
                let scheme = prefix.split("://").next().unwrap_or("db");
                format!("{}://***@{}", scheme, host)
            }
            None => self.database_url.clone(),
        }
    }
}
