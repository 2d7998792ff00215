use common::config::{AppEnvironment, DatabaseConfig, UploadConfig};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub session_ttl_days: i64,
    pub cookie_name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSection {
    pub environment: AppEnvironment,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. "info,sqlx=warn".
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSection,
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
    pub auth: AuthConfig,
    pub log: LogConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("CRAFTYKEEP_ENV")
            .map(|v| AppEnvironment::parse(&v))
            .unwrap_or_default();
        let environment = match environment {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
        };

        let s = Config::builder()
            .set_default("app.environment", environment)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.jwt_secret", "craftykeep-dev-secret")?
            .set_default("auth.session_ttl_days", 30)?
            .set_default("auth.cookie_name", "craftykeep_session")?
            .set_default("log.level", "info")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., CRAFTYKEEP__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("CRAFTYKEEP").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    /// Database URL after applying the environment default.
    pub fn database_url(&self) -> String {
        self.database.resolve_url(self.app.environment)
    }
}
