use std::path::PathBuf;

use serde::Deserialize;

/// Deployment environment. Selects defaults that differ between a developer
/// checkout and the production container.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    #[default]
    Development,
    Production,
}

impl AppEnvironment {
    /// Parse the `CRAFTYKEEP_ENV` style value. Anything other than
    /// `production`/`prod` is treated as development.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }
}

pub const DEV_DATABASE_URL: &str = "sqlite://./dev.db?mode=rwc";
pub const PROD_DATABASE_URL: &str = "sqlite:///app/data/prod.db?mode=rwc";

/// Database location. An explicit `url` wins over the environment default.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,
}

impl DatabaseConfig {
    pub fn resolve_url(&self, env: AppEnvironment) -> String {
        match self.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => match env {
                AppEnvironment::Development => DEV_DATABASE_URL.into(),
                AppEnvironment::Production => PROD_DATABASE_URL.into(),
            },
        }
    }
}

/// Strip the password from a connection URL before it is logged.
pub fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    match rest.split_once('@') {
        Some((userinfo, host)) => {
            let user = userinfo.split(':').next().unwrap_or_default();
            format!("{scheme}://{user}:***@{host}")
        }
        None => url.to_string(),
    }
}

/// Where uploaded images live and how they are addressed publicly.
#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Directory on disk. Default: "public/uploads".
    #[serde(default = "default_upload_dir")]
    pub dir: PathBuf,
    /// URL prefix stored in rows. Default: "/uploads".
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,
    /// Maximum request body for multipart forms, in bytes. Default: 16 MiB.
    #[serde(default = "default_max_size")]
    pub max_size: usize,
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("public").join("uploads")
}
fn default_public_prefix() -> String {
    "/uploads".into()
}
fn default_max_size() -> usize {
    16 * 1024 * 1024
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
            public_prefix: default_public_prefix(),
            max_size: default_max_size(),
        }
    }
}
