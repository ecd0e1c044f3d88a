use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use crate::domain::model::ADE20K_MODEL_KEY;

/// Process configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub result_dir: PathBuf,
    pub test_image_dir: PathBuf,
    pub model_dir: PathBuf,
    pub default_model_key: String,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .unwrap_or(8000);

        let static_dir = PathBuf::from(env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()));
        let model_dir = PathBuf::from(env::var("MODEL_DIR").unwrap_or_else(|_| "models".to_string()));

        let default_model_key =
            env::var("DEFAULT_MODEL_KEY").unwrap_or_else(|_| ADE20K_MODEL_KEY.to_string());

        Ok(Self {
            host,
            port,
            result_dir: static_dir.join("results"),
            test_image_dir: static_dir.join("test_images"),
            static_dir,
            model_dir,
            default_model_key,
        })
    }

    /// Creates the result and test-image directories if missing.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.result_dir, &self.test_image_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
