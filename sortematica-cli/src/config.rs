use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Runtime settings: built-in defaults, then `sortematica.toml` (or the file
/// given with `--config`), then `SORTEMATICA_*` environment variables.
/// Command-line flags are applied last by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Directory holding the results sheets (LOTOFACIL.xlsx, ...)
    pub data_dir: PathBuf,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    pub bind: String,
    /// Upper bound on tickets generated per request
    pub max_tickets: usize,
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, Environment::with_prefix("SORTEMATICA"))
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("data_dir", "data")?
            .set_default("static_dir", "static")?
            .set_default("bind", "0.0.0.0:10000")?
            .set_default("max_tickets", 100_i64)?;

        let builder = match path {
            Some(p) => builder.add_source(File::from(p).required(true)),
            None => builder.add_source(File::with_name("sortematica").required(false)),
        };

        builder.add_source(env).build()?.try_deserialize()
    }
}
