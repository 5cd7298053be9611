//! Configuration loading
//!
//! Settings come from command-line flags with environment fallbacks.
//! `.env` files are read first so their values feed those fallbacks.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Load environment variables from .env files.
///
/// Priority order (highest to lowest):
/// 1. Variables already set in the environment
/// 2. The file given with `--env-file`
/// 3. Current directory .env
/// 4. ~/.pgdeck/.env
///
/// dotenvy never overwrites an existing variable, so earlier files win.
/// An explicit file that cannot be read is an error; the implicit ones
/// are optional. Returns the files that were loaded; logging happens
/// after tracing is up, since this runs before argument parsing.
pub fn load_dotenv(explicit: Option<&Path>) -> Result<Vec<PathBuf>> {
    let mut loaded = Vec::new();

    if let Some(path) = explicit {
        dotenvy::from_path(path)
            .with_context(|| format!("Failed to load env file {}", path.display()))?;
        loaded.push(path.to_path_buf());
    }

    if let Ok(path) = dotenvy::dotenv() {
        loaded.push(path);
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() && dotenvy::from_path(&env_file).is_ok() {
            loaded.push(env_file);
        }
    }

    Ok(loaded)
}

/// Get the pgdeck config directory path (~/.pgdeck)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".pgdeck"))
}

/// Resolve the connection string; a missing value is fatal.
pub fn require_database_url(database_url: Option<String>) -> Result<String> {
    database_url
        .filter(|url| !url.trim().is_empty())
        .context(
            "DATABASE_URL not set. Set via --database-url, DATABASE_URL env, --env-file, \
             ./.env or ~/.pgdeck/.env",
        )
}
