use std::env;
use std::path::{Path, PathBuf};

// Default configuration constants
pub const DEFAULT_STORE_FILE: &str = "user_store.json";
pub const SNAPSHOT_FILE_PREFIX: &str = "user_data_backup";
pub const SNAPSHOT_SCHEMA_VERSION: &str = "1";
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

/// Path of the store file, overridable via `SNAPBACK_STORE`.
pub fn get_store_path() -> PathBuf {
    match env::var("SNAPBACK_STORE") {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => PathBuf::from(DEFAULT_STORE_FILE),
    }
}

pub fn get_pbkdf2_iterations() -> u32 {
    env::var("SNAPBACK_PBKDF2_ITERATIONS")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_PBKDF2_ITERATIONS)
}
