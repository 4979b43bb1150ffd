//! Storage configuration loading.

use std::path::PathBuf;

/// Environment variable naming the JSON file used by `FileStorage`.
pub const FILE_PATH_ENV: &str = "MODELBASE_FILE_PATH";

/// Default JSON file, relative to the working directory.
pub const DEFAULT_FILE_PATH: &str = "file.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub file_path: PathBuf,
}

impl StorageConfig {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Read configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let file_path = lookup(FILE_PATH_ENV)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| {
                tracing::debug!("{FILE_PATH_ENV} not set; using {DEFAULT_FILE_PATH}");
                DEFAULT_FILE_PATH.to_string()
            });
        Self::new(file_path)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_file_json() {
        assert_eq!(StorageConfig::default().file_path, PathBuf::from("file.json"));
    }

    #[test]
    fn from_lookup_reads_file_path_variable() {
        let config = StorageConfig::from_lookup(|key| {
            (key == FILE_PATH_ENV).then(|| "/data/objects.json".to_string())
        });
        assert_eq!(config.file_path, PathBuf::from("/data/objects.json"));
    }

    #[test]
    fn from_lookup_falls_back_when_unset_or_empty() {
        assert_eq!(StorageConfig::from_lookup(|_| None), StorageConfig::default());
        assert_eq!(
            StorageConfig::from_lookup(|_| Some(String::new())),
            StorageConfig::default()
        );
    }

    #[test]
    fn from_env_follows_file_path_variable() {
        // SAFETY: this is the only test in the crate touching the environment.
        unsafe { std::env::set_var(FILE_PATH_ENV, "/tmp/modelbase-env.json") };
        let set = StorageConfig::from_env();
        unsafe { std::env::remove_var(FILE_PATH_ENV) };
        let cleared = StorageConfig::from_env();

        assert_eq!(set.file_path, PathBuf::from("/tmp/modelbase-env.json"));
        assert_eq!(cleared, StorageConfig::default());
    }

    #[test]
    fn new_accepts_any_path_like() {
        let config = StorageConfig::new("/tmp/objects.json");
        assert_eq!(config.file_path, PathBuf::from("/tmp/objects.json"));
    }
}
