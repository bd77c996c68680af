//! Configuration file discovery and creation.
//!
//! # Configuration File Format
//!
//! ```toml
//! [twitter]
//! bearer_token = "your-bearer-token"
//! base_url = "https://api.twitter.com"
//! max_pages = 10
//! page_delay_ms = 1000
//! default_language = "en"
//!
//! [classifier]
//! base_url = "https://api-inference.huggingface.co"
//! model = "joeddav/bart-large-mnli-yahoo-answers"
//! api_token = "your-hf-token"
//! threshold = 0.5
//!
//! [logging]
//! level = "info"
//! ```

use std::path::{Path, PathBuf};

use super::Config;

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "tweet-analyzer.toml";

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("Config file already exists: {0}")]
    AlreadyExists(String),
}

/// Candidate config locations, in lookup order
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("tweet-analyzer").join("config.toml"));
    }
    paths
}

/// First existing config file, if any
pub fn find_config_file() -> Option<PathBuf> {
    first_existing(candidate_paths())
}

fn first_existing(paths: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    paths.into_iter().find(|p| p.is_file())
}

/// Write a credential-free default configuration to `path`.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn write_default_config(path: &Path, force: bool) -> Result<(), ConfigFileError> {
    if path.exists() && !force {
        return Err(ConfigFileError::AlreadyExists(path.display().to_string()));
    }

    let content = toml::to_string_pretty(&Config::template())
        .map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
    }
    std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_config, ENV_LOCK};
    use tempfile::tempdir;

    #[test]
    fn test_working_directory_is_searched_first() {
        assert_eq!(candidate_paths()[0], PathBuf::from(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_first_existing_skips_missing_and_directories() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let found = dir.path().join("config.toml");
        std::fs::write(&found, "").unwrap();

        let picked = first_existing([missing.clone(), dir.path().to_path_buf(), found.clone()]);
        assert_eq!(picked, Some(found));
        assert_eq!(first_existing([missing]), None);
    }

    #[test]
    fn test_written_default_loads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        write_default_config(&path, false).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[twitter]"));
        assert!(!content.contains("bearer_token"));

        let config = {
            let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            load_config(Some(&path)).unwrap()
        };
        assert_eq!(config.twitter.max_pages, 10);
        assert_eq!(config.classifier.threshold, 0.5);
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "# mine").unwrap();

        assert!(matches!(
            write_default_config(&path, false),
            Err(ConfigFileError::AlreadyExists(_))
        ));
        write_default_config(&path, true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("[classifier]"));
    }
}
