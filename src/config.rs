//! Stored session credentials.

use crate::model::SessionUser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::{fs, path::Path};

/// The session persisted between runs: tokens plus the signed-in user.
/// Written by `login`, deleted by `logout` and when the backend rejects
/// the credentials.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    pub user: SessionUser,
}

/// Path of the session file under the user's home directory.
pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
    let home_path = home::home_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Unable to determine home directory",
        )
    })?;
    Ok(home_path.join(".buddy-dash").join("session.json"))
}

impl Config {
    /// Create Config from a fresh login.
    pub fn new(access_token: String, refresh_token: String, user: SessionUser) -> Self {
        Config {
            access_token,
            refresh_token,
            user,
        }
    }

    /// Loads the session from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    /// Saves the session to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if writing to file fails or serialization fails.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Removes the stored session, if any. Clearing an absent session is
    /// not an error.
    pub fn clear(path: &Path) -> Result<(), std::io::Error> {
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IdValue;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn sample_config() -> Config {
        Config::new(
            "token-abc".to_string(),
            "refresh-def".to_string(),
            SessionUser {
                id: IdValue::Text("u1".to_string()),
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            },
        )
    }

    #[test]
    // Loading a saved session file should return the same session.
    fn test_load_recovers_saved_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let config = sample_config();
        config.save(&path).unwrap();

        let loaded_config = Config::load_from_file(&path).unwrap();
        assert_eq!(config, loaded_config);
    }

    #[test]
    // Saving a session should create directories if they don't exist.
    fn test_save_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent_dir").join("session.json");

        let result = sample_config().save(&path);

        assert!(result.is_ok(), "Failed to save config");
        assert!(
            path.parent().unwrap().exists(),
            "Parent directory does not exist"
        );
    }

    #[test]
    // Saving a session should overwrite an existing file.
    fn test_save_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let config1 = sample_config();
        config1.save(&path).unwrap();

        let mut config2 = sample_config();
        config2.access_token = "token-rotated".to_string();
        config2.save(&path).unwrap();

        let loaded_config = Config::load_from_file(&path).unwrap();
        assert_eq!(config2, loaded_config);
    }

    #[test]
    // Loading an invalid JSON file should return an error.
    fn test_load_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid_session.json");

        let mut file = File::create(&path).unwrap();
        writeln!(file, "invalid json").unwrap();

        let result = Config::load_from_file(&path);
        assert!(result.is_err());
    }

    #[test]
    // Clearing removes the file; clearing again is a no-op.
    fn test_clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        sample_config().save(&path).unwrap();
        assert!(path.exists());

        Config::clear(&path).unwrap();
        assert!(!path.exists());

        Config::clear(&path).unwrap();
    }
}
