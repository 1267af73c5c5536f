use std::path::PathBuf;

/// Environment variable overriding the catalog database location
pub const DB_PATH_VAR: &str = "DB_PATH";
/// Environment variable overriding the images directory
pub const IMAGES_DIR_VAR: &str = "IMAGES_DIR";

pub const DEFAULT_DB_PATH: &str = "data/metadata/wardrobe.db";
pub const DEFAULT_IMAGES_DIR: &str = "data/images";

/// Locations every operation works against.
///
/// Resolved once at startup and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub images_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
        }
    }
}

impl Config {
    /// Defaults overridden by `DB_PATH` / `IMAGES_DIR` when set
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let path_or = |key: &str, default: PathBuf| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(default)
        };

        Self {
            db_path: path_or(DB_PATH_VAR, defaults.db_path),
            images_dir: path_or(IMAGES_DIR_VAR, defaults.images_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_live_under_data() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.db_path, PathBuf::from("data/metadata/wardrobe.db"));
        assert_eq!(config.images_dir, PathBuf::from("data/images"));
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(|key| match key {
            "DB_PATH" => Some("/tmp/closet.db".to_string()),
            "IMAGES_DIR" => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.db_path, PathBuf::from("/tmp/closet.db"));
        assert_eq!(config.images_dir, PathBuf::from(DEFAULT_IMAGES_DIR));
    }
}
