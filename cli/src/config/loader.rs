//! CLI configuration loader for filewise
//!
//! Implements single-source priority loading:
//! 1. --config file/dir (highest priority)
//! 2. Current working directory: ./filewise.json or ./.filewise/config.json
//! 3. Git repository root: <repo_root>/.filewise/config.json
//! 4. User config directory: <config_dir>/filewise/config.json
//! 5. Built-in defaults (no files)
//!
//! Command-line flags are applied on top by the individual commands.

use anyhow::{anyhow, Context, Result};
use filewise_core::FilewiseConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_FILE: &str = "config.json";
const CONFIG_DIR: &str = ".filewise";
const CWD_CONFIG_FILE: &str = "filewise.json";
const APP_DIR: &str = "filewise";

/// CLI configuration loader
pub struct CliConfigLoader {
    /// Override config file/directory path
    config_override: Option<PathBuf>,
    /// Directory searched for project configuration
    working_dir: Option<PathBuf>,
    /// Directory holding per-user configuration
    user_config_dir: Option<PathBuf>,
}

impl CliConfigLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            config_override: None,
            working_dir: None,
            user_config_dir: dirs::config_dir(),
        }
    }

    /// Set config file/directory override
    pub fn with_config_override(mut self, path: PathBuf) -> Self {
        self.config_override = Some(path);
        self
    }

    /// Search for project configuration from `dir` instead of the process cwd
    #[cfg(test)]
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = Some(dir);
        self
    }

    /// Replace the per-user configuration directory
    #[cfg(test)]
    pub fn with_user_config_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.user_config_dir = dir;
        self
    }

    /// Load and resolve configuration
    pub fn load(&self) -> Result<FilewiseConfig> {
        let config = if let Some(override_path) = &self.config_override {
            let path = expand_path(&override_path.to_string_lossy())?;
            self.load_from_path(&path).with_context(|| {
                format!(
                    "Failed to load config from override path: {}",
                    override_path.display()
                )
            })?
        } else {
            self.search_and_load()?
        };

        resolve_config(config)
    }

    /// Search for config in priority order
    fn search_and_load(&self) -> Result<FilewiseConfig> {
        let cwd = match &self.working_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        if let Some(config) = self.try_load_cwd(&cwd)? {
            return Ok(config);
        }

        if let Some(config) = self.try_load_git_root(&cwd)? {
            return Ok(config);
        }

        if let Some(config) = self.try_load_user_dir()? {
            return Ok(config);
        }

        debug!("No configuration file found, using defaults");
        Ok(FilewiseConfig::default())
    }

    /// Try loading from the working directory
    fn try_load_cwd(&self, cwd: &Path) -> Result<Option<FilewiseConfig>> {
        let candidates = [
            cwd.join(CWD_CONFIG_FILE),
            cwd.join(CONFIG_DIR).join(CONFIG_FILE),
        ];

        for path in candidates {
            if path.exists() {
                return Ok(Some(self.load_file(&path)?));
            }
        }

        Ok(None)
    }

    /// Try loading from git repository root
    fn try_load_git_root(&self, cwd: &Path) -> Result<Option<FilewiseConfig>> {
        if let Some(git_root) = find_git_root(cwd) {
            let config_path = git_root.join(CONFIG_DIR).join(CONFIG_FILE);
            if config_path.exists() {
                return Ok(Some(self.load_file(&config_path)?));
            }
        }
        Ok(None)
    }

    /// Try loading from the per-user config directory
    fn try_load_user_dir(&self) -> Result<Option<FilewiseConfig>> {
        if let Some(config_dir) = &self.user_config_dir {
            let config_path = config_dir.join(APP_DIR).join(CONFIG_FILE);
            if config_path.exists() {
                return Ok(Some(self.load_file(&config_path)?));
            }
        }
        Ok(None)
    }

    /// Load configuration from a specific path (file or directory)
    fn load_from_path(&self, path: &Path) -> Result<FilewiseConfig> {
        if path.is_file() {
            self.load_file(path)
        } else if path.is_dir() {
            let config_file = path.join(CONFIG_FILE);
            if config_file.exists() {
                self.load_file(&config_file)
            } else {
                Err(anyhow!(
                    "No config.json found in directory: {}",
                    path.display()
                ))
            }
        } else {
            Err(anyhow!("Config path does not exist: {}", path.display()))
        }
    }

    /// Load a single config file
    fn load_file(&self, path: &Path) -> Result<FilewiseConfig> {
        debug!(path = %path.display(), "loading configuration");

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

impl Default for CliConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand `~` and environment variables in a user-supplied path
pub fn expand_path(raw: &str) -> Result<PathBuf> {
    let expanded =
        shellexpand::full(raw).with_context(|| format!("Failed to expand path: {}", raw))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Expand paths held in the configuration
fn resolve_config(mut config: FilewiseConfig) -> Result<FilewiseConfig> {
    if let Some(root) = &config.search.root {
        config.search.root = Some(expand_path(root)?.to_string_lossy().to_string());
    }
    Ok(config)
}

fn find_git_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn loader_in(dir: &Path) -> CliConfigLoader {
        CliConfigLoader::new()
            .with_working_dir(dir.to_path_buf())
            .with_user_config_dir(None)
    }

    #[test]
    fn test_defaults_without_files() {
        let temp_dir = TempDir::new().unwrap();
        let config = loader_in(temp_dir.path()).load().unwrap();
        assert_eq!(config, FilewiseConfig::default());
    }

    #[test]
    fn test_cwd_file_wins_over_dot_dir() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("filewise.json"),
            r#"{ "rename": { "separator": "-" } }"#,
        )
        .unwrap();
        std::fs::create_dir(temp_dir.path().join(".filewise")).unwrap();
        std::fs::write(
            temp_dir.path().join(".filewise").join("config.json"),
            r#"{ "rename": { "separator": "+" } }"#,
        )
        .unwrap();

        let config = loader_in(temp_dir.path()).load().unwrap();
        assert_eq!(config.rename.separator, "-");
    }

    #[test]
    fn test_git_root_config() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::create_dir(temp_dir.path().join(".git")).unwrap();
        std::fs::create_dir(temp_dir.path().join(".filewise")).unwrap();
        std::fs::write(
            temp_dir.path().join(".filewise").join("config.json"),
            r#"{ "search": { "exclude_dirs": ["target"] } }"#,
        )
        .unwrap();

        let config = loader_in(&nested).load().unwrap();
        assert_eq!(config.search.exclude_dirs, vec!["target"]);
    }

    #[test]
    fn test_user_config_dir() {
        let project = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();
        std::fs::create_dir(user.path().join("filewise")).unwrap();
        std::fs::write(
            user.path().join("filewise").join("config.json"),
            r#"{ "cache": { "capacity": 8 } }"#,
        )
        .unwrap();

        let config = loader_in(project.path())
            .with_user_config_dir(Some(user.path().to_path_buf()))
            .load()
            .unwrap();
        assert_eq!(config.cache.capacity, 8);
    }

    #[test]
    fn test_override_directory_and_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("config.json"),
            r#"{ "search": { "case_sensitive": false } }"#,
        )
        .unwrap();

        let config = loader_in(temp_dir.path())
            .with_config_override(temp_dir.path().to_path_buf())
            .load()
            .unwrap();
        assert!(!config.search.case_sensitive);

        let missing = loader_in(temp_dir.path())
            .with_config_override(temp_dir.path().join("nope.json"))
            .load();
        assert!(missing.is_err());
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("filewise.json"), "{ not json").unwrap();

        let err = loader_in(temp_dir.path()).load().unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config file"));
    }

    #[test]
    fn test_root_is_expanded() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("filewise.json"),
            r#"{ "search": { "root": "~/photos" } }"#,
        )
        .unwrap();

        let config = loader_in(temp_dir.path()).load().unwrap();
        let root = config.search.root.unwrap();
        assert!(!root.starts_with('~'));
        assert!(root.ends_with("photos"));
    }
}
