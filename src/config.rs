//! Configuration for ihalebind paths and tunables.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (IHALEBIND_HOME, IHALEBIND_CATALOG)
//! 2. Config file (.ihalebind/config.yaml)
//! 3. Defaults (~/.ihalebind, ~/.ihalebind/devices.json)
//!
//! Config file discovery:
//! - Searches current directory and parents for .ihalebind/config.yaml
//! - `paths.home` is relative to the .ihalebind/ directory, `paths.catalog`
//!   to the project root (parent of .ihalebind/)

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::InputLimits;
use crate::extract::ExtractorSettings;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const CONFIG_DIR: &str = ".ihalebind";
const CATALOG_FILE: &str = "devices.json";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub extraction: Option<ExtractionConfig>,
    #[serde(default)]
    pub limits: Option<LimitsConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to .ihalebind/)
    pub home: Option<String>,
    /// Device catalog JSON (relative to project root)
    pub catalog: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    pub test_block_window: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    pub max_input_bytes: Option<u64>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    /// Absolute path to ihalebind home
    pub home: PathBuf,
    /// Absolute path to the device catalog
    pub catalog: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    pub extraction: ExtractorSettings,
    pub limits: InputLimits,
}

/// Find config file by searching `start` and its parents
fn find_config_file_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_DIR).join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to `base`
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Environment overrides, read once per load
#[derive(Debug, Clone, Default)]
struct EnvOverrides {
    home: Option<PathBuf>,
    catalog: Option<PathBuf>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            home: std::env::var("IHALEBIND_HOME").ok().map(PathBuf::from),
            catalog: std::env::var("IHALEBIND_CATALOG").ok().map(PathBuf::from),
        }
    }
}

/// Resolve configuration from an optional config file, env overrides and
/// the default home
fn resolve(
    config_file: Option<PathBuf>,
    env: EnvOverrides,
    default_home: PathBuf,
) -> Result<ResolvedConfig> {
    let mut extraction = ExtractorSettings::default();
    let mut limits = InputLimits::default();

    let (home, catalog) = if let Some(ref config_path) = config_file {
        let config = load_config_file(config_path)?;

        // .ihalebind/ and the project root above it
        let config_dir = config_path.parent().unwrap_or(Path::new("."));
        let base_dir = config_dir.parent().unwrap_or(Path::new("."));

        let home = if let Some(env_home) = env.home {
            env_home
        } else if let Some(ref home_path) = config.paths.home {
            resolve_path(config_dir, home_path)
        } else {
            default_home
        };

        let catalog = if let Some(env_catalog) = env.catalog {
            env_catalog
        } else if let Some(ref catalog_path) = config.paths.catalog {
            resolve_path(base_dir, catalog_path)
        } else {
            home.join(CATALOG_FILE)
        };

        if let Some(window) = config.extraction.and_then(|e| e.test_block_window) {
            extraction.test_block_window = window;
        }
        if let Some(max) = config.limits.and_then(|l| l.max_input_bytes) {
            limits.max_input_bytes = max;
        }

        (home, catalog)
    } else {
        // No config file - use env vars or defaults
        let home = env.home.unwrap_or(default_home);
        let catalog = env.catalog.unwrap_or_else(|| home.join(CATALOG_FILE));
        (home, catalog)
    };

    Ok(ResolvedConfig {
        home,
        catalog,
        config_file,
        extraction,
        limits,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(CONFIG_DIR);

    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    resolve(find_config_file_from(&cwd), EnvOverrides::from_env(), default_home)
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

/// Get the device catalog path.
pub fn catalog_path() -> Result<PathBuf> {
    Ok(config()?.catalog.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(root: &Path, body: &str) -> PathBuf {
        let dir = root.join(CONFIG_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        let config_path = dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "{}", body).unwrap();
        config_path
    }

    #[test]
    fn test_defaults_without_file() {
        let home = PathBuf::from("/home/user/.ihalebind");
        let config = resolve(None, EnvOverrides::default(), home.clone()).unwrap();

        assert_eq!(config.home, home);
        assert_eq!(config.catalog, home.join("devices.json"));
        assert!(config.config_file.is_none());
        assert_eq!(config.extraction, ExtractorSettings::default());
        assert_eq!(config.limits, InputLimits::default());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            temp.path(),
            r#"
version: "1.0"
paths:
  home: ./
  catalog: ../data/devices.json
extraction:
  test_block_window: 2000
limits:
  max_input_bytes: 1024
"#,
        );

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.paths.home, Some("./".to_string()));
        assert_eq!(config.paths.catalog, Some("../data/devices.json".to_string()));
        assert_eq!(config.extraction.unwrap().test_block_window, Some(2000));
        assert_eq!(config.limits.unwrap().max_input_bytes, Some(1024));
    }

    #[test]
    fn test_config_file_tunables_applied() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            temp.path(),
            r#"
version: "1.0"
extraction:
  test_block_window: 900
limits:
  max_input_bytes: 4096
"#,
        );

        let home = PathBuf::from("/fallback/.ihalebind");
        let config = resolve(Some(config_path), EnvOverrides::default(), home.clone()).unwrap();
        assert_eq!(config.home, home);
        assert_eq!(config.catalog, home.join("devices.json"));
        assert_eq!(config.extraction.test_block_window, 900);
        assert_eq!(config.limits.max_input_bytes, 4096);
    }

    #[test]
    fn test_env_overrides_config_file() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            temp.path(),
            r#"
version: "1.0"
paths:
  catalog: devices.json
"#,
        );

        let env = EnvOverrides {
            home: None,
            catalog: Some(PathBuf::from("/opt/catalog.json")),
        };
        let config = resolve(Some(config_path), env, PathBuf::from("/h")).unwrap();
        assert_eq!(config.catalog, PathBuf::from("/opt/catalog.json"));
    }

    #[test]
    fn test_discovery_walks_parents() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(temp.path(), "version: \"1.0\"");
        let nested = temp.path().join("ihaleler").join("2024");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config_file_from(&nested), Some(config_path));
    }

    #[test]
    fn test_reload_matches_cached() {
        let cached = config().unwrap();
        let fresh = reload_config().unwrap();
        assert_eq!(fresh.home, cached.home);
        assert_eq!(fresh.catalog, cached.catalog);
        assert_eq!(fresh.limits, cached.limits);
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/subdir")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }
}
