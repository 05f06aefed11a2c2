//! Configuration for covera paths and the server address.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (COVERA_HOME, COVERA_ADDR)
//! 2. Config file (.covera/config.yaml)
//! 3. Defaults (~/.covera, 0.0.0.0:3000)
//!
//! Config file discovery:
//! - Searches current directory and parents for .covera/config.yaml
//! - Paths in config file are relative to the config file's parent directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub server: Option<ServerConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to config file)
    pub home: Option<String>,
    /// Database snapshot file (relative to config file)
    pub data: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "0.0.0.0:3000"
    pub addr: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to covera home (state directory)
    pub home: PathBuf,
    /// Absolute path to the database snapshot file
    pub data: PathBuf,
    /// Server bind address
    pub addr: String,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".covera").join("config.yaml");
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

/// Resolve a path that may be relative to the config file's parent
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

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    // Default home directory
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".covera");

    // Check for config file
    let config_file = find_config_file();

    let (home, data, addr) = if let Some(ref config_path) = config_file {
        let config = load_config_file(config_path)?;
        let covera_dir = config_path.parent().unwrap_or(Path::new("."));

        let home = if let Ok(env_home) = std::env::var("COVERA_HOME") {
            PathBuf::from(env_home)
        } else if let Some(ref home_path) = config.paths.home {
            resolve_path(covera_dir, home_path)
        } else {
            default_home.clone()
        };

        let data = if let Some(ref data_path) = config.paths.data {
            resolve_path(covera_dir, data_path)
        } else {
            home.join("covera.json")
        };

        let addr = std::env::var("COVERA_ADDR").ok().unwrap_or_else(|| {
            config
                .server
                .and_then(|s| s.addr)
                .unwrap_or_else(|| DEFAULT_ADDR.to_string())
        });

        (home, data, addr)
    } else {
        // No config file - use env vars or defaults
        let home = std::env::var("COVERA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_home.clone());

        let data = home.join("covera.json");

        let addr = std::env::var("COVERA_ADDR")
            .unwrap_or_else(|_| DEFAULT_ADDR.to_string());

        (home, data, addr)
    };

    Ok(ResolvedConfig {
        home,
        data,
        addr,
        config_file,
    })
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

/// Get the covera home directory (state).
pub fn covera_home() -> Result<PathBuf> {
    Ok(config()?.home.clone())
}

/// Get the database snapshot path ($COVERA_HOME/covera.json)
pub fn data_path() -> Result<PathBuf> {
    Ok(config()?.data.clone())
}

/// Get the server bind address
pub fn bind_addr() -> Result<String> {
    Ok(config()?.addr.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let covera_dir = temp.path().join(".covera");
        std::fs::create_dir_all(&covera_dir).unwrap();

        let config_path = covera_dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1.0"
paths:
  home: ./
  data: ./backoffice.json
server:
  addr: "127.0.0.1:8088"
"#
        )
        .unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.paths.home, Some("./".to_string()));
        assert_eq!(config.paths.data, Some("./backoffice.json".to_string()));
        assert_eq!(config.server.unwrap().addr, Some("127.0.0.1:8088".to_string()));
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
