use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use super::types::GlobalConfig;

const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "./vhostcrawler.toml",
    "./config/vhostcrawler.toml",
];

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from `custom_path`, or else from the first default
    /// location that parses, falling back to defaults. An explicit path that
    /// does not exist is an error, unlike the default locations.
    pub fn load_with_custom_path(custom_path: Option<&Path>) -> Result<GlobalConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                anyhow::bail!("config file does not exist: {:?}", path);
            }
            return Self::load_from_file(path)
                .with_context(|| format!("Failed to load config from custom path: {:?}", path));
        }

        for path in Self::candidate_paths() {
            if !path.exists() {
                continue;
            }
            match Self::load_from_file(&path) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from: {:?}", path);
                    return Ok(config);
                }
                Err(e) => {
                    tracing::warn!("Failed to load config from {:?}: {:#}", path, e);
                }
            }
        }

        tracing::debug!("No configuration file found, using default settings");
        Ok(GlobalConfig::default())
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = DEFAULT_CONFIG_PATHS.iter().map(PathBuf::from).collect();
        if let Some(dirs) = ProjectDirs::from("io", "vhostcrawler", "vhostcrawler") {
            paths.push(dirs.config_dir().join("config.toml"));
        }
        paths
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<GlobalConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Invalid config file: {:?}", path))
    }

    pub fn parse(content: &str) -> Result<GlobalConfig> {
        let config: GlobalConfig = toml::from_str(content).context("Failed to parse TOML config")?;
        Self::validate_config(&config)?;
        Ok(config)
    }

    fn validate_config(config: &GlobalConfig) -> Result<()> {
        if config.concurrency.max_workers == 0 {
            anyhow::bail!("max_workers must be greater than 0");
        }

        if config.http.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than 0");
        }

        if config.hosts.backup_suffix.trim().is_empty() {
            anyhow::bail!("hosts backup_suffix cannot be empty");
        }

        Ok(())
    }
}
