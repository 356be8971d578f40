//! Command-line configuration.
//!
//! Holds the list of account identifiers to query and an optional base URL
//! override. Stored at `~/.config/classeviva/config.json`; the environment
//! (or a `.env` file) can override both fields for a single run.

use std::path::PathBuf;

use anyhow::{Context, Result};
use classeviva_core::ClientConfig;
use serde::{Deserialize, Serialize};

/// Application name used for the config directory
const APP_NAME: &str = "classeviva";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Comma-separated account identifiers, replacing the configured list
const ACCOUNTS_ENV: &str = "CLASSEVIVA_ACCOUNTS";

const BASE_URL_ENV: &str = "CLASSEVIVA_BASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub accounts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Invalid config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Apply `CLASSEVIVA_ACCOUNTS` and `CLASSEVIVA_BASE_URL` for this run.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(ACCOUNTS_ENV).ok(),
            std::env::var(BASE_URL_ENV).ok(),
        )
    }

    fn with_overrides(mut self, accounts: Option<String>, base_url: Option<String>) -> Self {
        if let Some(raw) = accounts {
            self.accounts = parse_accounts(&raw);
        }
        if let Some(url) = base_url.map(|u| u.trim().to_string()) {
            if !url.is_empty() {
                self.base_url = Some(url);
            }
        }
        self
    }

    /// Append an identifier unless it is already listed.
    pub fn add_account(&mut self, identifier: &str) -> bool {
        let identifier = identifier.trim();
        if identifier.is_empty() || self.accounts.iter().any(|a| a == identifier) {
            return false;
        }
        self.accounts.push(identifier.to_string());
        true
    }

    pub fn client_config(&self) -> ClientConfig {
        match &self.base_url {
            Some(url) => ClientConfig::with_base_url(url.clone()),
            None => ClientConfig::default(),
        }
    }
}

fn parse_accounts(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accounts_skips_blanks() {
        assert_eq!(
            parse_accounts(" S1111111, ,G2222222,"),
            vec!["S1111111".to_string(), "G2222222".to_string()]
        );
        assert!(parse_accounts("").is_empty());
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let config = Config {
            accounts: vec!["S1".into()],
            base_url: None,
        };
        let config =
            config.with_overrides(Some("S2,S3".into()), Some(" http://localhost/ ".into()));
        assert_eq!(config.accounts, vec!["S2".to_string(), "S3".to_string()]);
        assert_eq!(config.base_url.as_deref(), Some("http://localhost/"));
        assert_eq!(config.client_config().base_url, "http://localhost/");
    }

    #[test]
    fn test_blank_base_url_is_ignored() {
        let config = Config::default().with_overrides(None, Some("  ".into()));
        assert_eq!(config.base_url, None);
        assert_eq!(config.client_config(), ClientConfig::default());
    }

    #[test]
    fn test_add_account_dedups() {
        let mut config = Config::default();
        assert!(config.add_account("S1234567"));
        assert!(!config.add_account(" S1234567 "));
        assert!(!config.add_account(""));
        assert_eq!(config.accounts.len(), 1);
    }

    #[test]
    fn test_missing_fields_default() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("base_url"));
    }
}
