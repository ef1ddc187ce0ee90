// ⚙️ Configuration - JSON file + environment overrides

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_DATABASE: &str = "FINANCE_EDU_DB";
pub const ENV_USER: &str = "FINANCE_EDU_USER";
pub const ENV_CURRENCY: &str = "FINANCE_EDU_CURRENCY";
pub const ENV_QUESTIONS: &str = "FINANCE_EDU_QUESTIONS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file holding saved scenarios and quiz data
    pub database_path: PathBuf,

    /// Opaque owner of saved scenarios
    pub user_id: String,

    pub currency_symbol: String,

    /// JSON question bank used when the database has no active questions
    pub questions_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: PathBuf::from("finance-edu.db"),
            user_id: "local".to_string(),
            currency_symbol: "R$".to_string(),
            questions_path: None,
        }
    }
}

impl AppConfig {
    /// Defaults, then the file (if given), then environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Apply overrides from a key lookup (the process environment in practice).
    /// Blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(db) = get(ENV_DATABASE) {
            self.database_path = PathBuf::from(db);
        }
        if let Some(user) = get(ENV_USER) {
            self.user_id = user;
        }
        if let Some(currency) = get(ENV_CURRENCY) {
            self.currency_symbol = currency;
        }
        if let Some(questions) = get(ENV_QUESTIONS) {
            self.questions_path = Some(PathBuf::from(questions));
        }
    }

    /// "R$ 1234.56"; negative amounts keep their sign
    pub fn format_currency(&self, amount: f64) -> String {
        if amount < 0.0 {
            format!("-{} {:.2}", self.currency_symbol, amount.abs())
        } else {
            format!("{} {:.2}", self.currency_symbol, amount)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.database_path, PathBuf::from("finance-edu.db"));
        assert_eq!(config.user_id, "local");
        assert!(config.questions_path.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"user_id": "ana", "currency_symbol": "$"}}"#).unwrap();
        file.flush().unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();

        assert_eq!(config.user_id, "ana");
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.database_path, PathBuf::from("finance-edu.db"));
    }

    #[test]
    fn test_bad_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        file.flush().unwrap();

        assert!(AppConfig::from_file(file.path()).is_err());
        assert!(AppConfig::from_file("/nonexistent/config.json").is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_DATABASE, "/tmp/other.db"),
            (ENV_USER, "  "),
            (ENV_QUESTIONS, "questions.json"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database_path, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.user_id, "local");
        assert_eq!(config.currency_symbol, "R$");
        assert_eq!(config.questions_path, Some(PathBuf::from("questions.json")));
    }

    #[test]
    fn test_format_currency() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(1234.5), "R$ 1234.50");
        assert_eq!(config.format_currency(-20.0), "-R$ 20.00");
    }
}
