//! Configuration management for tandem
//!
//! Config stored at: `<config dir>/tandem/config.json`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tandem_domain::model::DEFAULT_COEFFICIENT;
use tandem_domain::service::{SuggestionFallback, SUGGESTION_LIMIT};
use tandem_infra::report::{CompanyHeader, ReportOptions};
use tandem_types::{ConfigError, OutputFormat, Result};

const APP_DIR: &str = "tandem";
const DATA_DIR: &str = "Tandem";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Data directory override (store file and reports)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Store file name inside the data directory
    #[serde(default = "default_database_file")]
    pub database_file: String,

    /// Reports directory override
    #[serde(default)]
    pub reports_dir: Option<PathBuf>,

    /// Coefficient pre-filled into new orders
    #[serde(default = "default_coefficient")]
    pub default_coefficient: String,

    /// Maximum number of catalog suggestions
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,

    /// Return the whole catalog when a suggestion query matches nothing
    #[serde(default)]
    pub legacy_suggestion_fallback: bool,

    /// Default output format (json, table)
    #[serde(default)]
    pub output_format: OutputFormat,

    /// TrueType font embedded into documents
    #[serde(default)]
    pub font_path: Option<PathBuf>,

    /// Header printed on every document
    #[serde(default)]
    pub company: CompanyHeader,
}

fn default_database_file() -> String {
    "database.db".to_string()
}

fn default_coefficient() -> String {
    DEFAULT_COEFFICIENT.to_string()
}

fn default_suggestion_limit() -> usize {
    SUGGESTION_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            database_file: default_database_file(),
            reports_dir: None,
            default_coefficient: default_coefficient(),
            suggestion_limit: default_suggestion_limit(),
            legacy_suggestion_fallback: false,
            output_format: OutputFormat::default(),
            font_path: None,
            company: CompanyHeader::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join(APP_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Directory holding the store file and, by default, the reports
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join(DATA_DIR);
        Ok(data_dir)
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(&self.database_file))
    }

    pub fn reports_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.reports_dir {
            return Ok(dir.clone());
        }
        Ok(self.data_dir()?.join("reports"))
    }

    pub fn suggestion_fallback(&self) -> SuggestionFallback {
        if self.legacy_suggestion_fallback {
            SuggestionFallback::FullList
        } else {
            SuggestionFallback::Empty
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            company: self.company.clone(),
            font_path: self.font_path.clone(),
        }
    }

    /// Reject values that would break order handling
    pub fn validate(&self) -> Result<()> {
        if self.database_file.trim().is_empty() {
            return Err(ConfigError::InvalidValue("database_file must not be empty".into()).into());
        }
        if self.suggestion_limit == 0 {
            return Err(ConfigError::InvalidValue("suggestion_limit must be at least 1".into()).into());
        }
        Ok(())
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn display_path(path: Result<PathBuf>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|_| "(unavailable)".to_string())
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tandem Configuration")?;
        writeln!(f, "====================")?;
        writeln!(f)?;
        writeln!(f, "Data dir:            {}", display_path(self.data_dir()))?;
        writeln!(f, "Database:            {}", display_path(self.database_path()))?;
        writeln!(f, "Reports dir:         {}", display_path(self.reports_dir()))?;
        writeln!(f, "Default coefficient: {}", self.default_coefficient)?;
        writeln!(f, "Suggestion limit:    {}", self.suggestion_limit)?;
        writeln!(f, "Legacy fallback:     {}", self.legacy_suggestion_fallback)?;
        writeln!(f, "Output format:       {}", self.output_format)?;
        writeln!(
            f,
            "Font:                {}",
            self.font_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(built-in)".to_string())
        )?;
        writeln!(f, "Company:             {}", self.company.name)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:         {}", path.display())?;
        }

        Ok(())
    }
}
