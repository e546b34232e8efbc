use crate::core::query::DateFilter;
use crate::dictation::Language;
use crate::utils::error::{AppError, AppResult};
use crate::utils::interactive::detect_editor;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Overrides `general.data_dir` when set
pub const DATA_DIR_ENV: &str = "CHALOBUS_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub general: GeneralConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub data_dir: PathBuf,
    #[serde(default)]
    pub default_filter: DateFilter,
    #[serde(default)]
    pub language: Language,
    pub color: bool,
    #[serde(default = "default_true")]
    pub seed_sample_buses: bool,
    pub editor: String,
    #[serde(
        default,
        serialize_with = "crate::utils::format::serialize_option_string",
        deserialize_with = "crate::utils::format::deserialize_option_string"
    )]
    pub dictation_cmd: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chalobus");

        Self {
            general: GeneralConfig {
                data_dir,
                default_filter: DateFilter::Today,
                language: Language::En,
                color: true,
                seed_sample_buses: true,
                editor: detect_editor(None),
                dictation_cmd: None,
            },
        }
    }
}

impl Config {
    pub fn load() -> AppResult<Self> {
        Self::load_custom(&Self::config_file_path())
    }

    pub fn ensure_config_exists() -> AppResult<()> {
        let config_path = Self::config_file_path();
        if !config_path.exists() {
            Config::default().save_to(&config_path)?;
        }
        Ok(())
    }

    pub fn load_custom(config_path: &Path) -> AppResult<Self> {
        let mut config = if config_path.exists() {
            let content =
                std::fs::read_to_string(config_path).map_err(|e| AppError::Io(e.to_string()))?;
            Self::parse(&content)?
        } else {
            let default_config = Config::default();
            default_config.save_to(config_path)?;
            default_config
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> AppResult<Self> {
        toml::from_str(content)
            .map_err(|e| AppError::System(format!("Failed to parse config file: {}", e)))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV)
            && !dir.trim().is_empty()
        {
            self.general.data_dir = PathBuf::from(dir);
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.general.data_dir.as_os_str().is_empty() {
            return Err(AppError::System("Data directory cannot be empty".to_string()));
        }

        if self.general.editor.is_empty() {
            return Err(AppError::System("Editor cannot be empty".to_string()));
        }

        if let Some(cmd) = &self.general.dictation_cmd
            && cmd.trim().is_empty()
        {
            return Err(AppError::System(
                "Dictation command cannot be blank; remove it to disable voice input".to_string(),
            ));
        }

        Ok(())
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&Self::config_file_path())
    }

    pub fn save_to(&self, config_path: &Path) -> AppResult<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Io(e.to_string()))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::System(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content).map_err(|e| AppError::Io(e.to_string()))?;

        Ok(())
    }

    pub fn config_file_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chalobus")
            .join("config.toml")
    }
}
