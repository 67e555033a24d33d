use crate::core::encoding::EncodingCandidate;
use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional settings file, e.g.
///
/// ```toml
/// [source]
/// path = "${HOME}/exports/c2_file.csv"
/// encodings = ["utf-8", "windows-1252"]
///
/// [output]
/// path = "./bitwarden_file.csv"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: Option<SourceConfig>,
    pub output: Option<OutputConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub path: Option<String>,
    pub encodings: Option<Vec<EncodingCandidate>>,
    pub sample_size: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| ConvertError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ConvertError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HOME})，未定義的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConvertError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn source_path(&self) -> Option<&str> {
        self.source.as_ref()?.path.as_deref()
    }

    pub fn output_path(&self) -> Option<&str> {
        self.output.as_ref()?.path.as_deref()
    }

    pub fn encodings(&self) -> Option<&[EncodingCandidate]> {
        self.source.as_ref()?.encodings.as_deref()
    }

    pub fn sample_size(&self) -> Option<usize> {
        self.source.as_ref()?.sample_size
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(encodings) = self.encodings() {
            validation::validate_non_empty_list("source.encodings", encodings)?;
        }
        if let Some(sample_size) = self.sample_size() {
            validation::validate_positive_number("source.sample_size", sample_size, 64)?;
        }
        Ok(())
    }
}
