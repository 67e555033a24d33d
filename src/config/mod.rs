pub mod cli;
pub mod paths;
pub mod toml_config;

use crate::core::dialect::DEFAULT_SAMPLE_SIZE;
use crate::core::encoding::{EncodingCandidate, DEFAULT_ENCODINGS};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use paths::PathRole;
#[cfg(feature = "cli")]
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "syno2bw")]
#[command(about = "Convert a Synology C2 Password Manager CSV export into a Bitwarden/Vaultwarden CSV import")]
pub struct CliConfig {
    /// Synology C2 Password Manager export (prompted for when omitted)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Where to save the Bitwarden CSV (prompted for when omitted)
    #[arg(short, long)]
    pub output: Option<String>,

    /// TOML settings file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Encodings to try, in order
    #[arg(long, value_delimiter = ',')]
    pub encodings: Vec<String>,

    /// Characters inspected when detecting the CSV dialect
    #[arg(long)]
    pub sample_size: Option<usize>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Never prompt; blank paths fall back to the defaults")]
    pub no_prompt: bool,
}

/// Fully resolved settings for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub encodings: Vec<EncodingCandidate>,
    pub sample_size: usize,
}

impl ConversionConfig {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            encodings: DEFAULT_ENCODINGS.to_vec(),
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }

    pub fn with_encodings(mut self, encodings: Vec<EncodingCandidate>) -> Self {
        self.encodings = encodings;
        self
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }
}

impl ConfigProvider for ConversionConfig {
    fn input_path(&self) -> &Path {
        &self.input_path
    }

    fn output_path(&self) -> &Path {
        &self.output_path
    }

    fn encodings(&self) -> &[EncodingCandidate] {
        &self.encodings
    }

    fn sample_size(&self) -> usize {
        self.sample_size
    }
}

impl Validate for ConversionConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input_path)?;
        validation::validate_path("output", &self.output_path)?;
        validation::validate_non_empty_list("encodings", &self.encodings)?;
        validation::validate_positive_number("sample_size", self.sample_size, 64)?;
        Ok(())
    }
}

/// Merges command line flags over the settings file. Paths missing from both
/// are obtained from `ask`, whose raw answer goes through path cleanup.
#[cfg(feature = "cli")]
pub fn resolve<F>(cli: &CliConfig, file: Option<&TomlConfig>, mut ask: F) -> Result<ConversionConfig>
where
    F: FnMut(PathRole) -> Result<String>,
{
    let mut raw_path = |flag: &Option<String>, from_file: Option<&str>, role: PathRole| {
        match flag.as_deref().or(from_file) {
            Some(value) => Ok(value.to_string()),
            None => ask(role),
        }
    };

    let raw_input = raw_path(&cli.input, file.and_then(TomlConfig::source_path), PathRole::Input)?;
    let raw_output = raw_path(&cli.output, file.and_then(TomlConfig::output_path), PathRole::Output)?;

    let encodings = if cli.encodings.is_empty() {
        file.and_then(TomlConfig::encodings)
            .map(<[EncodingCandidate]>::to_vec)
            .unwrap_or_else(|| DEFAULT_ENCODINGS.to_vec())
    } else {
        cli.encodings
            .iter()
            .map(|name| name.parse())
            .collect::<Result<Vec<EncodingCandidate>>>()?
    };

    let sample_size = cli
        .sample_size
        .or_else(|| file.and_then(TomlConfig::sample_size))
        .unwrap_or(DEFAULT_SAMPLE_SIZE);

    let config = ConversionConfig::new(
        paths::clean_path_input(&raw_input, PathRole::Input)?,
        paths::clean_path_input(&raw_output, PathRole::Output)?,
    )
    .with_encodings(encodings)
    .with_sample_size(sample_size);

    tracing::debug!("Resolved configuration: {:?}", config);
    Ok(config)
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    fn never_ask(role: PathRole) -> Result<String> {
        panic!("unexpected prompt for {:?}", role)
    }

    #[test]
    fn test_cli_flags_win_over_file() {
        let cli = CliConfig {
            input: Some("cli.csv".to_string()),
            encodings: vec!["latin-1".to_string()],
            ..Default::default()
        };
        let file = TomlConfig::from_toml_str(
            "[source]\npath = \"file.csv\"\nencodings = [\"utf-8\"]\nsample_size = 512\n[output]\npath = \"out.csv\"\n",
        )
        .unwrap();

        let config = resolve(&cli, Some(&file), never_ask).unwrap();
        assert_eq!(config.input_path, PathBuf::from("cli.csv"));
        assert_eq!(config.output_path, PathBuf::from("out.csv"));
        assert_eq!(config.encodings, vec![EncodingCandidate::Latin1]);
        assert_eq!(config.sample_size, 512);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_paths_are_prompted_for() {
        let cli = CliConfig::default();
        let mut asked = Vec::new();

        let config = resolve(&cli, None, |role| {
            asked.push(role);
            Ok(match role {
                PathRole::Input => "\"./in.csv\"\n".to_string(),
                PathRole::Output => "\n".to_string(),
            })
        })
        .unwrap();

        assert_eq!(asked, vec![PathRole::Input, PathRole::Output]);
        assert_eq!(config.input_path, PathBuf::from("./in.csv"));
        assert_eq!(
            config.output_path,
            std::env::current_dir().unwrap().join(paths::DEFAULT_OUTPUT_FILE)
        );
        assert_eq!(config.encodings, DEFAULT_ENCODINGS.to_vec());
        assert_eq!(config.sample_size, DEFAULT_SAMPLE_SIZE);
    }

    #[test]
    fn test_bad_encoding_flag() {
        let cli = CliConfig {
            input: Some("a.csv".to_string()),
            output: Some("b.csv".to_string()),
            encodings: vec!["morse".to_string()],
            ..Default::default()
        };
        assert!(resolve(&cli, None, never_ask).is_err());
    }
}
