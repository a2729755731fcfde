use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{Cli, Command, DEFAULT_BIND, DEFAULT_OUTPUT, DEFAULT_TIMEOUT_SECS};

/// Settings read from a JSON, TOML or YAML file. Unset keys fall back to the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Timeout in seconds for the page fetch and each link probe
    pub timeout: Option<u64>,

    /// Maximum number of concurrent link probes
    pub concurrency: Option<usize>,

    /// Output format: text or json
    pub output: Option<String>,

    /// Address the API server listens on
    pub bind: Option<String>,

    /// Verbose output
    pub verbose: Option<bool>,
}

const FILE_STEM: &str = "pageprobe";

/// Recognised extensions, in lookup order
const EXTENSIONS: [&str; 4] = ["json", "toml", "yaml", "yml"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    fn parse(self, contents: &str) -> Result<Config> {
        let config = match self {
            Self::Json => serde_json::from_str(contents)?,
            Self::Toml => toml::from_str(contents)?,
            Self::Yaml => serde_yaml::from_str(contents)?,
        };
        Ok(config)
    }
}

/// CLI value unless it is still the default, then the file value if any
fn prefer_cli<T: PartialEq + Clone>(cli: &T, default: &T, file: Option<&T>) -> T {
    match file {
        Some(value) if cli == default => value.clone(),
        _ => cli.clone(),
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let format = ConfigFormat::from_path(path)
            .with_context(|| format!("Unsupported config file format: {}", path.display()))?;
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        format
            .parse(&contents)
            .with_context(|| format!("Failed to parse {:?} config: {}", format, path.display()))
    }

    /// `./pageprobe.<ext>` first, then `<config home>/pageprobe/config.<ext>`.
    /// The config home is `$XDG_CONFIG_HOME` when set, `~/.config` otherwise.
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = EXTENSIONS
            .iter()
            .map(|ext| PathBuf::from(format!("{}.{}", FILE_STEM, ext)))
            .collect();

        let config_home = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")));

        if let Some(dir) = config_home.map(|home| home.join(FILE_STEM)) {
            paths.extend(EXTENSIONS.iter().map(|ext| dir.join(format!("config.{}", ext))));
        }

        paths
    }

    pub fn from_default_paths() -> Result<Option<Self>> {
        let Some(path) = Self::default_paths().into_iter().find(|path| path.is_file()) else {
            return Ok(None);
        };

        tracing::debug!(path = %path.display(), "Loading configuration file");
        Self::from_file(&path).map(Some)
    }

    /// Loads the file named by `--config`, or the first default path found
    pub fn load(cli: &Cli) -> Result<Option<Self>> {
        match &cli.config {
            Some(path) => Self::from_file(Path::new(path)).map(Some),
            None => Self::from_default_paths(),
        }
    }

    /// Applies file values to every CLI setting left at its default
    pub fn merge_with_cli(&self, cli: &Cli) -> Cli {
        let command = match &cli.command {
            Command::Analyze { url, output, save } => Command::Analyze {
                url: url.clone(),
                output: prefer_cli(output, &DEFAULT_OUTPUT.to_string(), self.output.as_ref()),
                save: save.clone(),
            },
            Command::Serve { bind } => Command::Serve {
                bind: prefer_cli(bind, &DEFAULT_BIND.to_string(), self.bind.as_ref()),
            },
        };

        Cli {
            command,
            timeout: prefer_cli(&cli.timeout, &DEFAULT_TIMEOUT_SECS, self.timeout.as_ref()),
            concurrency: cli.concurrency.or(self.concurrency),
            verbose: prefer_cli(&cli.verbose, &false, self.verbose.as_ref()),
            config: cli.config.clone(),
        }
    }
}
