use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File name of the default config, looked up next to the executable.
pub const CONFIG_FILE_NAME: &str = "heic-convert.json";

/// Default JPEG quality, matching what most photo tools pick.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Target format for converted images.
///
/// The string form (`png` / `jpeg`) doubles as the output file extension.
///
/// ```rust
/// use heic_convert::config::OutputFormat;
///
/// let format: OutputFormat = "jpeg".parse().unwrap();
/// assert_eq!(format.extension(), "jpeg");
/// assert!("jpg".parse::<OutputFormat>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    /// Extension used for output files.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "png" => Ok(Self::Png),
            "jpeg" => Ok(Self::Jpeg),
            other => anyhow::bail!("unsupported output format `{other}` (expected `png` or `jpeg`)"),
        }
    }
}

/// Where converted files land under the output root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputLayout {
    /// Every output goes directly under the output root. Inputs sharing a
    /// file stem overwrite each other; the last one visited wins.
    #[default]
    Flat,
    /// Outputs keep the input's relative subdirectory path.
    Mirror,
}

/// Persistent settings for a conversion run.
///
/// Everything here can also be set from the command line; CLI flags win.
///
/// ```rust,no_run
/// use heic_convert::config::{Config, OutputLayout};
///
/// let mut config = Config::load(Some("heic-convert.json".as_ref())).unwrap();
/// config.layout = OutputLayout::Mirror;
/// config.save(Some("heic-convert.json".as_ref())).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JPEG quality, 1–100. Ignored for PNG output.
    pub jpeg_quality: u8,
    /// Output layout under the output root.
    pub layout: OutputLayout,
    /// Copy the source Exif block into the converted file.
    pub keep_exif: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            layout: OutputLayout::Flat,
            keep_exif: false,
        }
    }
}

impl Config {
    /// Resolve the default config file path, in the same directory as the executable.
    pub fn config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("Failed to get executable path")?;
        let exe_dir = exe_path
            .parent()
            .context("Failed to get executable directory")?;
        Ok(exe_dir.join(CONFIG_FILE_NAME))
    }

    /// Load config from the given path, or from the default location.
    ///
    /// A missing file falls back to defaults. An explicitly requested file
    /// that is missing gets a warning; the default one only a debug line.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            if path.is_some() {
                log::warn!(
                    "Config file not found at {}. Using defaults.",
                    config_path.display()
                );
            } else {
                log::debug!("No config at {}, using defaults", config_path.display());
            }
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;
        let mut config: Config =
            serde_json::from_str(&contents).context("Failed to parse config file")?;
        config.jpeg_quality = clamp_quality(config.jpeg_quality);
        Ok(config)
    }

    /// Save config to the given path, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, contents).context("Failed to write config file")?;
        log::debug!("Config saved to {}", config_path.display());
        Ok(())
    }
}

/// Keep a JPEG quality inside the range the encoder accepts.
pub fn clamp_quality(quality: u8) -> u8 {
    quality.clamp(1, 100)
}
