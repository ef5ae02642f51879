use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::transcript::RetryPolicy;

/// File name looked up in the working directory before the user config dir.
const LOCAL_CONFIG_FILE: &str = "tubescribe.yaml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Transcript provider settings
    pub provider: ProviderConfig,

    /// Retry behaviour for transient provider failures
    pub retry: RetryConfig,

    /// Title lookup settings
    pub title: TitleConfig,

    /// PDF page layout
    pub pdf: PdfConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// YouTube origin, without trailing slash
    pub base_url: String,

    /// Caption language code to fetch
    pub language: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,

    /// Innertube client version reported to the player API
    pub client_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    pub max_attempts: u32,

    /// Pause between attempts in milliseconds
    pub delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleConfig {
    /// oEmbed endpoint used for title lookups
    pub oembed_url: String,

    /// Lookup timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    pub page_width_mm: f32,
    pub page_height_mm: f32,

    /// Left, right and top margin
    pub margin_mm: f32,

    /// Rows never start below this distance from the page bottom
    pub bottom_margin_mm: f32,

    /// Font size in points
    pub font_size_pt: f32,

    /// Height of one text row
    pub line_height_mm: f32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.youtube.com".to_string(),
            language: "en".to_string(),
            timeout_secs: 30,
            user_agent: concat!("tubescribe/", env!("CARGO_PKG_VERSION")).to_string(),
            client_version: "20.10.38".to_string(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: RetryPolicy::DEFAULT_MAX_ATTEMPTS,
            delay_ms: RetryPolicy::DEFAULT_DELAY.as_millis() as u64,
        }
    }
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            oembed_url: "https://www.youtube.com/oembed".to_string(),
            timeout_secs: 5,
        }
    }
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 10.0,
            bottom_margin_mm: 15.0,
            font_size_pt: 12.0,
            line_height_mm: 10.0,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.delay_ms))
    }
}

impl Config {
    /// Load configuration from an explicit path, the lookup locations, or defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Some(path.to_path_buf())
            }
            None => Self::config_path().ok().filter(|path| path.exists()),
        };

        match path {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                Self::from_file(&path)
            }
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse and validate a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path).context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`, or to the default location
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::user_config_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        fs_err::write(&config_path, content).context("Failed to write config file")?;

        Ok(config_path)
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Ok(local_config);
        }

        Self::user_config_path()
    }

    fn user_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("tubescribe").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.provider.base_url)
            .with_context(|| format!("Invalid provider base_url: {}", self.provider.base_url))?;
        url::Url::parse(&self.title.oembed_url)
            .with_context(|| format!("Invalid title oembed_url: {}", self.title.oembed_url))?;

        if self.provider.language.trim().is_empty() {
            anyhow::bail!("provider.language must not be empty");
        }
        if self.provider.timeout_secs == 0 || self.title.timeout_secs == 0 {
            anyhow::bail!("Timeouts must be at least one second");
        }
        if self.retry.max_attempts == 0 {
            anyhow::bail!("retry.max_attempts must be at least 1");
        }

        let pdf = &self.pdf;
        let sizes = [
            pdf.page_width_mm,
            pdf.page_height_mm,
            pdf.font_size_pt,
            pdf.line_height_mm,
        ];
        if sizes.iter().any(|v| !(*v > 0.0)) {
            anyhow::bail!("PDF page, font and line sizes must be positive");
        }
        if pdf.margin_mm < 0.0 || pdf.bottom_margin_mm < 0.0 {
            anyhow::bail!("PDF margins must not be negative");
        }
        if pdf.page_width_mm <= 2.0 * pdf.margin_mm
            || pdf.page_height_mm < pdf.margin_mm + pdf.bottom_margin_mm + pdf.line_height_mm
        {
            anyhow::bail!("PDF margins leave no room for text");
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Provider: {}", self.provider.base_url);
        println!("  Language: {}", self.provider.language);
        println!("  Request Timeout: {}s", self.provider.timeout_secs);
        println!(
            "  Retries: {} attempts, {}ms apart",
            self.retry.max_attempts, self.retry.delay_ms
        );
        println!("  Title Lookup: {} ({}s timeout)", self.title.oembed_url, self.title.timeout_secs);
        println!(
            "  PDF: {}x{}mm, {}pt font, {}mm rows",
            self.pdf.page_width_mm, self.pdf.page_height_mm, self.pdf.font_size_pt, self.pdf.line_height_mm
        );
    }
}
