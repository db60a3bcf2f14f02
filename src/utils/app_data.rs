use crate::utils::tokenizer::WordSplit;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "hiscore";
const CONFIG_FILE: &str = "config.json";

/// Default report flags when none are given
pub const DEFAULT_REPORT_FLAGS: &str = "summary+reports";

/// Application configuration stored in the platform config directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Worker threads for document scoring. 0 uses the number of CPU cores.
    #[serde(default)]
    pub threads: usize,

    /// File name pattern of the documents collected from a directory
    #[serde(default = "default_include")]
    pub include: String,

    /// Minimum count of a histogram entry to appear in a full histogram report
    #[serde(default = "default_histogram_min_count")]
    pub histogram_min_count: u64,

    /// How document text is cut into words
    #[serde(default)]
    pub word_split: WordSplit,
}

fn default_include() -> String {
    "*.txt".to_string()
}

fn default_histogram_min_count() -> u64 {
    2
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            include: default_include(),
            histogram_min_count: default_histogram_min_count(),
            word_split: WordSplit::default(),
        }
    }
}

impl AppConfig {
    /// Load config from the config directory, or return default if not found
    pub fn load() -> Result<Self> {
        match get_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from an explicit file, or return default if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Save config to an explicit file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Get the effective thread count (resolves 0 to CPU count)
    pub fn effective_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus()
        } else {
            self.threads
        }
    }
}

/// Get the number of CPUs available
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Path of the config file, if the platform has a config directory
pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME).join(CONFIG_FILE))
}

/// Which reports a scoring run writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReportFlags {
    /// Batch summary next to the query file
    pub summary: bool,
    /// One report per document
    pub reports: bool,
    /// Per-expression scores in document reports
    pub explain: bool,
    /// Full single and compound histograms in document reports
    pub histograms: bool,
}

impl ReportFlags {
    /// Parse a flag string such as `summary+reports+explain`. Matching is by
    /// substring and case-insensitive; unknown words are ignored.
    pub fn parse(flags: &str) -> Self {
        let flags = flags.to_lowercase();
        Self {
            summary: flags.contains("summary"),
            reports: flags.contains("reports"),
            explain: flags.contains("explain"),
            histograms: flags.contains("histograms"),
        }
    }
}
