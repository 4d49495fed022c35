use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::filter::{FilterMode, FilterState};
use crate::data::DataSource;
use crate::error::DashboardError;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "PENGUINS_DASHBOARD_CONFIG";

/// Bounds a configured `plotly_bin_range` must stay within.
pub const PLOTLY_BIN_LIMITS: [u32; 2] = [1, 500];
/// Domain of the bin slider.
pub const SEABORN_BIN_LIMITS: [u32; 2] = [1, 50];

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterLink {
    pub label: String,
    pub url: String,
}

/// Startup configuration. Every field has a default, so `{}` is a valid file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    pub window_size: [f32; 2],
    pub dataset: DataSource,
    pub filter_mode: FilterMode,
    /// Initial control values.
    pub controls: FilterState,
    /// Inclusive range of the numeric bin input.
    pub plotly_bin_range: [u32; 2],
    /// Inclusive range of the bin slider.
    pub seaborn_bin_range: [u32; 2],
    pub footer_link: Option<FooterLink>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "JB Penguins Data".to_string(),
            window_size: [1200.0, 800.0],
            dataset: DataSource::Bundled,
            filter_mode: FilterMode::PassThrough,
            controls: FilterState::default(),
            plotly_bin_range: [1, 100],
            seaborn_bin_range: [1, 50],
            footer_link: Some(FooterLink {
                label: "JBTallgrass GitHub".to_string(),
                url: "https://github.com/JBtallgrass/cintel-02-data".to_string(),
            }),
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self, DashboardError> {
        let config_err = |reason: String| DashboardError::Config {
            path: path.to_path_buf(),
            reason,
        };
        let text = std::fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
        let config: DashboardConfig =
            serde_json::from_str(&text).map_err(|e| config_err(e.to_string()))?;
        config.validate().map_err(config_err)?;
        Ok(config.clamped())
    }

    /// Config from an explicit path (CLI argument), else from `CONFIG_ENV`,
    /// else defaults.
    pub fn resolve(cli_path: Option<PathBuf>) -> Result<Self, DashboardError> {
        let path = cli_path.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        match path {
            Some(path) => {
                log::info!("Using config {}", path.display());
                Self::load(&path)
            }
            None => {
                log::info!("No config given, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<(), String> {
        for (name, [lo, hi], [min, max]) in [
            ("plotly_bin_range", self.plotly_bin_range, PLOTLY_BIN_LIMITS),
            ("seaborn_bin_range", self.seaborn_bin_range, SEABORN_BIN_LIMITS),
        ] {
            if lo < min || lo > hi || hi > max {
                return Err(format!(
                    "{name} must satisfy {min} <= min <= max <= {max}, got [{lo}, {hi}]"
                ));
            }
        }
        Ok(())
    }

    /// Clamp the initial bin counts into their widget ranges.
    pub fn clamped(mut self) -> Self {
        let [lo, hi] = self.plotly_bin_range;
        self.controls.plotly_bin_count = self.controls.plotly_bin_count.clamp(lo, hi);
        let [lo, hi] = self.seaborn_bin_range;
        self.controls.seaborn_bin_slider = self.controls.seaborn_bin_slider.clamp(lo, hi);
        self
    }
}
