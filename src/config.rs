use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which flavour of the dashboard to render. Both run the same pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Salary-range filter, tabbed sections, category palette.
    #[default]
    Executive,
    /// Single page, fixed gender colours, colour-scaled performance bins.
    Classic,
}

impl Variant {
    pub fn salary_filter(self) -> bool {
        matches!(self, Variant::Executive)
    }

    pub fn tabbed(self) -> bool {
        matches!(self, Variant::Executive)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Dashboard settings. Every field has a default, so a config file only
/// needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Dataset loaded at startup.
    pub data_path: PathBuf,
    pub variant: Variant,
    /// Score from which an employee counts as a high performer.
    pub high_performance_threshold: f64,
    /// Minimum high-performer percentage considered healthy.
    pub healthy_high_performance_share: f64,
    /// Minimum mean satisfaction considered healthy.
    pub healthy_satisfaction: f64,
    /// Positions shown in the salary-by-position chart.
    pub top_positions: usize,
    /// Bin width of the performance histogram.
    pub histogram_step: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("Employee_data.csv"),
            variant: Variant::default(),
            high_performance_threshold: 4.0,
            healthy_high_performance_share: 40.0,
            healthy_satisfaction: 3.0,
            top_positions: 10,
            histogram_step: 1.0,
        }
    }
}

impl DashboardConfig {
    /// Looked up in the working directory when no file is named.
    pub const FILE_NAME: &'static str = "hr-dashboard.json";
    /// Names an explicit config file.
    pub const CONFIG_ENV: &'static str = "HR_DASHBOARD_CONFIG";
    /// Overrides `data_path`.
    pub const DATA_ENV: &'static str = "HR_DASHBOARD_DATA";

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build the config from an optional file plus an optional data path
    /// override. Without a file the defaults apply.
    pub fn resolve(file: Option<&Path>, data_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match file {
            Some(path) => {
                log::info!("Reading dashboard config from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        if let Some(data_path) = data_path {
            config.data_path = data_path;
        }
        config.sanitize();
        Ok(config)
    }

    /// Resolve from the environment: `HR_DASHBOARD_CONFIG` or
    /// `hr-dashboard.json`, then `cli_data_path` or `HR_DASHBOARD_DATA`.
    pub fn discover(cli_data_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let file = std::env::var_os(Self::CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| {
                let local = PathBuf::from(Self::FILE_NAME);
                local.is_file().then_some(local)
            });
        Self::resolve(file.as_deref(), Self::data_override(cli_data_path))
    }

    /// The data path to use instead of the configured one: `cli_data_path`,
    /// else `HR_DASHBOARD_DATA`.
    pub fn data_override(cli_data_path: Option<PathBuf>) -> Option<PathBuf> {
        cli_data_path.or_else(|| std::env::var_os(Self::DATA_ENV).map(PathBuf::from))
    }

    /// Defaults plus a data path override, for when the config file is unusable.
    pub fn fallback(data_path: Option<PathBuf>) -> Self {
        let mut config = Self::default();
        if let Some(data_path) = data_path {
            config.data_path = data_path;
        }
        config
    }

    fn sanitize(&mut self) {
        let defaults = Self::default();
        if !(self.histogram_step.is_finite() && self.histogram_step > 0.0) {
            log::warn!(
                "histogram_step {} is not a positive number, using {}",
                self.histogram_step,
                defaults.histogram_step
            );
            self.histogram_step = defaults.histogram_step;
        }
        if self.top_positions == 0 {
            log::warn!("top_positions is 0, using {}", defaults.top_positions);
            self.top_positions = defaults.top_positions;
        }
    }
}
