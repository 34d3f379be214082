//! Input, output and comparison settings.

use serde::Deserialize;

use crate::domain::dataset::{DEFAULT_DATE_FORMAT, DEFAULT_STORE_THRESHOLD};
use crate::domain::{DatasetOptions, TotalPlacement};

/// Where the sales file lives and how to read it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatasetConfig {
    /// Path to the sales CSV.
    #[serde(default = "default_dataset_path")]
    pub path: String,
    /// `chrono` format of the `Date` column.
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Rows with a store number at or above this are dropped.
    #[serde(default = "default_store_threshold")]
    pub store_threshold: u32,
}

impl DatasetConfig {
    #[must_use]
    pub fn options(&self) -> DatasetOptions {
        DatasetOptions {
            date_format: self.date_format.clone(),
            store_threshold: self.store_threshold,
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
            date_format: default_date_format(),
            store_threshold: default_store_threshold(),
        }
    }
}

/// Where the highlights artifact is written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

/// Comparison table layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ComparisonConfig {
    /// `sorted` (default) or `first`.
    #[serde(default)]
    pub total_placement: TotalPlacement,
}

fn default_dataset_path() -> String {
    "data/Walmart_Sales.csv".into()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.into()
}

const fn default_store_threshold() -> u32 {
    DEFAULT_STORE_THRESHOLD
}

fn default_output_path() -> String {
    "data/highlights.csv".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_yields_default_load_options() {
        assert_eq!(DatasetConfig::default().options(), DatasetOptions::default());
    }

    #[test]
    fn empty_table_yields_default_load_options() {
        let config: DatasetConfig = toml::from_str("").unwrap();
        assert_eq!(config.options(), DatasetOptions::default());
        assert_eq!(config, DatasetConfig::default());
    }
}
