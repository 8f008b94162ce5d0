//! YAML configuration.
//!
//! ```yaml
//! page_size: 50
//! page_sizes: [10, 25, 50, 100, 250]
//! source:
//!   sqlite: roster.db
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pagination::{PageSize, PAGE_SIZE_CHOICES};

/// Where the students come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceConfig {
    /// A SQLite database file.
    Sqlite(PathBuf),
    /// A CSV file loaded into memory.
    Csv(PathBuf),
    /// A generated sample of the given size.
    Sample(usize),
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Sample(120)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RosterConfig {
    pub page_size: PageSize,
    pub page_sizes: Vec<usize>,
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub source: SourceConfig,
    /// Seed for [`SourceConfig::Sample`].
    pub seed: u64,
}

impl Default for RosterConfig {
    fn default() -> Self {
        RosterConfig {
            page_size: PageSize::DEFAULT,
            page_sizes: PAGE_SIZE_CHOICES.to_vec(),
            source: SourceConfig::default(),
            seed: 7,
        }
    }
}

impl RosterConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        RosterConfig::from_yaml_str(&text)
    }

    /// Page size choices, sorted and without zero or duplicates.
    pub fn page_size_choices(&self) -> Vec<usize> {
        let mut choices: Vec<usize> = self.page_sizes.iter().copied().filter(|&n| n > 0).collect();
        choices.sort_unstable();
        choices.dedup();
        choices
    }
}
