//! Run configuration: naming convention, selection flag, colors and format.
//!
//! Defaults can be overridden from a YAML file; every key is optional.
//!
//! ```yaml
//! naming:
//!   test_prefix: "check_"
//! select_flag: "--only"
//! use_colors: false
//! format: json
//! ```

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::registry::NamingConvention;
use crate::selector::DEFAULT_SELECT_FLAG;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub naming: NamingConvention,
    pub select_flag: String,
    pub use_colors: bool,
    pub format: OutputFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            naming: NamingConvention::default(),
            select_flag: DEFAULT_SELECT_FLAG.to_string(),
            use_colors: atty::is(atty::Stream::Stdout),
            format: OutputFormat::Text,
        }
    }
}

impl EngineConfig {
    pub fn from_yaml_str(source: &str, path: &Path) -> Result<Self, EngineError> {
        serde_yaml::from_str(source).map_err(|source| EngineError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let source = fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&source, path)
    }
}
