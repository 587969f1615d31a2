//! Engine-level errors.
//!
//! These never come from test bodies (see [`crate::failure::Failure`]); they
//! cover misuse of the registration API, configuration loading and report
//! serialization.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum EngineError {
    #[error("test '{name}' is already registered")]
    #[diagnostic(
        code(testique::registry::duplicate),
        help("test names must be unique within a run")
    )]
    DuplicateTest { name: String },

    #[error("failed to read config file '{}'", path.display())]
    #[diagnostic(code(testique::config::io))]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{}'", path.display())]
    #[diagnostic(
        code(testique::config::parse),
        help("expected a YAML mapping with naming, select_flag, use_colors and format keys")
    )]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to serialize report")]
    #[diagnostic(code(testique::report::json))]
    Json(#[from] serde_json::Error),

    #[error("failed to write report")]
    #[diagnostic(code(testique::report::io))]
    Output(#[from] std::io::Error),
}
