//! Testique: a minimal test-execution engine.
//!
//! Tests are registered (explicitly or by scanning a [`Namespace`] for
//! `test_*`, `setup_*` and `teardown_*` bindings), filtered by a substring
//! [`Selector`], executed one by one through setup → test → teardown by the
//! [`Executioner`], and summarized in a [`RunReport`] that the [`Reporter`]
//! renders.
//!
//! ```rust
//! use testique::prelude::*;
//! use testique::{EngineConfig, Namespace};
//!
//! let namespace = Namespace::new()
//!     .action("test_math", || assert_equal(&(1 + 1), &2))
//!     .action("test_broken", || fail("not yet"));
//! let mut config = EngineConfig::default();
//! config.use_colors = false;
//! let report = testique::execute(namespace, &["-k", "math"], &config);
//! assert_eq!(report.ran, 1);
//! assert!(report.is_success());
//! ```

pub mod assertions;
pub mod case;
pub mod cli;
pub mod config;
pub mod error;
pub mod executioner;
pub mod failure;
pub mod registry;
pub mod report;
pub mod reporter;
pub mod selector;
pub mod timer;

pub use crate::case::{Category, Phase, TestCase, TestState};
pub use crate::config::{EngineConfig, OutputFormat};
pub use crate::error::EngineError;
pub use crate::executioner::Executioner;
pub use crate::failure::{Failure, Outcome};
pub use crate::registry::{Binding, Namespace, NamingConvention, RegistryBuilder, TestRegistry};
pub use crate::report::{RunReport, TaggedError};
pub use crate::reporter::Reporter;
pub use crate::selector::Selector;
pub use crate::timer::Timer;

/// What test bodies usually need.
pub mod prelude {
    pub use crate::assertions::*;
    pub use crate::failure::{Failure, Outcome};
}

/// Registers `namespace`, selects from raw invocation `args`, runs and
/// aggregates. Nothing is printed.
pub fn execute<S: AsRef<str>>(namespace: Namespace, args: &[S], config: &EngineConfig) -> RunReport {
    let registry = TestRegistry::register(namespace, &config.naming);
    let selector = Selector::from_args(args, &config.select_flag);
    let mut executioner = Executioner::new(registry, selector);
    executioner.run();
    executioner.aggregate()
}

/// Like [`execute`], then prints the report to stdout in the configured format.
pub fn run<S: AsRef<str>>(
    namespace: Namespace,
    args: &[S],
    config: &EngineConfig,
) -> Result<RunReport, EngineError> {
    let report = execute(namespace, args, config);
    Reporter::new(config.use_colors).print(&report, config.format)?;
    Ok(report)
}
