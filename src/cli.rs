//! Command-line front end for suites built on the engine.
//!
//! A suite binary builds its [`Namespace`] and hands it to [`run`], which
//! parses the command line, loads configuration, executes the selected tests
//! and prints the report.

use std::path::PathBuf;
use std::panic;
use std::process::ExitCode;
use std::sync::Once;

use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::{EngineConfig, Executioner, Namespace, OutputFormat, Reporter, Selector, TestRegistry};

static PANIC_HOOK_INIT: Once = Once::new();

// ============================================================================
// CLI ARGUMENTS
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "testique",
    version,
    about = "Runs registered tests through setup, test and teardown and reports per-phase timings."
)]
pub struct TestiqueArgs {
    /// Only run tests whose name contains PATTERN. Without a value, runs everything.
    #[arg(short = 'k', long = "select", value_name = "PATTERN", num_args = 0..=1)]
    pub select: Option<Option<String>>,

    /// YAML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Disable ANSI colors.
    #[arg(long)]
    pub no_color: bool,

    /// Print the registered test names and exit.
    #[arg(long)]
    pub list: bool,

    /// Remaining arguments, searched for the configured `select_flag` when
    /// `-k` is not given.
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        hide = true
    )]
    pub rest: Vec<String>,
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Parses `std::env::args` and runs `namespace`.
pub fn run(namespace: Namespace) -> miette::Result<ExitCode> {
    run_with(TestiqueArgs::parse(), namespace)
}

/// Exit status is failure when any executed test failed or errored.
pub fn run_with(args: TestiqueArgs, namespace: Namespace) -> miette::Result<ExitCode> {
    init_tracing();
    install_panic_hook();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if args.no_color {
        config.use_colors = false;
    }
    if let Some(format) = args.format {
        config.format = format;
    }

    let registry = TestRegistry::register(namespace, &config.naming);
    if args.list {
        for name in registry.names() {
            println!("{}", name);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let selector = selector_for(&args, &config);
    let mut executioner = Executioner::new(registry, selector);
    executioner.run();
    let report = executioner.aggregate();
    Reporter::new(config.use_colors).print(&report, config.format)?;

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// `-k/--select` wins; otherwise the configured flag is looked up in the
/// trailing arguments.
fn selector_for(args: &TestiqueArgs, config: &EngineConfig) -> Selector {
    if let Some(pattern) = &args.select {
        return Selector::new(pattern.clone());
    }
    let selector = Selector::from_args(&args.rest, &config.select_flag);
    if selector.pattern().is_none() && !args.rest.is_empty() {
        warn!(args = ?args.rest, flag = %config.select_flag, "ignoring unrecognized arguments");
    }
    selector
}

/// Panics inside test bodies are reported as `panic` errors, so the default
/// hook's stderr message is replaced by a debug event.
fn install_panic_hook() {
    PANIC_HOOK_INIT.call_once(|| {
        panic::set_hook(Box::new(|info| {
            debug!(%info, "panic caught");
        }));
    });
}

/// Logs go to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_select_flag_parses_to_no_pattern() {
        let args = TestiqueArgs::parse_from(["testique", "-k"]);
        assert_eq!(args.select, Some(None));
        assert_eq!(Selector::new(args.select.flatten()).pattern(), None);
    }

    fn config_with_flag(flag: &str) -> EngineConfig {
        EngineConfig {
            select_flag: flag.to_string(),
            use_colors: false,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn configured_flag_is_read_from_trailing_args() {
        let args = TestiqueArgs::parse_from(["testique", "--config", "c.yaml", "--only", "foo"]);
        assert_eq!(args.rest, vec!["--only", "foo"]);
        let selector = selector_for(&args, &config_with_flag("--only"));
        assert_eq!(selector.pattern(), Some("foo"));
    }

    #[test]
    fn configured_flag_in_last_position_selects_everything() {
        let args = TestiqueArgs::parse_from(["testique", "--only"]);
        assert_eq!(selector_for(&args, &config_with_flag("--only")).pattern(), None);
    }

    #[test]
    fn short_select_flag_takes_precedence() {
        let args = TestiqueArgs::parse_from(["testique", "-k", "bar", "--only", "foo"]);
        let selector = selector_for(&args, &config_with_flag("--only"));
        assert_eq!(selector.pattern(), Some("bar"));
    }

    #[test]
    fn select_flag_with_value() {
        let args = TestiqueArgs::parse_from(["testique", "--select", "foo", "--format", "json"]);
        assert_eq!(args.select, Some(Some("foo".to_string())));
        assert_eq!(args.format, Some(OutputFormat::Json));
    }
}
