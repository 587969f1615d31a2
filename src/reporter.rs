//! Renders a [`RunReport`] as colored text or JSON.
//!
//! The text report has three parts: an intro with the registered, matched and
//! ran counts and the registration/execution times, one line per executed
//! test, and an outro with per-category counts, percentages and the list of
//! captured errors.

use std::io::{self, Write};
use std::time::Duration;

use termcolor::{Buffer, Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use unicode_width::UnicodeWidthStr;

use crate::case::{Category, Phase, TestState};
use crate::config::OutputFormat;
use crate::error::EngineError;
use crate::report::RunReport;

// Width of the longest state label, "test-teardown-error".
const STATE_WIDTH: usize = 19;

#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    use_colors: bool,
}

impl Reporter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Renders the text report into a string.
    pub fn render(&self, report: &RunReport) -> String {
        let mut buffer = if self.use_colors {
            Buffer::ansi()
        } else {
            Buffer::no_color()
        };
        // In-memory writes cannot fail.
        let _ = self.write_text(&mut buffer, report);
        String::from_utf8_lossy(buffer.as_slice()).into_owned()
    }

    pub fn render_json(&self, report: &RunReport) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    /// Writes the report to stdout in the requested format.
    pub fn print(&self, report: &RunReport, format: OutputFormat) -> Result<(), EngineError> {
        match format {
            OutputFormat::Json => {
                let json = self.render_json(report)?;
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{}", json)?;
            }
            OutputFormat::Text => {
                let choice = if self.use_colors {
                    ColorChoice::Always
                } else {
                    ColorChoice::Never
                };
                let mut stdout = StandardStream::stdout(choice);
                self.write_text(&mut stdout, report)?;
            }
        }
        Ok(())
    }

    pub fn write_text<W: WriteColor>(&self, out: &mut W, report: &RunReport) -> io::Result<()> {
        self.write_intro(out, report)?;
        self.write_tests(out, report)?;
        self.write_outro(out, report)
    }

    // =========================================================================
    // SECTIONS
    // =========================================================================

    fn write_intro<W: WriteColor>(&self, out: &mut W, report: &RunReport) -> io::Result<()> {
        out.set_color(ColorSpec::new().set_bold(true))?;
        write!(out, "testique")?;
        out.reset()?;
        write!(out, ": {} registered, {} matched", report.registered, report.matched)?;
        match &report.pattern {
            Some(pattern) => write!(out, " by pattern '{}'", pattern)?,
            None => write!(out, " (no pattern)")?,
        }
        writeln!(out, ", {} ran", report.ran)?;
        writeln!(
            out,
            "registration: {} | execution: {}",
            format_duration(report.registration_time),
            format_duration(report.execution_time)
        )?;
        writeln!(out)
    }

    fn write_tests<W: WriteColor>(&self, out: &mut W, report: &RunReport) -> io::Result<()> {
        let width = report
            .tests
            .iter()
            .map(|line| line.name.width())
            .max()
            .unwrap_or(0);

        for line in &report.tests {
            out.set_color(&state_spec(line.state))?;
            write!(out, "{:<width$}", line.state.as_str().to_uppercase(), width = STATE_WIDTH)?;
            out.reset()?;
            write!(out, " {}", line.name)?;
            let padding = width - line.name.width();
            write!(out, "{}", " ".repeat(padding))?;
            for phase in Phase::ALL {
                if let Some(duration) = line.duration(phase) {
                    write!(out, "  {} {:.2?}", phase, duration)?;
                }
            }
            writeln!(out)?;
        }
        if !report.tests.is_empty() {
            writeln!(out)?;
        }
        Ok(())
    }

    fn write_outro<W: WriteColor>(&self, out: &mut W, report: &RunReport) -> io::Result<()> {
        for category in Category::ALL {
            out.set_color(&category_spec(category))?;
            write!(out, "{:<6}", category.as_str())?;
            out.reset()?;
            writeln!(
                out,
                "{:>4}  {:>6.2}%",
                report.count(category),
                report.percentage(category)
            )?;
        }

        if report.errors.is_empty() {
            return Ok(());
        }
        writeln!(out)?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        writeln!(out, "Errors:")?;
        out.reset()?;
        for error in &report.errors {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
            write!(out, "{}", error.kind)?;
            out.reset()?;
            writeln!(out, " in test '{}': {}", error.test, error.message)?;
        }
        Ok(())
    }
}

fn category_spec(category: Category) -> ColorSpec {
    let color = match category {
        Category::Pass => Color::Green,
        Category::Fail => Color::Yellow,
        Category::Error => Color::Red,
    };
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(color)).set_bold(true);
    spec
}

fn state_spec(state: TestState) -> ColorSpec {
    category_spec(state.category())
}

fn format_duration(duration: Option<Duration>) -> String {
    match duration {
        Some(d) => format!("{:.2?}", d),
        None => "-".to_string(),
    }
}
