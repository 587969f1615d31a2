//! Orchestrates a run: selection, sequential execution and aggregation.

use std::time::Duration;

use tracing::{debug, info};

use crate::case::{Category, TestCase};
use crate::registry::TestRegistry;
use crate::report::{RunReport, StateCounts, TaggedError, TestLine};
use crate::selector::Selector;
use crate::timer::Timer;

const EXECUTION_LABEL: &str = "execution";

/// Runs one registry once and aggregates what it ran.
///
/// Only cases selected by this executioner are counted, even if other
/// registered cases already carry a state.
pub struct Executioner {
    registry: TestRegistry,
    selector: Selector,
    timer: Timer,
    /// Registry indices of the selected cases, in execution order.
    selected: Vec<usize>,
    errors: Vec<TaggedError>,
    execution_time: Option<Duration>,
    finished: bool,
}

impl Executioner {
    pub fn new(registry: TestRegistry, selector: Selector) -> Self {
        Self {
            registry,
            selector,
            timer: Timer::new(),
            selected: Vec::new(),
            errors: Vec::new(),
            execution_time: None,
            finished: false,
        }
    }

    pub fn registry(&self) -> &TestRegistry {
        &self.registry
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Runs every selected test in registration order.
    ///
    /// Rejected tests are neither timed nor executed. Captured errors are
    /// appended to the run-wide list in execution order. A second call does
    /// nothing.
    pub fn run(&mut self) {
        if self.finished {
            return;
        }
        self.timer.start(EXECUTION_LABEL);
        for (index, case) in self.registry.iter_mut().enumerate() {
            if !self.selector.selects(case.name()) {
                debug!(test = case.name(), "not selected");
                continue;
            }
            self.selected.push(index);
            case.execute(&mut self.timer);
            self.errors.extend(tag_errors(case));
        }
        self.execution_time = self.timer.stop(EXECUTION_LABEL);
        self.finished = true;

        info!(
            registered = self.registry.len(),
            matched = self.selected.len(),
            errors = self.errors.len(),
            elapsed = ?self.execution_time,
            "run finished"
        );
    }

    /// Counts executed tests by terminal state and snapshots the results.
    pub fn aggregate(&self) -> RunReport {
        let mut counts = StateCounts::default();
        let mut tests = Vec::new();
        let cases = self.selected.iter().filter_map(|&index| self.registry.at(index));
        for line in cases.filter_map(TestLine::from_case) {
            counts.record(line.state);
            tests.push(line);
        }
        let ran = counts.total();
        debug!(
            ran,
            pass = counts.category(Category::Pass),
            fail = counts.category(Category::Fail),
            error = counts.category(Category::Error),
            "aggregated"
        );

        RunReport {
            registered: self.registry.len(),
            matched: self.selected.len(),
            ran,
            pattern: self.selector.pattern().map(str::to_string),
            counts,
            registration_time: self.registry.registration_time(),
            execution_time: self.execution_time,
            tests,
            errors: self.errors.clone(),
        }
    }
}

fn tag_errors(case: &TestCase) -> impl Iterator<Item = TaggedError> + '_ {
    case.errors().iter().map(move |captured| TaggedError {
        test: case.name().to_string(),
        phase: captured.phase,
        kind: captured.failure.kind().to_string(),
        message: captured.failure.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::TestState;

    #[test]
    fn cases_executed_elsewhere_are_not_aggregated() {
        let mut stale = TestCase::new("stale", || Err("old failure".into()));
        stale.execute(&mut Timer::new());
        assert_eq!(stale.state(), Some(TestState::TestError));

        let mut builder = TestRegistry::builder();
        builder.register(stale).unwrap();
        builder.register(TestCase::new("fresh", || Ok(()))).unwrap();
        let mut exec = Executioner::new(builder.build(), Selector::new(Some("fresh".into())));
        exec.run();
        let report = exec.aggregate();

        assert_eq!(report.registered, 2);
        assert_eq!(report.matched, 1);
        assert_eq!(report.ran, 1);
        assert_eq!(report.tests.len(), 1);
        assert_eq!(report.tests[0].name, "fresh");
        assert!(report.errors.is_empty());
        assert!(report.is_success());
    }

    #[test]
    fn aggregate_before_run_is_empty() {
        let mut builder = TestRegistry::builder();
        builder.register(TestCase::new("a", || Ok(()))).unwrap();
        let exec = Executioner::new(builder.build(), Selector::all());
        let report = exec.aggregate();
        assert_eq!(report.ran, 0);
        assert_eq!(report.execution_time, None);
    }
}
