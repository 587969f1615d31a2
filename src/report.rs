//! Aggregated, read-only results of a run.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::case::{Category, Phase, TestCase, TestState};

/// Captured failure tagged with the test it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggedError {
    pub test: String,
    pub phase: Phase,
    pub kind: String,
    pub message: String,
}

/// Outcome line of one executed test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestLine {
    pub name: String,
    pub state: TestState,
    #[serde(serialize_with = "nanos")]
    pub setup: Option<Duration>,
    #[serde(serialize_with = "nanos")]
    pub test: Option<Duration>,
    #[serde(serialize_with = "nanos")]
    pub teardown: Option<Duration>,
}

impl TestLine {
    /// Snapshot of an executed case; `None` if it has no terminal state.
    pub fn from_case(case: &TestCase) -> Option<Self> {
        Some(Self {
            name: case.name().to_string(),
            state: case.state()?,
            setup: case.duration(Phase::Setup),
            test: case.duration(Phase::Test),
            teardown: case.duration(Phase::Teardown),
        })
    }

    pub fn duration(&self, phase: Phase) -> Option<Duration> {
        match phase {
            Phase::Setup => self.setup,
            Phase::Test => self.test,
            Phase::Teardown => self.teardown,
        }
    }
}

/// Number of tests per terminal state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateCounts {
    counts: BTreeMap<TestState, usize>,
}

impl StateCounts {
    pub fn record(&mut self, state: TestState) {
        *self.counts.entry(state).or_insert(0) += 1;
    }

    pub fn get(&self, state: TestState) -> usize {
        self.counts.get(&state).copied().unwrap_or(0)
    }

    /// Recorded states with their counts, in report order.
    pub fn iter(&self) -> impl Iterator<Item = (TestState, usize)> + '_ {
        self.counts.iter().map(|(state, count)| (*state, *count))
    }

    /// Sum over every state belonging to `category`.
    pub fn category(&self, category: Category) -> usize {
        TestState::ALL
            .iter()
            .filter(|state| state.category() == category)
            .map(|state| self.get(*state))
            .sum()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

impl Serialize for StateCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(TestState::ALL.len()))?;
        for state in TestState::ALL {
            map.serialize_entry(state.as_str(), &self.get(state))?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub registered: usize,
    pub matched: usize,
    pub ran: usize,
    pub pattern: Option<String>,
    pub counts: StateCounts,
    #[serde(serialize_with = "nanos")]
    pub registration_time: Option<Duration>,
    #[serde(serialize_with = "nanos")]
    pub execution_time: Option<Duration>,
    pub tests: Vec<TestLine>,
    pub errors: Vec<TaggedError>,
}

impl RunReport {
    pub fn count(&self, category: Category) -> usize {
        self.counts.category(category)
    }

    /// Share of executed tests in `category`, in percent.
    ///
    /// An empty run divides by one, so every category reads 0%.
    pub fn percentage(&self, category: Category) -> f64 {
        let denominator = self.ran.max(1) as f64;
        self.count(category) as f64 * 100.0 / denominator
    }

    /// True when no executed test failed or errored.
    pub fn is_success(&self) -> bool {
        self.count(Category::Fail) == 0 && self.count(Category::Error) == 0
    }
}

fn nanos<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(duration) => serializer.serialize_u64(duration.as_nanos() as u64),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_report() -> RunReport {
        RunReport {
            registered: 0,
            matched: 0,
            ran: 0,
            pattern: None,
            counts: StateCounts::default(),
            registration_time: None,
            execution_time: None,
            tests: vec![],
            errors: vec![],
        }
    }

    #[test]
    fn empty_run_has_zero_percentages() {
        let report = empty_report();
        for category in Category::ALL {
            assert_eq!(report.percentage(category), 0.0);
        }
        assert!(report.is_success());
    }

    #[test]
    fn error_states_collapse_into_one_category() {
        let mut counts = StateCounts::default();
        counts.record(TestState::SetupError);
        counts.record(TestState::TestTeardownError);
        counts.record(TestState::Pass);
        assert_eq!(counts.category(Category::Error), 2);
        assert_eq!(counts.get(TestState::SetupError), 1);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn counts_iterate_in_state_order() {
        let mut counts = StateCounts::default();
        counts.record(TestState::TestTeardownError);
        counts.record(TestState::Fail);
        counts.record(TestState::Pass);
        counts.record(TestState::Fail);
        let seen: Vec<_> = counts.iter().collect();
        assert_eq!(
            seen,
            vec![
                (TestState::Pass, 1),
                (TestState::Fail, 2),
                (TestState::TestTeardownError, 1)
            ]
        );
    }

    #[test]
    fn percentages_use_ran_count() {
        let mut report = empty_report();
        report.counts.record(TestState::Pass);
        report.counts.record(TestState::Fail);
        report.counts.record(TestState::Fail);
        report.counts.record(TestState::TestError);
        report.ran = 4;
        assert_eq!(report.percentage(Category::Fail), 50.0);
        assert_eq!(report.percentage(Category::Pass), 25.0);
        assert!(!report.is_success());
    }

    #[test]
    fn json_lists_every_state_and_uses_nanoseconds() {
        let mut report = empty_report();
        report.execution_time = Some(Duration::from_micros(3));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["execution_time"], 3000);
        assert!(json["registration_time"].is_null());
        assert_eq!(json["counts"]["test-teardown-error"], 0);
    }
}
