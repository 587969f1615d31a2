//! A single registered test and its setup → test → teardown lifecycle.
//!
//! # State machine
//!
//! A [`TestCase`] starts without a state and resolves to exactly one
//! [`TestState`] the first time it is executed:
//!
//! 1. **Setup** (optional). A failure is captured, the state becomes
//!    `setup-error`, and both remaining phases are skipped.
//! 2. **Test**. Success gives `pass`, an assertion failure gives `fail`
//!    (not captured), any other failure is captured and gives `test-error`.
//! 3. **Teardown** (optional). A failure is captured and turns `test-error`
//!    into `test-teardown-error`, and `pass`/`fail` into `teardown-error`.
//!
//! A phase's duration is recorded iff the phase ran. Executing a test that
//! already has a state does nothing.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::failure::{capture, Failure, Outcome};
use crate::timer::{phase_label, Timer};

/// A zero-argument body: setup, test or teardown.
pub type Action = Box<dyn FnMut() -> Outcome>;

// =============================================================================
// STATES AND PHASES
// =============================================================================

/// Terminal classification of an executed test.
///
/// Ordered the way reports list states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestState {
    /// Every phase that ran succeeded.
    Pass,
    /// The test body failed an assertion; teardown (if any) succeeded.
    Fail,
    /// Setup failed; test and teardown were skipped.
    SetupError,
    /// The test body failed with something other than an assertion.
    TestError,
    /// The test passed or failed, then teardown failed.
    TeardownError,
    /// Both the test body and teardown failed with errors.
    TestTeardownError,
}

/// Reporting bucket a state belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Pass,
    Fail,
    /// Any of the four error states.
    Error,
}

impl TestState {
    pub const ALL: [TestState; 6] = [
        TestState::Pass,
        TestState::Fail,
        TestState::SetupError,
        TestState::TestError,
        TestState::TeardownError,
        TestState::TestTeardownError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TestState::Pass => "pass",
            TestState::Fail => "fail",
            TestState::SetupError => "setup-error",
            TestState::TestError => "test-error",
            TestState::TeardownError => "teardown-error",
            TestState::TestTeardownError => "test-teardown-error",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            TestState::Pass => Category::Pass,
            TestState::Fail => Category::Fail,
            _ => Category::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.category() == Category::Error
    }
}

impl fmt::Display for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Pass, Category::Fail, Category::Error];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Pass => "pass",
            Category::Fail => "fail",
            Category::Error => "error",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of the lifecycle. The discriminant indexes per-phase storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Setup,
    Test,
    Teardown,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Setup, Phase::Test, Phase::Teardown];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::Test => "test",
            Phase::Teardown => "teardown",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure captured during one phase of a test.
#[derive(Debug)]
pub struct CapturedError {
    pub phase: Phase,
    pub failure: Failure,
}

// =============================================================================
// TEST CASE
// =============================================================================

/// A named test body with optional setup and teardown actions.
///
/// Holds its own results once executed: the terminal state, the duration of
/// each phase that ran and the errors captured along the way.
pub struct TestCase {
    /// Name without the test prefix, unique within a registry.
    name: String,
    test: Action,
    setup: Option<Action>,
    teardown: Option<Action>,
    state: Option<TestState>,
    durations: [Option<Duration>; 3],
    errors: Vec<CapturedError>,
}

impl TestCase {
    pub fn new<F>(name: impl Into<String>, test: F) -> Self
    where
        F: FnMut() -> Outcome + 'static,
    {
        Self::from_actions(name, Box::new(test), None, None)
    }

    pub(crate) fn from_actions(
        name: impl Into<String>,
        test: Action,
        setup: Option<Action>,
        teardown: Option<Action>,
    ) -> Self {
        Self {
            name: name.into(),
            test,
            setup,
            teardown,
            state: None,
            durations: [None; 3],
            errors: Vec::new(),
        }
    }

    pub fn with_setup<F>(mut self, setup: F) -> Self
    where
        F: FnMut() -> Outcome + 'static,
    {
        self.setup = Some(Box::new(setup));
        self
    }

    pub fn with_teardown<F>(mut self, teardown: F) -> Self
    where
        F: FnMut() -> Outcome + 'static,
    {
        self.teardown = Some(Box::new(teardown));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `None` until the test has been executed.
    pub fn state(&self) -> Option<TestState> {
        self.state
    }

    pub fn duration(&self, phase: Phase) -> Option<Duration> {
        self.durations[phase as usize]
    }

    pub fn errors(&self) -> &[CapturedError] {
        &self.errors
    }

    pub fn has_setup(&self) -> bool {
        self.setup.is_some()
    }

    pub fn has_teardown(&self) -> bool {
        self.teardown.is_some()
    }

    /// Runs the lifecycle once; later calls are no-ops.
    pub fn execute(&mut self, timer: &mut Timer) {
        if self.state.is_some() {
            return;
        }

        if let Some(setup) = self.setup.as_mut() {
            let outcome = run_phase(&self.name, Phase::Setup, setup, timer, &mut self.durations);
            if let Err(failure) = outcome {
                self.capture_error(Phase::Setup, failure);
                self.state = Some(TestState::SetupError);
                return;
            }
        }

        let outcome = run_phase(
            &self.name,
            Phase::Test,
            &mut self.test,
            timer,
            &mut self.durations,
        );
        let mut state = match outcome {
            Ok(()) => TestState::Pass,
            Err(Failure::Assertion { message }) => {
                debug!(test = %self.name, %message, "assertion failed");
                TestState::Fail
            }
            Err(failure) => {
                self.capture_error(Phase::Test, failure);
                TestState::TestError
            }
        };

        if let Some(teardown) = self.teardown.as_mut() {
            let outcome = run_phase(
                &self.name,
                Phase::Teardown,
                teardown,
                timer,
                &mut self.durations,
            );
            if let Err(failure) = outcome {
                self.capture_error(Phase::Teardown, failure);
                state = match state {
                    TestState::TestError => TestState::TestTeardownError,
                    _ => TestState::TeardownError,
                };
            }
        }

        self.state = Some(state);
    }

    fn capture_error(&mut self, phase: Phase, failure: Failure) {
        debug!(test = %self.name, %phase, kind = failure.kind(), "captured failure");
        self.errors.push(CapturedError { phase, failure });
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("has_setup", &self.has_setup())
            .field("has_teardown", &self.has_teardown())
            .field("state", &self.state)
            .field("durations", &self.durations)
            .field("errors", &self.errors)
            .finish()
    }
}

/// Times one body under `"<test>-<phase>"` and records its duration.
fn run_phase(
    test: &str,
    phase: Phase,
    action: &mut Action,
    timer: &mut Timer,
    durations: &mut [Option<Duration>; 3],
) -> Outcome {
    let label = phase_label(test, phase.as_str());
    debug!(test, %phase, "phase started");
    timer.start(label.as_str());
    let outcome = capture(|| action());
    durations[phase as usize] = timer.stop(&label);
    debug!(test, %phase, ok = outcome.is_ok(), "phase finished");
    outcome
}
