//! Test registration.
//!
//! Tests are registered explicitly through [`RegistryBuilder`]. A
//! [`Namespace`] of named bindings can be scanned into a builder using a
//! [`NamingConvention`]: every callable named `<test prefix><name>` becomes a
//! test called `<name>`, bound to `<setup prefix><name>` and
//! `<teardown prefix><name>` when those exist. Everything else in the
//! namespace is ignored, so helpers can live next to the tests.

use std::any::Any;
use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::case::{Action, TestCase};
use crate::error::EngineError;
use crate::failure::Outcome;
use crate::timer::Timer;

const REGISTRATION_LABEL: &str = "registration";

// =============================================================================
// NAMESPACE
// =============================================================================

/// A value bound to a name in a [`Namespace`].
pub enum Binding {
    Action(Action),
    Value(Box<dyn Any>),
}

/// An ordered mapping of names to bindings.
///
/// Names are unique; binding an existing name replaces its binding in place,
/// keeping its original position.
#[derive(Default)]
pub struct Namespace {
    entries: Vec<(String, Binding)>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: impl Into<String>, binding: Binding) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = binding,
            None => self.entries.push((name, binding)),
        }
    }

    pub fn action<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: FnMut() -> Outcome + 'static,
    {
        self.bind(name, Binding::Action(Box::new(action)));
        self
    }

    pub fn value<T: Any>(mut self, name: impl Into<String>, value: T) -> Self {
        self.bind(name, Binding::Value(Box::new(value)));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

/// Name prefixes tying tests to their setup and teardown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConvention {
    pub test_prefix: String,
    pub setup_prefix: String,
    pub teardown_prefix: String,
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self {
            test_prefix: "test_".to_string(),
            setup_prefix: "setup_".to_string(),
            teardown_prefix: "teardown_".to_string(),
        }
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Collects test cases; the time between `new` and `build` is the
/// registration time.
#[derive(Debug)]
pub struct RegistryBuilder {
    cases: Vec<TestCase>,
    timer: Timer,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        let mut timer = Timer::new();
        timer.start(REGISTRATION_LABEL);
        Self {
            cases: Vec::new(),
            timer,
        }
    }

    /// Adds a case. Names must be unique.
    pub fn register(&mut self, case: TestCase) -> Result<&mut Self, EngineError> {
        if self.contains(case.name()) {
            warn!(test = case.name(), "duplicate test name rejected");
            return Err(EngineError::DuplicateTest {
                name: case.name().to_string(),
            });
        }
        debug!(
            test = case.name(),
            setup = case.has_setup(),
            teardown = case.has_teardown(),
            "registered test"
        );
        self.cases.push(case);
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cases.iter().any(|case| case.name() == name)
    }

    /// Registers every test found in `namespace`, in namespace order.
    pub fn scan(mut self, namespace: Namespace, convention: &NamingConvention) -> Self {
        let mut actions: HashMap<String, Action> = HashMap::new();
        let mut tests = Vec::new();
        for (name, binding) in namespace.entries {
            let is_test = name.starts_with(&convention.test_prefix);
            match binding {
                Binding::Action(action) => {
                    if is_test {
                        tests.push(name.clone());
                    }
                    actions.insert(name, action);
                }
                Binding::Value(_) if is_test => {
                    warn!(name = %name, "test-prefixed binding is not callable, skipping");
                }
                Binding::Value(_) => {}
            }
        }

        for full_name in tests {
            let Some(test) = actions.remove(&full_name) else {
                continue;
            };
            let bare = &full_name[convention.test_prefix.len()..];
            let setup = actions.remove(&format!("{}{}", convention.setup_prefix, bare));
            let teardown = actions.remove(&format!("{}{}", convention.teardown_prefix, bare));
            let case = TestCase::from_actions(bare, test, setup, teardown);
            if let Err(e) = self.register(case) {
                warn!(error = %e, "skipping test");
            }
        }
        self
    }

    pub fn build(mut self) -> TestRegistry {
        let registration_time = self.timer.stop(REGISTRATION_LABEL);
        TestRegistry {
            cases: self.cases,
            registration_time,
        }
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// The fixed set of tests for one run, in registration order.
#[derive(Debug)]
pub struct TestRegistry {
    cases: Vec<TestCase>,
    registration_time: Option<Duration>,
}

impl TestRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Scans `namespace` with `convention` and builds the registry, timed.
    pub fn register(namespace: Namespace, convention: &NamingConvention) -> Self {
        RegistryBuilder::new().scan(namespace, convention).build()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&TestCase> {
        self.cases.iter().find(|case| case.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestCase> {
        self.cases.iter()
    }

    pub(crate) fn at(&self, index: usize) -> Option<&TestCase> {
        self.cases.get(index)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TestCase> {
        self.cases.iter_mut()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cases.iter().map(|case| case.name())
    }

    pub fn registration_time(&self) -> Option<Duration> {
        self.registration_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok() -> Outcome {
        Ok(())
    }

    #[test]
    fn scan_binds_setup_and_teardown_by_name() {
        let namespace = Namespace::new()
            .action("setup_bar", ok)
            .action("test_foo", ok)
            .action("test_bar", ok)
            .action("teardown_bar", ok)
            .action("read_file", ok)
            .value("test_constant", 42);
        let registry = TestRegistry::register(namespace, &NamingConvention::default());

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["foo", "bar"]);
        let bar = registry.get("bar").unwrap();
        assert!(bar.has_setup() && bar.has_teardown());
        let foo = registry.get("foo").unwrap();
        assert!(!foo.has_setup() && !foo.has_teardown());
        assert!(registry.registration_time().is_some());
    }

    #[test]
    fn orphan_setup_is_ignored() {
        let namespace = Namespace::new().action("setup_lonely", ok);
        let registry = TestRegistry::register(namespace, &NamingConvention::default());
        assert!(registry.is_empty());
    }

    #[test]
    fn rebinding_keeps_position() {
        let mut namespace = Namespace::new().action("test_a", ok).action("test_b", ok);
        namespace.bind("test_a", Binding::Value(Box::new(())));
        assert_eq!(namespace.names().collect::<Vec<_>>(), vec!["test_a", "test_b"]);
        let registry = TestRegistry::register(namespace, &NamingConvention::default());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn custom_prefixes() {
        let convention = NamingConvention {
            test_prefix: "check_".into(),
            setup_prefix: "before_".into(),
            teardown_prefix: "after_".into(),
        };
        let namespace = Namespace::new()
            .action("check_x", ok)
            .action("before_x", ok)
            .action("test_y", ok);
        let registry = TestRegistry::register(namespace, &convention);
        assert_eq!(registry.len(), 1);
        assert!(registry.get("x").unwrap().has_setup());
    }

    #[test]
    fn builder_rejects_duplicates() {
        let mut builder = TestRegistry::builder();
        builder.register(TestCase::new("same", ok)).unwrap();
        let err = builder.register(TestCase::new("same", ok)).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateTest { ref name } if name == "same"));
        assert_eq!(builder.build().len(), 1);
    }
}
