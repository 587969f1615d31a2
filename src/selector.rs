//! Substring selection of registered tests.

/// Flag whose following token is the selection pattern.
pub const DEFAULT_SELECT_FLAG: &str = "-k";

/// Decides which registered tests run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    pattern: Option<String>,
}

impl Selector {
    pub fn new(pattern: Option<String>) -> Self {
        Self { pattern }
    }

    /// Selects every test.
    pub fn all() -> Self {
        Self::default()
    }

    /// Takes the token right after the first `flag` as the pattern.
    ///
    /// A missing flag, or a flag in last position, selects every test.
    pub fn from_args<S: AsRef<str>>(args: &[S], flag: &str) -> Self {
        let pattern = args
            .iter()
            .position(|arg| arg.as_ref() == flag)
            .and_then(|index| args.get(index + 1))
            .map(|value| value.as_ref().to_string());
        Self { pattern }
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Case-sensitive substring match on the test name.
    pub fn selects(&self, name: &str) -> bool {
        match &self.pattern {
            None => true,
            Some(pattern) => name.contains(pattern.as_str()),
        }
    }
}
