//! The assertion catalog available to test bodies.
//!
//! Each check returns `Ok(())` when it holds and `Err(Failure::Assertion)`
//! otherwise, so bodies chain them with `?`:
//!
//! ```rust
//! use testique::prelude::*;
//!
//! fn test_sum() -> Outcome {
//!     assert_equal(&(2 + 2), &4)?;
//!     assert_almost_equal(0.1 + 0.2, 0.3)?;
//!     Ok(())
//! }
//! # assert!(test_sum().is_ok());
//! ```
//!
//! A check that cannot even be evaluated (an invalid regex, for instance)
//! reports a defect instead of an assertion failure.

use std::any::Any;
use std::fmt::Debug;

use difference::{Changeset, Difference};
use regex::Regex;

use crate::failure::{capture, Failure, Outcome};

/// Decimal places used by [`assert_almost_equal`].
pub const DEFAULT_PLACES: u32 = 7;

// =============================================================================
// EQUALITY AND TRUTHINESS
// =============================================================================

pub fn assert_equal<T: PartialEq + Debug + ?Sized>(left: &T, right: &T) -> Outcome {
    if left == right {
        return Ok(());
    }
    Err(Failure::assertion(format!("{:?} != {:?}", left, right)))
}

pub fn assert_not_equal<T: PartialEq + Debug + ?Sized>(left: &T, right: &T) -> Outcome {
    if left != right {
        return Ok(());
    }
    Err(Failure::assertion(format!("{:?} == {:?}", left, right)))
}

pub fn assert_true(value: bool) -> Outcome {
    if value {
        return Ok(());
    }
    Err(Failure::assertion("false is not true"))
}

pub fn assert_false(value: bool) -> Outcome {
    if !value {
        return Ok(());
    }
    Err(Failure::assertion("true is not false"))
}

/// Compares two texts line by line; the failure message carries the diff.
pub fn assert_multiline_equal(expected: &str, actual: &str) -> Outcome {
    if expected == actual {
        return Ok(());
    }
    let changeset = Changeset::new(expected, actual, "\n");
    let mut message = String::from("texts differ:");
    for diff in &changeset.diffs {
        let (marker, block) = match diff {
            Difference::Same(x) => (' ', x),
            Difference::Add(x) => ('+', x),
            Difference::Rem(x) => ('-', x),
        };
        for line in block.split('\n') {
            message.push('\n');
            message.push(marker);
            message.push_str(line);
        }
    }
    Err(Failure::assertion(message))
}

// =============================================================================
// IDENTITY AND OPTIONALS
// =============================================================================

/// Passes when both references point at the same value.
pub fn assert_is<T: Debug + ?Sized>(left: &T, right: &T) -> Outcome {
    if std::ptr::eq(left, right) {
        return Ok(());
    }
    Err(Failure::assertion(format!("{:?} is not {:?}", left, right)))
}

pub fn assert_is_not<T: Debug + ?Sized>(left: &T, right: &T) -> Outcome {
    if !std::ptr::eq(left, right) {
        return Ok(());
    }
    Err(Failure::assertion(format!("unexpectedly identical: {:?}", left)))
}

pub fn assert_none<T: Debug>(value: &Option<T>) -> Outcome {
    match value {
        None => Ok(()),
        Some(v) => Err(Failure::assertion(format!("{:?} is not None", v))),
    }
}

pub fn assert_some<T: Debug>(value: &Option<T>) -> Outcome {
    match value {
        Some(_) => Ok(()),
        None => Err(Failure::assertion("unexpectedly None")),
    }
}

// =============================================================================
// MEMBERSHIP AND TYPES
// =============================================================================

pub fn assert_in<T: PartialEq + Debug>(member: &T, container: &[T]) -> Outcome {
    if container.contains(member) {
        return Ok(());
    }
    Err(Failure::assertion(format!(
        "{:?} not found in {:?}",
        member, container
    )))
}

pub fn assert_not_in<T: PartialEq + Debug>(member: &T, container: &[T]) -> Outcome {
    if !container.contains(member) {
        return Ok(());
    }
    Err(Failure::assertion(format!(
        "{:?} unexpectedly found in {:?}",
        member, container
    )))
}

/// Passes when `value` is a `T`.
pub fn assert_type<T: Any>(value: &dyn Any) -> Outcome {
    if value.is::<T>() {
        return Ok(());
    }
    Err(Failure::assertion(format!(
        "value is not an instance of {}",
        std::any::type_name::<T>()
    )))
}

pub fn assert_not_type<T: Any>(value: &dyn Any) -> Outcome {
    if !value.is::<T>() {
        return Ok(());
    }
    Err(Failure::assertion(format!(
        "value is an instance of {}",
        std::any::type_name::<T>()
    )))
}

// =============================================================================
// ORDERING AND CLOSENESS
// =============================================================================

pub fn assert_greater<T: PartialOrd + Debug>(left: &T, right: &T) -> Outcome {
    compare(left > right, left, ">", right)
}

pub fn assert_greater_equal<T: PartialOrd + Debug>(left: &T, right: &T) -> Outcome {
    compare(left >= right, left, ">=", right)
}

pub fn assert_less<T: PartialOrd + Debug>(left: &T, right: &T) -> Outcome {
    compare(left < right, left, "<", right)
}

pub fn assert_less_equal<T: PartialOrd + Debug>(left: &T, right: &T) -> Outcome {
    compare(left <= right, left, "<=", right)
}

fn compare<T: Debug>(holds: bool, left: &T, op: &str, right: &T) -> Outcome {
    if holds {
        return Ok(());
    }
    Err(Failure::assertion(format!(
        "expected {:?} {} {:?}",
        left, op, right
    )))
}

/// Passes when the operands are equal or `left - right` rounds to zero at
/// [`DEFAULT_PLACES`] decimals.
pub fn assert_almost_equal(left: f64, right: f64) -> Outcome {
    assert_almost_equal_places(left, right, DEFAULT_PLACES)
}

pub fn assert_almost_equal_places(left: f64, right: f64, places: u32) -> Outcome {
    if almost_equal(left, right, places) {
        return Ok(());
    }
    Err(Failure::assertion(format!(
        "{} != {} within {} places",
        left, right, places
    )))
}

pub fn assert_not_almost_equal(left: f64, right: f64) -> Outcome {
    if !almost_equal(left, right, DEFAULT_PLACES) {
        return Ok(());
    }
    Err(Failure::assertion(format!(
        "{} == {} within {} places",
        left, right, DEFAULT_PLACES
    )))
}

// Ties round to even.
fn almost_equal(left: f64, right: f64, places: u32) -> bool {
    left == right || ((left - right) * 10f64.powi(places as i32)).round_ties_even() == 0.0
}

// =============================================================================
// PATTERNS, RAISING, UNORDERED EQUALITY
// =============================================================================

/// Passes when `pattern` matches somewhere in `text`.
pub fn assert_matches(text: &str, pattern: &str) -> Outcome {
    let regex = Regex::new(pattern).map_err(Failure::defect)?;
    if regex.is_match(text) {
        return Ok(());
    }
    Err(Failure::assertion(format!(
        "pattern {:?} not found in {:?}",
        pattern, text
    )))
}

pub fn assert_not_matches(text: &str, pattern: &str) -> Outcome {
    let regex = Regex::new(pattern).map_err(Failure::defect)?;
    match regex.find(text) {
        None => Ok(()),
        Some(m) => Err(Failure::assertion(format!(
            "pattern {:?} unexpectedly matched {:?}",
            pattern,
            m.as_str()
        ))),
    }
}

/// Passes when `body` fails with a defect or panics.
///
/// An assertion failure inside `body` is not a raised defect and is returned
/// unchanged.
pub fn assert_raises<F>(body: F) -> Outcome
where
    F: FnOnce() -> Outcome,
{
    match capture(body) {
        Err(Failure::Defect { .. }) => Ok(()),
        Err(assertion) => Err(assertion),
        Ok(()) => Err(Failure::assertion("expected a failure, but none was raised")),
    }
}

/// Passes when `body` raises a defect whose kind is `kind`.
pub fn assert_raises_kind<F>(kind: &str, body: F) -> Outcome
where
    F: FnOnce() -> Outcome,
{
    match capture(body) {
        Err(failure @ Failure::Defect { .. }) if failure.kind() == kind => Ok(()),
        Err(Failure::Defect { kind: raised, .. }) => Err(Failure::assertion(format!(
            "expected {} to be raised, got {}",
            kind, raised
        ))),
        Err(assertion) => Err(assertion),
        Ok(()) => Err(Failure::assertion(format!("{} not raised", kind))),
    }
}

/// Passes when both slices hold the same elements, ignoring order.
pub fn assert_count_equal<T: PartialEq + Debug>(left: &[T], right: &[T]) -> Outcome {
    let mut unmatched: Vec<&T> = right.iter().collect();
    let mut missing = Vec::new();
    for item in left {
        match unmatched.iter().position(|candidate| *candidate == item) {
            Some(index) => {
                unmatched.swap_remove(index);
            }
            None => missing.push(item),
        }
    }
    if missing.is_empty() && unmatched.is_empty() {
        return Ok(());
    }
    Err(Failure::assertion(format!(
        "element counts differ: only in first {:?}, only in second {:?}",
        missing, unmatched
    )))
}

/// Unconditional assertion failure.
pub fn fail(message: impl Into<String>) -> Outcome {
    Err(Failure::assertion(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_checks() {
        assert!(assert_equal(&1, &1).is_ok());
        assert!(assert_equal("a", "b").unwrap_err().is_assertion());
        assert!(assert_not_equal(&1, &2).is_ok());
        assert!(assert_not_equal(&1, &1).is_err());
    }

    #[test]
    fn truthiness() {
        assert!(assert_true(true).is_ok());
        assert!(assert_true(false).is_err());
        assert!(assert_false(false).is_ok());
        assert!(assert_false(true).is_err());
    }

    #[test]
    fn identity_is_by_address() {
        let a = String::from("x");
        let b = String::from("x");
        assert!(assert_is(&a, &a).is_ok());
        assert!(assert_is(&a, &b).is_err());
        assert!(assert_is_not(&a, &b).is_ok());
    }

    #[test]
    fn optionals() {
        assert!(assert_none::<i32>(&None).is_ok());
        assert!(assert_none(&Some(3)).is_err());
        assert!(assert_some(&Some(3)).is_ok());
    }

    #[test]
    fn membership() {
        assert!(assert_in(&2, &[1, 2, 3]).is_ok());
        assert!(assert_in(&9, &[1, 2, 3]).is_err());
        assert!(assert_not_in(&9, &[1, 2, 3]).is_ok());
    }

    #[test]
    fn type_checks() {
        let value: Box<dyn Any> = Box::new(5u8);
        assert!(assert_type::<u8>(value.as_ref()).is_ok());
        assert!(assert_type::<i64>(value.as_ref()).is_err());
        assert!(assert_not_type::<String>(value.as_ref()).is_ok());
    }

    #[test]
    fn ordering() {
        assert!(assert_greater(&3, &2).is_ok());
        assert!(assert_greater(&2, &2).is_err());
        assert!(assert_greater_equal(&2, &2).is_ok());
        assert!(assert_less(&1, &2).is_ok());
        assert!(assert_less_equal(&3, &2).is_err());
    }

    #[test]
    fn closeness_uses_decimal_places() {
        assert!(assert_almost_equal(6.666666677, 6.666666666699).is_ok());
        assert!(assert_almost_equal(1.0, 1.0001).is_err());
        assert!(assert_almost_equal_places(1.0, 1.04, 1).is_ok());
        assert!(assert_not_almost_equal(1.0, 1.1).is_ok());
    }

    #[test]
    fn equal_infinities_are_almost_equal() {
        assert!(assert_almost_equal(f64::INFINITY, f64::INFINITY).is_ok());
        assert!(assert_not_almost_equal(f64::NEG_INFINITY, f64::NEG_INFINITY).is_err());
        assert!(assert_almost_equal(f64::INFINITY, f64::NEG_INFINITY).is_err());
        assert!(assert_almost_equal(f64::NAN, f64::NAN).is_err());
    }

    #[test]
    fn half_way_differences_round_to_even() {
        assert!(assert_almost_equal_places(1.5, 1.0, 0).is_ok());
        assert!(assert_almost_equal_places(2.5, 1.0, 0).is_err());
    }

    #[test]
    fn invalid_pattern_is_a_defect() {
        assert!(assert_matches("abc", "b+").is_ok());
        assert!(assert_matches("abc", "^z").unwrap_err().is_assertion());
        assert!(!assert_matches("abc", "(").unwrap_err().is_assertion());
        assert!(assert_not_matches("abc", "z").is_ok());
    }

    #[test]
    fn raises_accepts_defects_and_panics() {
        assert!(assert_raises(|| Err("boom".into())).is_ok());
        assert!(assert_raises(|| panic!("boom")).is_ok());
        assert!(assert_raises(|| Ok(())).unwrap_err().is_assertion());
        assert!(assert_raises(|| fail("inner")).unwrap_err().is_assertion());
    }

    #[test]
    fn raises_kind_checks_the_kind() {
        assert!(assert_raises_kind("NameError", || Err(Failure::raised("NameError", "x"))).is_ok());
        assert!(assert_raises_kind("NameError", || Err("x".into())).is_err());
    }

    #[test]
    fn count_equal_ignores_order() {
        assert!(assert_count_equal(&[1, 2, 2, 3], &[2, 3, 1, 2]).is_ok());
        assert!(assert_count_equal(&[1, 2], &[1, 2, 2]).is_err());
        assert!(assert_count_equal::<i32>(&[], &[]).is_ok());
    }

    #[test]
    fn multiline_diff_marks_changed_lines() {
        assert!(assert_multiline_equal("a\nb", "a\nb").is_ok());
        let message = assert_multiline_equal("a\nb\nc", "a\nx\nc")
            .unwrap_err()
            .to_string();
        assert!(message.contains("-b"));
        assert!(message.contains("+x"));
    }
}
