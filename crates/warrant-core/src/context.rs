// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Contextual constraints on access control entries.
//!
//! An entry may declare constraints over the caller-supplied context map
//! (`key -> values`). The entry applies only when every declared key is
//! present and every constraint evaluates true; otherwise it is skipped.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Runtime context supplied with an authorization request.
pub type AccessControlContext = HashMap<String, Vec<String>>;

/// How a context entry compares its declared values with the supplied ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchType {
	/// Exactly one supplied value, equal to the first declared value.
	Equals,
	/// Every supplied value is one of the declared values.
	In,
	/// Every supplied value contains the first declared value.
	Like,
	/// The first declared value is not among the supplied values.
	NotEqual,
	/// No supplied value is one of the declared values.
	NotIn,
	/// Any match type this build does not know. Never matches.
	#[serde(other)]
	Unknown,
}

/// One constraint an entry imposes on the request context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessControlContextEntry {
	pub key: String,
	pub match_type: MatchType,
	#[serde(default)]
	pub values: Vec<String>,
}

impl AccessControlContextEntry {
	pub fn new(
		key: impl Into<String>,
		match_type: MatchType,
		values: impl IntoIterator<Item = impl Into<String>>,
	) -> Self {
		Self {
			key: key.into(),
			match_type,
			values: values.into_iter().map(Into::into).collect(),
		}
	}

	/// Evaluates this constraint against the values supplied for its key.
	///
	/// `NotEqual` is a membership test against the supplied set, not the
	/// negation of `Equals`. With supplied `["a", "b"]` and declared `["a"]`
	/// both are false: `Equals` needs exactly one value, `NotEqual` finds `"a"`.
	pub fn evaluate(&self, supplied: &[String]) -> bool {
		match self.match_type {
			MatchType::Equals => {
				supplied.len() == 1 && self.values.first().is_some_and(|v| *v == supplied[0])
			}
			MatchType::In => {
				let declared: HashSet<&str> = self.values.iter().map(String::as_str).collect();
				supplied.iter().all(|v| declared.contains(v.as_str()))
			}
			MatchType::Like => match self.values.first() {
				Some(pattern) => supplied.iter().all(|v| v.contains(pattern.as_str())),
				None => false,
			},
			MatchType::NotEqual => match self.values.first() {
				Some(value) => !supplied.contains(value),
				None => true,
			},
			MatchType::NotIn => {
				let declared: HashSet<&str> = self.values.iter().map(String::as_str).collect();
				!supplied.iter().any(|v| declared.contains(v.as_str()))
			}
			MatchType::Unknown => false,
		}
	}
}

/// True when every declared constraint has its key present in `context` and
/// evaluates true. An entry without constraints always matches.
pub fn context_matches(constraints: &[AccessControlContextEntry], context: &AccessControlContext) -> bool {
	constraints.iter().all(|constraint| {
		context
			.get(&constraint.key)
			.is_some_and(|supplied| constraint.evaluate(supplied))
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn values(items: &[&str]) -> Vec<String> {
		items.iter().map(|s| s.to_string()).collect()
	}

	fn entry(match_type: MatchType, declared: &[&str]) -> AccessControlContextEntry {
		AccessControlContextEntry::new("key", match_type, declared.iter().copied())
	}

	mod equals {
		use super::*;

		#[test]
		fn single_equal_value_matches() {
			assert!(entry(MatchType::Equals, &["a"]).evaluate(&values(&["a"])));
		}

		#[test]
		fn multiple_supplied_values_never_match() {
			assert!(!entry(MatchType::Equals, &["a"]).evaluate(&values(&["a", "a"])));
		}

		#[test]
		fn compares_against_first_declared_value_only() {
			assert!(!entry(MatchType::Equals, &["a", "b"]).evaluate(&values(&["b"])));
		}

		#[test]
		fn empty_declaration_never_matches() {
			assert!(!entry(MatchType::Equals, &[]).evaluate(&values(&["a"])));
		}
	}

	mod in_set {
		use super::*;

		#[test]
		fn subset_matches() {
			let constraint = entry(MatchType::In, &["a", "b"]);
			assert!(constraint.evaluate(&values(&["a"])));
			assert!(constraint.evaluate(&values(&["a", "b"])));
			assert!(constraint.evaluate(&values(&["b", "a", "a"])));
		}

		#[test]
		fn partial_overlap_does_not_match() {
			assert!(!entry(MatchType::In, &["a", "b"]).evaluate(&values(&["a", "c"])));
		}
	}

	mod like {
		use super::*;

		#[test]
		fn every_value_must_contain_pattern() {
			let constraint = entry(MatchType::Like, &["eng"]);
			assert!(constraint.evaluate(&values(&["engineering", "reengage"])));
			assert!(!constraint.evaluate(&values(&["engineering", "sales"])));
		}

		#[test]
		fn empty_declaration_fails_closed() {
			assert!(!entry(MatchType::Like, &[]).evaluate(&values(&["x"])));
		}
	}

	mod not_equal {
		use super::*;

		#[test]
		fn absent_value_matches() {
			assert!(entry(MatchType::NotEqual, &["a"]).evaluate(&values(&["b", "c"])));
		}

		#[test]
		fn present_value_does_not_match_even_among_others() {
			assert!(!entry(MatchType::NotEqual, &["a"]).evaluate(&values(&["b", "a"])));
		}

		#[test]
		fn is_not_the_negation_of_equals() {
			let supplied = values(&["a", "b"]);
			assert!(!entry(MatchType::Equals, &["a"]).evaluate(&supplied));
			assert!(!entry(MatchType::NotEqual, &["a"]).evaluate(&supplied));
		}
	}

	mod not_in {
		use super::*;

		#[test]
		fn disjoint_values_match() {
			assert!(entry(MatchType::NotIn, &["a", "b"]).evaluate(&values(&["c", "d"])));
		}

		#[test]
		fn any_overlap_does_not_match() {
			assert!(!entry(MatchType::NotIn, &["a", "b"]).evaluate(&values(&["c", "b"])));
		}
	}

	#[test]
	fn unknown_match_type_fails_closed() {
		let constraint: AccessControlContextEntry =
			serde_json::from_str(r#"{"key":"k","match_type":"Regex","values":["a"]}"#).unwrap();
		assert_eq!(constraint.match_type, MatchType::Unknown);
		assert!(!constraint.evaluate(&values(&["a"])));
	}

	#[test]
	fn missing_key_skips_entry() {
		let constraints = vec![entry(MatchType::Equals, &["a"])];
		let context = AccessControlContext::new();
		assert!(!context_matches(&constraints, &context));
	}

	#[test]
	fn all_constraints_must_hold() {
		let constraints = vec![
			AccessControlContextEntry::new("region", MatchType::Equals, ["eu"]),
			AccessControlContextEntry::new("tier", MatchType::In, ["gold", "silver"]),
		];
		let mut context = AccessControlContext::new();
		context.insert("region".to_string(), values(&["eu"]));
		context.insert("tier".to_string(), values(&["gold"]));
		assert!(context_matches(&constraints, &context));

		context.insert("tier".to_string(), values(&["bronze"]));
		assert!(!context_matches(&constraints, &context));
	}

	#[test]
	fn unconstrained_entry_always_matches() {
		assert!(context_matches(&[], &AccessControlContext::new()));
	}

	proptest! {
		#[test]
		fn in_and_not_in_are_exclusive_for_nonempty_input(
			declared in prop::collection::vec("[a-d]", 0..4),
			supplied in prop::collection::vec("[a-d]", 1..4),
		) {
			let declared: Vec<&str> = declared.iter().map(String::as_str).collect();
			let in_set = entry(MatchType::In, &declared).evaluate(&supplied);
			let not_in = entry(MatchType::NotIn, &declared).evaluate(&supplied);
			prop_assert!(!(in_set && not_in));
		}

		#[test]
		fn equals_implies_in(value in "[a-z]{1,8}") {
			let declared = [value.as_str()];
			let supplied = vec![value.clone()];
			prop_assert!(entry(MatchType::Equals, &declared).evaluate(&supplied));
			prop_assert!(entry(MatchType::In, &declared).evaluate(&supplied));
		}
	}
}
