use serde_json::Value;

use crate::Document;

/// Conjunction of field-equality clauses.
///
/// A clause `field == value` matches a document when the stored field equals
/// `value`, or when the stored field is an array containing `value`. An empty
/// filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    /// Filter matching every document
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter with a single equality clause
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and_eq(field, value)
    }

    /// Add another equality clause
    pub fn and_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), value.into()));
        self
    }

    /// Check whether a document satisfies every clause
    pub fn matches(&self, document: &Document) -> bool {
        self.clauses.iter().all(|(field, expected)| match document.get(field) {
            Some(Value::Array(items)) if !expected.is_array() => items.contains(expected),
            Some(actual) => actual == expected,
            None => expected.is_null(),
        })
    }
}
