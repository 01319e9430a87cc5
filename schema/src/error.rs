use std::{error::Error, fmt};

use crate::fields::Constraint;

/// What went wrong with a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    Missing,
    WrongType { expected: &'static str },
    NotInteger { got: f64 },
    IntOverflow { got: f64 },
    OutOfRange { constraint: Constraint, got: f64 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Missing => write!(f, "field required"),
            Violation::WrongType { expected } => write!(f, "expected {expected}"),
            Violation::NotInteger { got } => {
                write!(f, "expected an integer, got {got} which has a fractional part")
            }
            Violation::IntOverflow { got } => {
                write!(f, "expected an integer, got {got} which does not fit in 64 bits")
            }
            Violation::OutOfRange { constraint, got } => {
                write!(f, "value must be {constraint}, got {got}")
            }
        }
    }
}

/// A violation attached to the wire name of the offending field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    pub field: String,
    pub violation: Violation,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, violation: Violation) -> Self {
        Self {
            field: field.into(),
            violation,
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.violation)
    }
}

/// A rejected payload, carrying every violated field constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErr {
    violations: Vec<FieldViolation>,
}

impl ValidationErr {
    /// # Panics
    /// - if `violations` is empty
    pub(crate) fn new(violations: Vec<FieldViolation>) -> Self {
        assert!(!violations.is_empty(), "a validation error needs a violation");
        Self { violations }
    }

    pub(crate) fn single(field: impl Into<String>, violation: Violation) -> Self {
        Self::new(vec![FieldViolation::new(field, violation)])
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Returns the violation reported for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&Violation> {
        self.violations
            .iter()
            .find(|v| v.field == field)
            .map(|v| &v.violation)
    }
}

impl fmt::Display for ValidationErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} invalid field(s)", self.violations.len())?;
        for v in &self.violations {
            write!(f, "; {v}")?;
        }
        Ok(())
    }
}

impl Error for ValidationErr {}
