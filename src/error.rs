//! Error and violation types.
//!
//! Two severities exist: rule violations at error level are aggregated into a
//! single [`ValidationReport`] (never fail-fast inside `validate_all`), while
//! warning-level findings (R3/R4) are logged and returned as plain lists.

use std::fmt;

use thiserror::Error;

/// The nine validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Container must enclose all children.
    R1,
    /// No two boxes may overlap.
    R2,
    /// Container title must clear children.
    R3,
    /// Box text must fit within the padded inner area.
    R4,
    /// Text-to-text margin.
    R5,
    /// Text-to-edge margin.
    R6,
    /// Arrow visible-length ratio.
    R7,
    /// Curved-arrow label on the same side as the arc bulge.
    R8,
    /// All elements within canvas bounds (resolved by the fixer only).
    R9,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Rule::R1 => "R1",
            Rule::R2 => "R2",
            Rule::R3 => "R3",
            Rule::R4 => "R4",
            Rule::R5 => "R5",
            Rule::R6 => "R6",
            Rule::R7 => "R7",
            Rule::R8 => "R8",
            Rule::R9 => "R9",
        };
        f.write_str(tag)
    }
}

/// One concrete rule violation with a human-readable description.
#[derive(Debug, Clone)]
pub struct Violation {
    pub rule: Rule,
    pub message: String,
}

impl Violation {
    pub fn new(rule: Rule, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.rule, self.message)
    }
}

/// Every error-level violation found in one validation run, formatted as a
/// numbered list so tooling gets the complete defect list at once.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} validation error(s):", self.violations.len())?;
        for (i, v) in self.violations.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, v)?;
        }
        Ok(())
    }
}

/// Errors surfaced by the builder API and the validator.
#[derive(Debug, Error)]
pub enum DiagramError {
    /// An element id was registered twice.
    #[error("duplicate id '{0}'")]
    DuplicateId(String),

    /// A container or arrow referenced an id that does not exist.
    #[error("unknown id '{id}' referenced by '{referrer}'")]
    UnknownId { id: String, referrer: String },

    /// A spec carried a non-positive width or height.
    #[error("'{id}' has non-positive size {width_mm}x{height_mm} mm")]
    InvalidSize {
        id: String,
        width_mm: f64,
        height_mm: f64,
    },

    /// Aggregated error-level validation failures.
    #[error("{0}")]
    Validation(ValidationReport),
}

impl DiagramError {
    pub fn unknown_id(id: impl Into<String>, referrer: impl Into<String>) -> Self {
        Self::UnknownId {
            id: id.into(),
            referrer: referrer.into(),
        }
    }

    /// The violation list, when this is a validation error.
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            Self::Validation(report) => Some(&report.violations),
            _ => None,
        }
    }
}
