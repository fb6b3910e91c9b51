// src/validate.rs

//! Component validation
//!
//! Validation is a separate pass over the catalog; the merge pipeline never
//! consults it. A [`Validator`] inspects one component and returns the
//! problems it found. [`DuplicateDataValidator`] reports what the parsers
//! already recorded as [`ProblemFlags`] plus missing required text.

use crate::component::{Component, ComponentKind, ProblemFlags};
use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Validation strictness
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ValidateFlags: u32 {
        /// Also report recommended-but-optional data
        const STRICT = 1 << 0;
        /// Only report problems that make the data unusable
        const RELAX = 1 << 1;
    }
}

/// Category of a validation problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    /// A required value is missing
    TagMissing,
    /// The same data appears more than once
    DuplicateData,
    /// The source document is malformed in a recoverable way
    MarkupInvalid,
    /// The component will not be shown to users
    Vetoed,
}

impl ProblemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TagMissing => "tag-missing",
            Self::DuplicateData => "duplicate-data",
            Self::MarkupInvalid => "markup-invalid",
            Self::Vetoed => "vetoed",
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub kind: ProblemKind,
    pub message: String,
}

impl Problem {
    pub fn new(kind: ProblemKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Checks a single component
pub trait Validator {
    fn validate(&self, component: &Component, flags: ValidateFlags) -> Vec<Problem>;
}

/// Reports recorded duplicate data, markup problems and missing text
#[derive(Debug, Default, Clone, Copy)]
pub struct DuplicateDataValidator;

impl Validator for DuplicateDataValidator {
    fn validate(&self, component: &Component, flags: ValidateFlags) -> Vec<Problem> {
        let mut problems = Vec::new();

        let recorded = component.problems();
        let duplicates = ProblemFlags::DUPLICATE_RELEASE
            | ProblemFlags::DUPLICATE_SCREENSHOT
            | ProblemFlags::DUPLICATE_CONTENT_RATING;
        for description in recorded.intersection(duplicates).descriptions() {
            problems.push(Problem::new(ProblemKind::DuplicateData, description));
        }
        if flags.contains(ValidateFlags::RELAX) {
            return problems;
        }
        for description in recorded.difference(duplicates).descriptions() {
            problems.push(Problem::new(ProblemKind::MarkupInvalid, description));
        }

        if component.name(None).is_none() {
            problems.push(Problem::new(ProblemKind::TagMissing, "<name> is not present"));
        }
        if component.comment(None).is_none() && component.kind() != ComponentKind::Generic {
            problems.push(Problem::new(
                ProblemKind::TagMissing,
                "<summary> is not present",
            ));
        }

        if flags.contains(ValidateFlags::STRICT) {
            if component.metadata_license().is_none() {
                problems.push(Problem::new(
                    ProblemKind::TagMissing,
                    "<metadata_license> is not present",
                ));
            }
            for veto in component.vetoes() {
                problems.push(Problem::new(ProblemKind::Vetoed, veto.to_string()));
            }
        }
        problems
    }
}
