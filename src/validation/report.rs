//! Verification report types for structured error reporting.
//!
//! This module provides rich, structured verification results that can be
//! displayed to users or serialized as JSON.

use serde::Serialize;
use std::fmt;

/// The result of verifying a generated corpus.
///
/// Contains all issues found, categorized by severity.
#[derive(Clone, Debug, Default, Serialize)]
pub struct VerificationReport {
    /// Annotation files examined.
    pub annotations_checked: usize,

    /// Objects examined across all annotations.
    pub objects_checked: usize,

    /// All issues found during verification.
    pub issues: Vec<VerificationIssue>,
}

impl VerificationReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an issue to the report.
    pub fn add(&mut self, issue: VerificationIssue) {
        self.issues.push(issue);
    }

    /// Returns the number of errors in the report.
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    /// Returns the number of warnings in the report.
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    /// Returns true if there are no issues at all.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns true if the issue list contains `code`.
    pub fn has(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return writeln!(
                f,
                "Verification passed: {} annotation(s), {} object(s), no issues found",
                self.annotations_checked, self.objects_checked
            );
        }

        writeln!(
            f,
            "Verification completed with {} error(s) and {} warning(s):",
            self.error_count(),
            self.warning_count()
        )?;
        writeln!(f)?;

        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

/// A single verification issue (error or warning).
#[derive(Clone, Debug, Serialize)]
pub struct VerificationIssue {
    /// The severity of the issue.
    pub severity: Severity,

    /// A stable code for the issue type.
    pub code: IssueCode,

    /// A human-readable description of the issue.
    pub message: String,

    /// Context about where the issue occurred.
    pub context: IssueContext,
}

impl VerificationIssue {
    /// Creates a new verification issue.
    pub fn new(
        severity: Severity,
        code: IssueCode,
        message: impl Into<String>,
        context: IssueContext,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            context,
        }
    }

    /// Creates a new error.
    pub fn error(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Error, code, message, context)
    }

    /// Creates a new warning.
    pub fn warning(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Warning, code, message, context)
    }
}

impl fmt::Display for VerificationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        write!(
            f,
            "[{}] {:?} in {}: {}",
            severity, self.code, self.context, self.message
        )
    }
}

/// The severity of a verification issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// Suspicious but usable for training.
    Warning,
    /// The pair is unusable or describes the wrong image.
    Error,
}

/// A stable code identifying the type of verification issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IssueCode {
    // Pairing issues
    /// An annotation file could not be parsed.
    UnreadableAnnotation,
    /// An annotation's `<filename>` does not match its own file stem.
    FileNameMismatch,
    /// An annotation names an image that does not exist.
    MissingImage,
    /// An image has no annotation.
    OrphanImage,

    // Geometry issues
    /// The recorded size differs from the image on disk.
    SizeMismatch,
    /// A bounding box has min >= max on some axis.
    InvalidBBoxOrdering,
    /// A bounding box extends outside the recorded image size.
    BBoxOutOfBounds,

    // Content issues
    /// An annotation has no objects.
    EmptyAnnotation,
}

/// Context about where a verification issue occurred.
#[derive(Clone, Debug, Serialize)]
pub enum IssueContext {
    /// Issue with an annotation file as a whole.
    Annotation { file: String },
    /// Issue with one object of an annotation (0-based).
    Object { file: String, index: usize },
    /// Issue with an image file.
    Image { file: String },
}

impl fmt::Display for IssueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueContext::Annotation { file } => write!(f, "annotation {}", file),
            IssueContext::Object { file, index } => write!(f, "{} object {}", file, index),
            IssueContext::Image { file } => write!(f, "image {}", file),
        }
    }
}
