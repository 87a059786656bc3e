//! Input validation for line balancing problems.
//!
//! Checks the fields of a task before it enters the precedence graph.
//! Detects:
//! - Malformed or duplicate IDs
//! - Empty or overlong descriptions
//! - Non-positive or non-finite durations
//! - Malformed or repeated predecessor IDs
//!
//! Unknown predecessor IDs are not a field error: tasks may be added in any
//! order, so references are resolved later by [`TaskGraph::validate`]
//! and reported as [`ReferenceError`]s.
//!
//! [`TaskGraph::validate`]: crate::models::TaskGraph::validate

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

/// Maximum task ID length (characters).
pub const MAX_ID_LEN: usize = 10;

/// Maximum task description length (characters).
pub const MAX_DESCRIPTION_LEN: usize = 100;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ValidationErrorKind {
    /// Task ID is empty, too long, or contains unsupported characters.
    InvalidId,
    /// Two tasks share the same ID.
    DuplicateId,
    /// Description is empty or longer than [`MAX_DESCRIPTION_LEN`].
    InvalidDescription,
    /// Duration is zero, negative, or not finite.
    InvalidDuration,
    /// A predecessor ID is malformed.
    InvalidPredecessorId,
    /// The same predecessor is listed more than once.
    DuplicatePredecessor,
    /// The line has no tasks to balance.
    EmptyLine,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A precedence reference that does not resolve to an existing task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceError {
    /// Task declaring the precedence.
    pub task_id: String,
    /// Referenced predecessor that does not exist.
    pub missing_id: String,
}

impl ReferenceError {
    pub(crate) fn new(task_id: impl Into<String>, missing_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            missing_id: missing_id.into(),
        }
    }
}

impl fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "task '{}' references unknown predecessor '{}'",
            self.task_id, self.missing_id
        )
    }
}

/// Whether `id` is a well-formed task ID.
///
/// IDs are 1 to [`MAX_ID_LEN`] ASCII letters, digits, `-` or `_`.
pub fn is_valid_task_id(id: &str) -> bool {
    !id.is_empty()
        && id.chars().count() <= MAX_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Validates the fields of a single task.
///
/// IDs and descriptions are expected to be trimmed already.
///
/// # Returns
/// All detected issues; an empty vector means the fields are valid.
pub fn validate_task_fields(
    id: &str,
    description: &str,
    duration: f64,
    predecessors: &[String],
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !is_valid_task_id(id) {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidId,
            format!(
                "Invalid task ID '{id}' (1-{MAX_ID_LEN} letters, digits, '-' or '_')"
            ),
        ));
    }

    let desc_len = description.chars().count();
    if desc_len == 0 || desc_len > MAX_DESCRIPTION_LEN {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidDescription,
            format!(
                "Task '{id}' description must be 1-{MAX_DESCRIPTION_LEN} characters (got {desc_len})"
            ),
        ));
    }

    if !duration.is_finite() || duration <= 0.0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidDuration,
            format!("Task '{id}' duration must be a positive number (got {duration})"),
        ));
    }

    let mut seen = HashSet::new();
    for pred in predecessors {
        if !is_valid_task_id(pred) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPredecessorId,
                format!("Task '{id}' has invalid predecessor ID '{pred}'"),
            ));
        }
        if !seen.insert(pred.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicatePredecessor,
                format!("Task '{id}' lists predecessor '{pred}' more than once"),
            ));
        }
    }

    errors
}

/// Collapses internal whitespace runs and trims the ends.
pub(crate) fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(errors: &[ValidationError]) -> Vec<ValidationErrorKind> {
        errors.iter().map(|e| e.kind.clone()).collect()
    }

    #[test]
    fn test_valid_fields() {
        let errors = validate_task_fields("A", "Prepare material", 5.0, &["B".into()]);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_task_id_rules() {
        assert!(is_valid_task_id("SEQ1"));
        assert!(is_valid_task_id("op-10_b"));
        assert!(is_valid_task_id("ABCDEFGHIJ"));
        assert!(!is_valid_task_id(""));
        assert!(!is_valid_task_id("ABCDEFGHIJK")); // 11 chars
        assert!(!is_valid_task_id("A B"));
        assert!(!is_valid_task_id("A.1"));
    }

    #[test]
    fn test_empty_description() {
        let errors = validate_task_fields("A", "", 1.0, &[]);
        assert_eq!(kinds(&errors), vec![ValidationErrorKind::InvalidDescription]);
    }

    #[test]
    fn test_long_description() {
        let desc = "x".repeat(MAX_DESCRIPTION_LEN + 1);
        let errors = validate_task_fields("A", &desc, 1.0, &[]);
        assert_eq!(kinds(&errors), vec![ValidationErrorKind::InvalidDescription]);

        let desc = "x".repeat(MAX_DESCRIPTION_LEN);
        assert!(validate_task_fields("A", &desc, 1.0, &[]).is_empty());
    }

    #[test]
    fn test_invalid_durations() {
        for duration in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let errors = validate_task_fields("A", "task", duration, &[]);
            assert_eq!(kinds(&errors), vec![ValidationErrorKind::InvalidDuration]);
        }
    }

    #[test]
    fn test_predecessor_problems() {
        let preds = vec!["B".to_string(), "bad id".to_string(), "B".to_string()];
        let errors = validate_task_fields("A", "task", 1.0, &preds);
        let k = kinds(&errors);
        assert!(k.contains(&ValidationErrorKind::InvalidPredecessorId));
        assert!(k.contains(&ValidationErrorKind::DuplicatePredecessor));
    }

    #[test]
    fn test_multiple_errors_collected() {
        let errors = validate_task_fields("", "", -2.0, &[]);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_reference_error_display() {
        let err = ReferenceError::new("C", "Z");
        assert_eq!(err.to_string(), "task 'C' references unknown predecessor 'Z'");
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Weld   the\tjoint "), "Weld the joint");
        assert_eq!(normalize_text("   "), "");
    }
}
