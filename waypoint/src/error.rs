use crate::ast::Span;
use std::fmt;
use std::sync::Arc;

/// Detailed error information with source location
#[derive(Debug, Clone)]
pub struct ErrorDetails {
    pub message: String,
    pub span: Span,
    pub source_id: String,
    pub source_text: Arc<str>,
    pub tree_name: String,
    pub suggestion: Option<String>,
}

/// Error types for Waypoint
#[derive(Debug, Clone)]
pub enum WaypointError {
    /// Tree source could not be parsed
    Parse(Box<ErrorDetails>),

    /// Tree parsed but breaks an authoring rule
    Validation(Box<ErrorDetails>),

    /// The answer does not fit the live question. Session state is unchanged.
    InvalidAnswer {
        question_id: String,
        value: String,
        reason: String,
    },

    /// The facts do not describe exactly one live question or a recommendation.
    /// Only a misauthored rule table can get here.
    InconsistentState(String),

    /// Engine error without specific source location
    Engine(String),

    ResourceLimitExceeded {
        limit_name: String,
        limit_value: String,
        actual_value: String,
        suggestion: String,
    },

    /// Multiple errors collected together
    MultipleErrors(Vec<WaypointError>),
}

impl WaypointError {
    /// Create a parse error with source information
    pub fn parse(
        message: impl Into<String>,
        span: Span,
        source_id: impl Into<String>,
        source_text: Arc<str>,
        tree_name: impl Into<String>,
    ) -> Self {
        Self::Parse(Box::new(ErrorDetails {
            message: message.into(),
            span,
            source_id: source_id.into(),
            source_text,
            tree_name: tree_name.into(),
            suggestion: None,
        }))
    }

    /// Create a validation error with source information
    pub fn validation(
        message: impl Into<String>,
        span: Span,
        source_id: impl Into<String>,
        source_text: Arc<str>,
        tree_name: impl Into<String>,
    ) -> Self {
        Self::Validation(Box::new(ErrorDetails {
            message: message.into(),
            span,
            source_id: source_id.into(),
            source_text,
            tree_name: tree_name.into(),
            suggestion: None,
        }))
    }

    /// Create a validation error with suggestion
    pub fn validation_with_suggestion(
        message: impl Into<String>,
        span: Span,
        source_id: impl Into<String>,
        source_text: Arc<str>,
        tree_name: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Validation(Box::new(ErrorDetails {
            message: message.into(),
            span,
            source_id: source_id.into(),
            source_text,
            tree_name: tree_name.into(),
            suggestion: Some(suggestion.into()),
        }))
    }

    pub fn invalid_answer(
        question_id: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidAnswer {
            question_id: question_id.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// True for errors the person answering can recover from by answering again
    pub fn is_recoverable(&self) -> bool {
        matches!(self, WaypointError::InvalidAnswer { .. })
    }
}

fn write_located(f: &mut fmt::Formatter<'_>, kind: &str, details: &ErrorDetails) -> fmt::Result {
    write!(f, "{}: {}", kind, details.message)?;
    if let Some(suggestion) = &details.suggestion {
        write!(f, " (suggestion: {})", suggestion)?;
    }
    write!(
        f,
        " at {}:{}:{}",
        details.source_id, details.span.line, details.span.col
    )
}

impl fmt::Display for WaypointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaypointError::Parse(details) => write_located(f, "Parse error", details),
            WaypointError::Validation(details) => write_located(f, "Validation error", details),
            WaypointError::InvalidAnswer {
                question_id,
                value,
                reason,
            } => write!(
                f,
                "Invalid answer '{}' for question '{}': {}",
                value, question_id, reason
            ),
            WaypointError::InconsistentState(msg) => write!(f, "Inconsistent state: {}", msg),
            WaypointError::Engine(msg) => write!(f, "Engine error: {}", msg),
            WaypointError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
                suggestion,
            } => write!(
                f,
                "Resource limit exceeded: {} (limit: {}, actual: {}). {}",
                limit_name, limit_value, actual_value, suggestion
            ),
            WaypointError::MultipleErrors(errors) => {
                writeln!(f, "Multiple errors:")?;
                for (i, error) in errors.iter().enumerate() {
                    write!(f, "  {}. {}", i + 1, error)?;
                    if i < errors.len() - 1 {
                        writeln!(f)?;
                    }
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for WaypointError {}

impl From<std::fmt::Error> for WaypointError {
    fn from(err: std::fmt::Error) -> Self {
        WaypointError::Engine(format!("Format error: {}", err))
    }
}
