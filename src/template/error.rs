//! Template error definitions

use minijinja::ErrorKind;
use thiserror::Error;

/// Errors raised while parsing or rendering a template
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template syntax error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("undefined template field: {path}")]
    UndefinedField { path: String },

    #[error("unknown template helper: {reason}")]
    UnknownHelper { reason: String },

    #[error("invalid helper arguments: {reason}")]
    HelperArgs { reason: String },

    #[error("template render failed: {reason}")]
    Render { reason: String },
}

impl From<minijinja::Error> for TemplateError {
    fn from(err: minijinja::Error) -> Self {
        let reason = match err.detail() {
            Some(detail) => detail.to_string(),
            None => err.kind().to_string(),
        };

        match err.kind() {
            ErrorKind::SyntaxError | ErrorKind::BadEscape => Self::Parse {
                line: err.line().unwrap_or(0),
                reason,
            },
            ErrorKind::UndefinedError => Self::UndefinedField { path: reason },
            ErrorKind::UnknownFilter
            | ErrorKind::UnknownTest
            | ErrorKind::UnknownFunction => Self::UnknownHelper { reason },
            ErrorKind::MissingArgument
            | ErrorKind::TooManyArguments
            | ErrorKind::InvalidOperation => Self::HelperArgs { reason },
            _ => Self::Render { reason },
        }
    }
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;
