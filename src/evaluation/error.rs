use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The errors an evaluation may return to its caller.
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// The request is malformed, or a parameter is out of its range.
    #[error("invalid request: {message}")]
    Invalid {
        /// What is wrong with the request.
        message: String,
    },
    /// The evaluation failed for a reason unrelated to the request.
    #[error("internal error")]
    Internal {
        /// The cause, only exposed when diagnostics are requested.
        detail: String,
    },
}

impl EvaluationError {
    /// Builds an [`Invalid`](Self::Invalid) error.
    pub fn invalid(message: impl Into<String>) -> Self {
        EvaluationError::Invalid {
            message: message.into(),
        }
    }

    /// Builds an [`Internal`](Self::Internal) error from its cause.
    pub fn internal(cause: &anyhow::Error) -> Self {
        EvaluationError::Internal {
            detail: format!("{:#}", cause),
        }
    }

    /// Returns the error code.
    pub fn code(&self) -> &'static str {
        match self {
            EvaluationError::Invalid { .. } => "INVALID_REQUEST",
            EvaluationError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP-like status class of the error.
    pub fn status(&self) -> u16 {
        match self {
            EvaluationError::Invalid { .. } => 400,
            EvaluationError::Internal { .. } => 500,
        }
    }

    /// Builds the error document returned to the caller.
    ///
    /// The cause of internal errors is only included when `diagnostics` is set.
    ///
    /// # Example
    ///
    /// ```
    /// # use crustaspic::evaluation::EvaluationError;
    /// let err = EvaluationError::internal(&anyhow::anyhow!("disk full"));
    /// assert_eq!("internal error", err.to_response(false).error.message);
    /// assert_eq!("internal error: disk full", err.to_response(true).error.message);
    /// ```
    pub fn to_response(&self, diagnostics: bool) -> ErrorResponse {
        let message = match self {
            EvaluationError::Internal { detail } if diagnostics => format!("{}: {}", self, detail),
            _ => self.to_string(),
        };
        ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message,
            },
        }
    }
}

/// The error document: `{ "error": { "code": ..., "message": ... } }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// The error.
    pub error: ErrorBody,
}

/// The content of an error document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// The error code.
    pub code: String,
    /// A human readable message.
    pub message: String,
}
