//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use loyalty_ledger::LedgerError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing or invalid credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Insufficient points for a redemption.
    #[error("insufficient points: need {required}, have {balance}")]
    InsufficientPoints {
        /// Current balance.
        balance: i64,
        /// Points required.
        required: i64,
    },

    /// Adjustment would drive the balance negative.
    #[error("adjustment rejected: balance {balance} with delta {delta} would go negative")]
    NegativeBalanceRejected {
        /// Current balance.
        balance: i64,
        /// The rejected delta.
        delta: i64,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                self.to_string(),
                None,
            ),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone(), None),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone(), None),
            Self::InsufficientPoints { balance, required } => (
                StatusCode::PAYMENT_REQUIRED,
                "insufficient_points",
                self.to_string(),
                Some(serde_json::json!({
                    "balance": balance,
                    "required": required
                })),
            ),
            Self::NegativeBalanceRejected { balance, delta } => (
                StatusCode::CONFLICT,
                "negative_balance_rejected",
                self.to_string(),
                Some(serde_json::json!({
                    "balance": balance,
                    "delta": delta
                })),
            ),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidAmount(amount) => {
                Self::BadRequest(format!("invalid amount: {amount}"))
            }
            LedgerError::InsufficientPoints { balance, required } => {
                Self::InsufficientPoints { balance, required }
            }
            LedgerError::NegativeBalanceRejected { balance, delta } => {
                Self::NegativeBalanceRejected { balance, delta }
            }
            LedgerError::Storage(e) => Self::Internal(e.to_string()),
        }
    }
}
