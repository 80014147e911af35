use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::ledger::LedgerError;

/// Request-level failures and their HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds { balance: i64, required: i64 },
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::NotFound(_)
            | AppError::InsufficientFunds { .. } => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Internal(e) => {
                error!(error = ?e, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, body).into_response()
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::UnknownUser(_) => AppError::NotFound("User not found".into()),
            LedgerError::RecipientNotFound(name) => {
                AppError::NotFound(format!("User {name} not found"))
            }
            LedgerError::SelfTransfer => {
                AppError::Validation("Cannot send coins to yourself".into())
            }
            LedgerError::InsufficientFunds { balance, required } => {
                AppError::InsufficientFunds { balance, required }
            }
            LedgerError::BalanceOverflow => {
                AppError::Validation("Recipient balance would overflow".into())
            }
            LedgerError::UsernameTaken(name) => {
                AppError::Conflict(format!("Username {name} is already taken"))
            }
            LedgerError::Busy => AppError::Conflict("Ledger is busy, try again".into()),
            LedgerError::Store(e) => AppError::Internal(anyhow::Error::new(e).context("ledger store")),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_bad_request() {
        let cases: Vec<AppError> = vec![
            LedgerError::RecipientNotFound("ghost".into()).into(),
            LedgerError::SelfTransfer.into(),
            LedgerError::InsufficientFunds {
                balance: 5,
                required: 10,
            }
            .into(),
            AppError::Validation("amount must be positive".into()),
            LedgerError::BalanceOverflow.into(),
        ];
        for err in cases {
            assert_eq!(err.status(), StatusCode::BAD_REQUEST, "{err}");
        }
    }

    #[test]
    fn busy_and_duplicates_are_conflicts() {
        assert_eq!(AppError::from(LedgerError::Busy).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::from(LedgerError::UsernameTaken("alice".into())).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn store_errors_are_internal_and_opaque() {
        let err = AppError::from(LedgerError::Store(sqlx::Error::PoolTimedOut));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let res = err.into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn recipient_name_is_reported() {
        let err = AppError::from(LedgerError::RecipientNotFound("carol".into()));
        assert_eq!(err.to_string(), "User carol not found");
    }
}
