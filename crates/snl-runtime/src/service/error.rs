//! Service errors.

use crate::auth::AccessDenied;
use crate::engine::EngineError;
use chrono::{DateTime, Utc};
use snl_types::ErrorCode;
use thiserror::Error;
use uuid::Uuid;

/// Failure handling a trigger.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Engine operation failed.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Actor lacks host privilege.
    #[error(transparent)]
    Denied(#[from] AccessDenied),

    /// Reset token was never issued for this guild or was already used.
    #[error("unknown reset token {0}")]
    UnknownResetToken(Uuid),

    /// Reset token is past its confirmation window.
    #[error("reset token {token} expired at {expired_at}")]
    ResetTokenExpired {
        token: Uuid,
        expired_at: DateTime<Utc>,
    },
}

impl ErrorCode for ServiceError {
    fn code(&self) -> &'static str {
        match self {
            Self::Engine(_) => "SERVICE_ENGINE",
            Self::Denied(_) => "SERVICE_DENIED",
            Self::UnknownResetToken(_) => "SERVICE_UNKNOWN_RESET_TOKEN",
            Self::ResetTokenExpired { .. } => "SERVICE_RESET_TOKEN_EXPIRED",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Engine(e) => e.is_recoverable(),
            Self::Denied(_) | Self::UnknownResetToken(_) | Self::ResetTokenExpired { .. } => false,
        }
    }
}
