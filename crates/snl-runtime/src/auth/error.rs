//! Access denied error.

use snl_types::{ErrorCode, GuildId, PlayerId};
use thiserror::Error;

/// A member tried a host operation without host privilege.
///
/// # Example
///
/// ```
/// use snl_runtime::auth::AccessDenied;
/// use snl_types::{GuildId, PlayerId};
///
/// let err = AccessDenied::NotHost {
///     guild: GuildId::new(1),
///     member: PlayerId::new(2),
///     operation: "reset".into(),
/// };
/// assert!(err.to_string().contains("reset"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenied {
    /// Member is not a host of the guild.
    #[error("member {member} is not a host in guild {guild}, '{operation}' denied")]
    NotHost {
        /// Guild the operation targeted.
        guild: GuildId,
        /// Member who tried.
        member: PlayerId,
        /// Operation name.
        operation: String,
    },
}

impl ErrorCode for AccessDenied {
    fn code(&self) -> &'static str {
        match self {
            Self::NotHost { .. } => "AUTH_NOT_HOST",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
