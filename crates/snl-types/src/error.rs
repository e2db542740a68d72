//! Unified error interface.
//!
//! Every error type in the workspace implements [`ErrorCode`] so that
//! the chat layer and the CLI can log and branch on a stable,
//! machine-readable code instead of matching on display strings.
//!
//! # Example
//!
//! ```
//! use snl_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum LookupError {
//!     Timeout,
//!     Malformed,
//! }
//!
//! impl ErrorCode for LookupError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Timeout => "TILE_TIMEOUT",
//!             Self::Malformed => "TILE_MALFORMED",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Timeout)
//!     }
//! }
//!
//! assert_eq!(LookupError::Timeout.code(), "TILE_TIMEOUT");
//! assert!(!LookupError::Malformed.is_recoverable());
//! ```

/// Machine-readable error code interface.
///
/// # Code Format
///
/// - UPPER_SNAKE_CASE
/// - Prefixed with the owning layer (`STORE_`, `TILE_`, `ENGINE_`, ...)
/// - Stable once published
///
/// # Recoverability
///
/// An error is recoverable when retrying the same operation later may
/// succeed (a slow tile source, a busy disk). Invalid input and
/// permission problems are not recoverable.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether retrying may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error code follows the workspace conventions.
///
/// Intended for tests covering every variant of an error enum.
///
/// # Panics
///
/// Panics if the code is empty, lacks `expected_prefix`, or is not
/// UPPER_SNAKE_CASE.
///
/// # Example
///
/// ```
/// use snl_types::{assert_error_code, ErrorCode};
///
/// struct Busy;
///
/// impl ErrorCode for Busy {
///     fn code(&self) -> &'static str { "STORE_BUSY" }
///     fn is_recoverable(&self) -> bool { true }
/// }
///
/// assert_error_code(&Busy, "STORE_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "Error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "Error code '{code}' must start with prefix '{expected_prefix}'"
    );
    assert!(
        is_upper_snake_case(code),
        "Error code '{code}' must be UPPER_SNAKE_CASE"
    );
}

fn is_upper_snake_case(s: &str) -> bool {
    !s.starts_with('_')
        && !s.ends_with('_')
        && !s.contains("__")
        && s.chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
