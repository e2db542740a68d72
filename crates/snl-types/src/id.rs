//! Identifier types.
//!
//! Guild and player ids are the chat platform's numeric snowflakes.
//! They serialize as plain integers (and as string keys inside JSON
//! maps), so persisted state stays readable by hand.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an id from text fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} id '{input}': expected a non-negative integer")]
pub struct ParseIdError {
    kind: &'static str,
    input: String,
}

macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            #[doc = concat!("Wraps a raw ", $kind, " snowflake.")]
            #[must_use]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Returns the raw snowflake value.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<u64>().map(Self).map_err(|_| ParseIdError {
                    kind: $kind,
                    input: s.to_string(),
                })
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

snowflake_id!(
    /// Identifier of a guild (community server).
    ///
    /// A guild is one isolated game instance: positions, rolls and the
    /// podium of one guild never affect another.
    ///
    /// # Example
    ///
    /// ```
    /// use snl_types::GuildId;
    ///
    /// let guild: GuildId = "1234".parse().unwrap();
    /// assert_eq!(guild, GuildId::new(1234));
    /// assert_eq!(guild.to_string(), "1234");
    /// ```
    GuildId,
    "guild"
);

snowflake_id!(
    /// Identifier of a player (guild member).
    ///
    /// # Example
    ///
    /// ```
    /// use snl_types::PlayerId;
    ///
    /// assert!("not-a-number".parse::<PlayerId>().is_err());
    /// ```
    PlayerId,
    "player"
);

/// Opaque reference to the evidence posted for a submission.
///
/// The chat layer chooses the format (typically the channel and message
/// ids of the posted screenshot). The engine only compares references
/// for equality to route an approval signal back to its submission.
///
/// # Example
///
/// ```
/// use snl_types::EvidenceRef;
///
/// let evidence = EvidenceRef::new("998877/554433");
/// assert_eq!(evidence.as_str(), "998877/554433");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvidenceRef(String);

impl EvidenceRef {
    /// Creates an evidence reference.
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Returns the reference text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EvidenceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
