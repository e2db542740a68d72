//! Host authority policies.

use super::AccessDenied;
use crate::config::RolesConfig;
use snl_types::{GuildId, PlayerId};
use std::collections::HashSet;

/// Decides whether a member holds host privilege in a guild.
pub trait HostAuthority: Send + Sync {
    /// Returns `true` if `member` is a host of `guild`.
    fn is_host(&self, guild: GuildId, member: PlayerId) -> bool;

    /// Checks host privilege for `operation`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied::NotHost`] when `member` is not a host.
    fn check_host(
        &self,
        guild: GuildId,
        member: PlayerId,
        operation: &str,
    ) -> Result<(), AccessDenied> {
        if self.is_host(guild, member) {
            Ok(())
        } else {
            Err(AccessDenied::NotHost {
                guild,
                member,
                operation: operation.to_string(),
            })
        }
    }
}

/// Hosts listed in configuration, valid in every guild.
///
/// # Example
///
/// ```
/// use snl_runtime::auth::{ConfiguredHosts, HostAuthority};
/// use snl_types::{GuildId, PlayerId};
///
/// let hosts = ConfiguredHosts::new([PlayerId::new(7)]);
/// assert!(hosts.is_host(GuildId::new(1), PlayerId::new(7)));
/// assert!(hosts.check_host(GuildId::new(1), PlayerId::new(8), "reset").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfiguredHosts {
    hosts: HashSet<PlayerId>,
}

impl ConfiguredHosts {
    /// Creates a policy from a host list.
    #[must_use]
    pub fn new(hosts: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            hosts: hosts.into_iter().collect(),
        }
    }

    /// Creates a policy from the `[roles]` config section.
    #[must_use]
    pub fn from_config(roles: &RolesConfig) -> Self {
        Self::new(roles.hosts.iter().copied())
    }

    /// Returns the number of hosts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Returns `true` if no host is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl HostAuthority for ConfiguredHosts {
    fn is_host(&self, _guild: GuildId, member: PlayerId) -> bool {
        self.hosts.contains(&member)
    }
}

/// Treats everyone as a host. For tests and single-operator setups.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAuthority;

impl HostAuthority for OpenAuthority {
    fn is_host(&self, _guild: GuildId, _member: PlayerId) -> bool {
        true
    }
}
