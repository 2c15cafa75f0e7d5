// ── Runtime directory configuration ──
//
// Describes *how* to reach and query the directory server. Carries
// credential data and the filter templates, but never touches disk.
// The CLI (via dirbook-config) constructs a `DirectoryConfig` and hands
// it in; it is immutable for the lifetime of a service session.

use std::time::Duration;

use secrecy::SecretString;

use dirbook_api::{FilterBuilder, FilterTemplates, TlsMode, TransportConfig};

use crate::error::CoreError;

/// Configuration for one directory endpoint.
///
/// Built by the config layer, owned by the repository -- core never reads
/// config files.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Directory server hostname or IP address.
    pub host: String,
    /// Directory server port (389 plain, 636 LDAPS by convention).
    pub port: u16,
    /// Connection security mode.
    pub tls: TlsMode,
    /// Accept any server certificate (self-signed directory servers).
    pub danger_accept_invalid_certs: bool,
    /// Base DN under which user entries live.
    pub user_base_dn: String,
    /// Base DN under which group entries live.
    pub group_base_dn: String,
    /// Service account DN used for the bind.
    pub bind_dn: String,
    /// Service account password.
    pub bind_password: SecretString,
    /// Directory protocol version. The transport speaks version 3; the
    /// field exists so a misconfigured deployment fails loudly at load time.
    pub protocol_version: u8,
    /// Filter templates for user/group selection and identity lookup.
    pub filters: FilterTemplates,
    /// Attribute carrying the directory username (group membership key).
    pub login_attribute: String,
    /// How many group-membership lookups run concurrently during a listing.
    /// 1 degenerates to strictly sequential round trips.
    pub group_fanout: usize,
    /// Request timeout for all directory operations.
    pub timeout: Duration,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 389,
            tls: TlsMode::Plain,
            danger_accept_invalid_certs: false,
            user_base_dn: "ou=users,dc=example,dc=com".into(),
            group_base_dn: "ou=groups,dc=example,dc=com".into(),
            bind_dn: "cn=admin,dc=example,dc=com".into(),
            bind_password: SecretString::from(String::new()),
            protocol_version: 3,
            filters: FilterTemplates {
                user_base: "(objectClass=inetOrgPerson)".into(),
                user_login: "(&(objectClass=inetOrgPerson)(mail=%uid))".into(),
                group_base: "(objectClass=posixGroup)".into(),
                group_gid: "(&(objectClass=posixGroup)(gidNumber=%gid))".into(),
                hidden_class: "shadowAccount".into(),
            },
            login_attribute: "uid".into(),
            group_fanout: 8,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DirectoryConfig {
    /// Build the transport settings for this endpoint.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls,
            timeout: self.timeout,
            danger_accept_invalid_certs: self.danger_accept_invalid_certs,
        }
    }

    /// Build the filter builder from the configured templates.
    ///
    /// Fails when a lookup template lacks its substitution placeholder.
    pub fn filter_builder(&self) -> Result<FilterBuilder, CoreError> {
        Ok(FilterBuilder::new(self.filters.clone())?)
    }

    /// Validate fields that cannot be checked by construction.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.host.trim().is_empty() {
            return Err(CoreError::Config {
                message: "directory host is required".into(),
            });
        }
        if self.user_base_dn.trim().is_empty() || self.group_base_dn.trim().is_empty() {
            return Err(CoreError::Config {
                message: "user and group base DNs are required".into(),
            });
        }
        if self.protocol_version != 3 {
            return Err(CoreError::Config {
                message: format!(
                    "unsupported directory protocol version {} (only 3 is supported)",
                    self.protocol_version
                ),
            });
        }
        self.filter_builder().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(DirectoryConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_unsupported_protocol_version() {
        let config = DirectoryConfig {
            protocol_version: 2,
            ..DirectoryConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Config { .. })));
    }

    #[test]
    fn test_rejects_blank_host() {
        let config = DirectoryConfig {
            host: "  ".into(),
            ..DirectoryConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_broken_login_template() {
        let mut config = DirectoryConfig::default();
        config.filters.user_login = "(mail=static)".into();
        assert!(matches!(config.validate(), Err(CoreError::Config { .. })));
    }
}
