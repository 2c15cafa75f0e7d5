// Directory client: the trait the domain layer consumes, and its
// ldap3-backed implementation.
//
// Connect and bind happen at construction time; `search` and `modify` are
// the per-operation surface. The `Ldap` handle is a cheap clone over one
// underlying connection, so trait methods take `&self` and clone per call.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use ldap3::{Ldap, LdapConnAsync, Scope, SearchEntry};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::transport::TransportConfig;

// ── Raw entry ────────────────────────────────────────────────────────

/// A raw directory search result: dn plus attribute values.
///
/// Attribute names are lowercased at construction — directory attribute
/// names are case-insensitive (RFC 4512), and normalizing here spares every
/// consumer its own case folding.
#[derive(Debug, Clone, Default)]
pub struct RawEntry {
    pub dn: String,
    attrs: HashMap<String, Vec<String>>,
}

impl RawEntry {
    pub fn new(dn: impl Into<String>, attrs: impl IntoIterator<Item = (String, Vec<String>)>) -> Self {
        Self {
            dn: dn.into(),
            attrs: attrs
                .into_iter()
                .map(|(name, values)| (name.to_lowercase(), values))
                .collect(),
        }
    }

    /// First value of the named attribute, if any.
    pub fn first(&self, attr: &str) -> Option<&str> {
        self.attrs
            .get(&attr.to_lowercase())
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// All values of the named attribute (empty slice when absent).
    pub fn values(&self, attr: &str) -> &[String] {
        self.attrs
            .get(&attr.to_lowercase())
            .map_or(&[], Vec::as_slice)
    }

    /// Whether the entry carries the named attribute with at least one value.
    pub fn has(&self, attr: &str) -> bool {
        self.attrs
            .get(&attr.to_lowercase())
            .is_some_and(|v| !v.is_empty())
    }
}

impl From<SearchEntry> for RawEntry {
    fn from(entry: SearchEntry) -> Self {
        // Binary attributes are irrelevant to the contact schema; text
        // attributes carry everything this crate consumes.
        Self::new(entry.dn, entry.attrs)
    }
}

// ── Modify diff ──────────────────────────────────────────────────────

/// One attribute-level change in a modify request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeChange {
    /// Replace the attribute with exactly these values.
    Set { attr: String, values: Vec<String> },
    /// Remove the attribute entirely.
    Delete { attr: String },
}

impl AttributeChange {
    pub fn set(attr: impl Into<String>, values: impl IntoIterator<Item = String>) -> Self {
        Self::Set {
            attr: attr.into(),
            values: values.into_iter().collect(),
        }
    }

    pub fn delete(attr: impl Into<String>) -> Self {
        Self::Delete { attr: attr.into() }
    }

    pub fn attr(&self) -> &str {
        match self {
            Self::Set { attr, .. } | Self::Delete { attr } => attr,
        }
    }
}

// ── Search scope ─────────────────────────────────────────────────────

/// How deep a search descends below its base DN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    /// The base entry only.
    Base,
    /// Direct children of the base (group listings).
    OneLevel,
    /// The full subtree (user listings).
    Subtree,
}

impl From<SearchScope> for Scope {
    fn from(scope: SearchScope) -> Self {
        match scope {
            SearchScope::Base => Scope::Base,
            SearchScope::OneLevel => Scope::OneLevel,
            SearchScope::Subtree => Scope::Subtree,
        }
    }
}

// ── Client trait ─────────────────────────────────────────────────────

/// The directory operations the domain layer depends on.
///
/// Implemented by [`LdapDirectory`] for real servers and by in-memory mocks
/// in tests.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Run a search and return raw entries in server order.
    ///
    /// `attrs` of `None` requests all user attributes.
    async fn search(
        &self,
        base: &str,
        scope: SearchScope,
        filter: &str,
        attrs: Option<&[&str]>,
    ) -> Result<Vec<RawEntry>, Error>;

    /// Apply an attribute diff to the entry at `dn`.
    async fn modify(&self, dn: &str, changes: Vec<AttributeChange>) -> Result<(), Error>;
}

// ── ldap3-backed implementation ──────────────────────────────────────

/// A bound connection to a real directory server.
pub struct LdapDirectory {
    ldap: Ldap,
    url: String,
}

impl LdapDirectory {
    /// Connect to the directory server. Does NOT bind — call
    /// [`simple_bind`](Self::simple_bind) with the service credentials next.
    pub async fn connect(host: &str, port: u16, transport: &TransportConfig) -> Result<Self, Error> {
        let url = transport.url(host, port);
        debug!(url = %url, "connecting to directory server");

        let (conn, ldap) = LdapConnAsync::with_settings(transport.settings(), &url)
            .await
            .map_err(|source| Error::Connect {
                url: url.clone(),
                source,
            })?;

        // Drive the connection in the background for the handle's lifetime.
        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "directory connection driver error");
            }
        });

        Ok(Self { ldap, url })
    }

    /// Authenticate with a simple bind.
    pub async fn simple_bind(&self, bind_dn: &str, password: &SecretString) -> Result<(), Error> {
        debug!(bind_dn = %bind_dn, "binding to directory");

        let mut ldap = self.ldap.clone();
        let result = ldap.simple_bind(bind_dn, password.expose_secret()).await?;

        match result.rc {
            0 => {
                info!(url = %self.url, "directory bind successful");
                Ok(())
            }
            49 => Err(Error::InvalidCredentials),
            rc => Err(Error::Bind {
                message: format!("rc {rc}: {}", result.text),
            }),
        }
    }

    /// Release the connection. Errors are reported, not fatal — the server
    /// side closes either way once the handle drops.
    pub async fn unbind(&self) -> Result<(), Error> {
        let mut ldap = self.ldap.clone();
        ldap.unbind().await?;
        debug!(url = %self.url, "directory connection released");
        Ok(())
    }
}

#[async_trait]
impl DirectoryClient for LdapDirectory {
    async fn search(
        &self,
        base: &str,
        scope: SearchScope,
        filter: &str,
        attrs: Option<&[&str]>,
    ) -> Result<Vec<RawEntry>, Error> {
        debug!(base, filter, ?scope, "directory search");

        let requested: Vec<&str> = attrs.map_or_else(|| vec!["*"], <[&str]>::to_vec);

        let mut ldap = self.ldap.clone();
        let (entries, _res) = ldap
            .search(base, scope.into(), filter, requested)
            .await?
            .success()
            .map_err(|e| match e {
                ldap3::LdapError::LdapResult { result } if result.rc == 32 => {
                    Error::NoSuchObject { dn: base.to_string() }
                }
                ldap3::LdapError::LdapResult { result } => Error::ResultCode {
                    op: "search",
                    code: result.rc,
                    text: result.text,
                },
                other => Error::Protocol(other),
            })?;

        Ok(entries
            .into_iter()
            .map(|re| RawEntry::from(SearchEntry::construct(re)))
            .collect())
    }

    async fn modify(&self, dn: &str, changes: Vec<AttributeChange>) -> Result<(), Error> {
        debug!(dn, changes = changes.len(), "directory modify");

        let mods: Vec<ldap3::Mod<String>> = changes
            .into_iter()
            .map(|change| match change {
                AttributeChange::Set { attr, values } => {
                    // Value order is not significant on the wire: directory
                    // attribute values form a set (RFC 4511).
                    ldap3::Mod::Replace(attr, values.into_iter().collect())
                }
                AttributeChange::Delete { attr } => ldap3::Mod::Delete(attr, HashSet::new()),
            })
            .collect();

        if mods.is_empty() {
            return Ok(());
        }

        let mut ldap = self.ldap.clone();
        let result = ldap.modify(dn, mods).await?;

        match result.rc {
            0 => Ok(()),
            32 => Err(Error::NoSuchObject { dn: dn.to_string() }),
            rc => Err(Error::ResultCode {
                op: "modify",
                code: rc,
                text: result.text,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_entry_attribute_names_case_insensitive() {
        let entry = RawEntry::new(
            "uid=alice,ou=users,dc=example,dc=com",
            [("objectClass".to_string(), vec!["inetOrgPerson".to_string()])],
        );

        assert_eq!(entry.first("objectclass"), Some("inetOrgPerson"));
        assert_eq!(entry.first("OBJECTCLASS"), Some("inetOrgPerson"));
        assert!(entry.has("objectClass"));
        assert_eq!(entry.values("objectclass").len(), 1);
    }

    #[test]
    fn test_raw_entry_missing_attribute() {
        let entry = RawEntry::new("cn=devs,ou=groups,dc=example,dc=com", []);
        assert_eq!(entry.first("cn"), None);
        assert!(entry.values("cn").is_empty());
        assert!(!entry.has("cn"));
    }

    #[test]
    fn test_attribute_change_constructors() {
        let set = AttributeChange::set("mobile", ["+1 555 0100".to_string()]);
        assert_eq!(set.attr(), "mobile");
        assert_eq!(
            set,
            AttributeChange::Set {
                attr: "mobile".into(),
                values: vec!["+1 555 0100".into()],
            }
        );

        let del = AttributeChange::delete("street");
        assert_eq!(del.attr(), "street");
        assert_eq!(del, AttributeChange::Delete { attr: "street".into() });
    }
}
