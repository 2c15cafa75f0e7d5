use thiserror::Error;

/// Top-level error type for the `dirbook-api` crate.
///
/// Covers every failure mode of the protocol layer: connecting, binding,
/// searching, modifying, and filter construction. `dirbook-core` maps these
/// into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Connection ──────────────────────────────────────────────────
    /// TCP/TLS connection to the directory server failed.
    #[error("Cannot connect to directory at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: ldap3::LdapError,
    },

    /// Bind was rejected with a non-zero result code other than 49.
    #[error("Bind failed: {message}")]
    Bind { message: String },

    /// Bind rejected with invalidCredentials (result code 49).
    #[error("Invalid bind credentials")]
    InvalidCredentials,

    // ── Operations ──────────────────────────────────────────────────
    /// A search or modify completed at the protocol level but the server
    /// answered with a non-success result code.
    #[error("Directory {op} failed (rc {code}): {text}")]
    ResultCode {
        op: &'static str,
        code: u32,
        text: String,
    },

    /// The target entry does not exist (result code 32, noSuchObject).
    #[error("No such directory entry: {dn}")]
    NoSuchObject { dn: String },

    // ── Filter construction ─────────────────────────────────────────
    /// A by-identity filter was requested without the required value.
    #[error("Filter parameter '{param}' is required but was empty")]
    MissingParameter { param: &'static str },

    /// A configured filter template lacks its substitution placeholder.
    #[error("Filter template '{template}' is missing the {token} placeholder")]
    BadTemplate {
        template: &'static str,
        token: &'static str,
    },

    // ── Protocol ────────────────────────────────────────────────────
    /// Lower-level protocol error (connection dropped, codec failure, ...).
    #[error("Directory protocol error: {0}")]
    Protocol(#[from] ldap3::LdapError),
}

impl Error {
    /// Returns `true` if this error means the target entry is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoSuchObject { .. } | Self::ResultCode { code: 32, .. })
    }

    /// Returns `true` if this error indicates rejected credentials.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::InvalidCredentials | Self::Bind { .. })
    }

    /// Returns `true` for filter-construction failures (caller input, not
    /// server state).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter { .. } | Self::BadTemplate { .. }
        )
    }
}
