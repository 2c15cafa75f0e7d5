// Shared transport configuration for directory connections.
//
// The domain layer describes *how* to reach the server (scheme, timeout,
// certificate policy) with this type; `LdapDirectory::connect` turns it into
// `ldap3` connection settings.

use std::time::Duration;

use ldap3::LdapConnSettings;

/// Connection security mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    /// Plain LDAP (port 389 by convention).
    Plain,
    /// LDAP over TLS from the first byte (port 636 by convention).
    Ldaps,
    /// Plain connection upgraded via STARTTLS.
    StartTls,
}

/// Shared transport configuration for building directory connections.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    /// Accept any server certificate (self-signed directory servers).
    pub danger_accept_invalid_certs: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::Plain,
            timeout: Duration::from_secs(30),
            danger_accept_invalid_certs: false,
        }
    }
}

impl TransportConfig {
    /// Build `ldap3` connection settings from this config.
    pub fn settings(&self) -> LdapConnSettings {
        let mut settings = LdapConnSettings::new()
            .set_conn_timeout(self.timeout)
            .set_starttls(self.tls == TlsMode::StartTls);
        if self.danger_accept_invalid_certs {
            settings = settings.set_no_tls_verify(true);
        }
        settings
    }

    /// Build the connection URL for the given host and port.
    pub fn url(&self, host: &str, port: u16) -> String {
        let scheme = match self.tls {
            TlsMode::Ldaps => "ldaps",
            TlsMode::Plain | TlsMode::StartTls => "ldap",
        };
        format!("{scheme}://{host}:{port}")
    }
}
