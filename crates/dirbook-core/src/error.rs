// ── Core error types ──
//
// User-facing errors from dirbook-core. These are NOT protocol-specific --
// consumers never see LDAP result codes or ldap3 failures directly.
// The `From<dirbook_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
///
/// The variant is the machine-checkable failure kind; `Display` carries the
/// human-readable message.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Resolution failures (routine, expected) ──────────────────────
    #[error("{what} '{identifier}' not found")]
    NotFound {
        what: &'static str,
        identifier: String,
    },

    // ── Transport failures ───────────────────────────────────────────
    #[error("Directory transport error: {message}")]
    Transport { message: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Caller input ─────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Unknown statistic '{name}'")]
    InvalidStatistic { name: String },

    // ── State conflicts ──────────────────────────────────────────────
    #[error("Conflict: {message}")]
    Conflict { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn not_found(what: &'static str, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            what,
            identifier: identifier.into(),
        }
    }

    /// Returns `true` if this is a routine resolution failure rather than an
    /// infrastructure problem.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<dirbook_api::Error> for CoreError {
    fn from(err: dirbook_api::Error) -> Self {
        use dirbook_api::Error as Api;

        match err {
            Api::Connect { url, source } => CoreError::Transport {
                message: format!("cannot connect to {url}: {source}"),
            },
            Api::InvalidCredentials => CoreError::AuthenticationFailed {
                message: "directory rejected the bind credentials".into(),
            },
            Api::Bind { message } => CoreError::AuthenticationFailed { message },
            Api::NoSuchObject { dn } => CoreError::not_found("entry", dn),
            Api::MissingParameter { param } => CoreError::Validation {
                message: format!("required parameter '{param}' was empty"),
            },
            Api::BadTemplate { template, token } => CoreError::Config {
                message: format!("filter template '{template}' is missing its {token} placeholder"),
            },
            Api::ResultCode { op, code, text } => CoreError::Transport {
                message: format!("{op} failed (rc {code}): {text}"),
            },
            Api::Protocol(e) => CoreError::Transport {
                message: e.to_string(),
            },
        }
    }
}
