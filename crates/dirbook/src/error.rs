//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use dirbook_core::CoreError;

/// Exit codes per the CLI conventions.
#[allow(dead_code)]
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(dead_code)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the directory server")]
    #[diagnostic(
        code(dirbook::connection_failed),
        help(
            "Check that the directory server is running and accessible.\n\
             {reason}\n\
             For self-signed certificates, try --insecure (-k)."
        )
    )]
    ConnectionFailed { reason: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Directory bind failed")]
    #[diagnostic(
        code(dirbook::auth_failed),
        help(
            "Verify the bind DN and password for profile '{profile}'.\n\
             Run: dirbook config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String },

    #[error("No bind password configured for profile '{profile}'")]
    #[diagnostic(
        code(dirbook::no_credentials),
        help(
            "Store one with: dirbook config set-password --profile {profile}\n\
             Or set the profile's password_env variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(dirbook::not_found),
        help("Run: dirbook {list_command} to see available entries")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Conflict: {message}")]
    #[diagnostic(code(dirbook::conflict))]
    Conflict { message: String },

    // ── Directory ────────────────────────────────────────────────────

    #[error("Directory error: {message}")]
    #[diagnostic(code(dirbook::directory_error))]
    DirectoryError { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(dirbook::validation))]
    Validation { field: String, reason: String },

    #[error("Unknown statistic '{name}'")]
    #[diagnostic(
        code(dirbook::unknown_statistic),
        help("Run: dirbook stats all to see every available statistic")
    )]
    UnknownStatistic { name: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(dirbook::profile_not_found),
        help("Available profiles: {available}\nList them with: dirbook config profiles")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(dirbook::no_config),
        help("Expected at: {path}\nCreate it and add a [profiles.<name>] section.")
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(dirbook::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(dirbook::json))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::UnknownStatistic { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { what, identifier } => CliError::NotFound {
                list_command: match what {
                    "group" => "groups list".into(),
                    _ => "contacts list".into(),
                },
                resource_type: what.to_string(),
                identifier,
            },

            CoreError::Transport { message } => CliError::ConnectionFailed { reason: message },

            CoreError::AuthenticationFailed { message: _ } => CliError::AuthFailed {
                profile: "current".into(),
            },

            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::InvalidStatistic { name } => CliError::UnknownStatistic { name },

            CoreError::Conflict { message } => CliError::Conflict { message },

            CoreError::Config { message } => CliError::Validation {
                field: "configuration".into(),
                reason: message,
            },
        }
    }
}

impl From<dirbook_config::ConfigError> for CliError {
    fn from(err: dirbook_config::ConfigError) -> Self {
        match err {
            dirbook_config::ConfigError::NoCredentials { profile } => {
                CliError::NoCredentials { profile }
            }
            dirbook_config::ConfigError::Validation { field, reason } => {
                CliError::Validation { field, reason }
            }
            dirbook_config::ConfigError::Figment(e) => CliError::Config(e),
            dirbook_config::ConfigError::Io(e) => CliError::Io(e),
            dirbook_config::ConfigError::Serialization(e) => CliError::Validation {
                field: "configuration".into(),
                reason: e.to_string(),
            },
        }
    }
}
