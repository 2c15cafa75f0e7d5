//! Shared configuration for the dirbook CLI.
//!
//! TOML profiles, credential resolution (env var + keyring + plaintext),
//! and translation to `dirbook_core::DirectoryConfig`. The CLI adds
//! flag-aware wrappers on top.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dirbook_api::{FilterTemplates, TlsMode};
use dirbook_core::{ContactAttribute, DirectoryConfig, SettingsProvider, SortOrder};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no bind password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named directory profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named directory profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Directory server hostname.
    pub host: String,

    /// Directory server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Security mode: "plain", "ldaps", or "starttls".
    #[serde(default = "default_tls")]
    pub tls: String,

    /// Accept self-signed server certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Base DN for user entries.
    pub user_base: String,

    /// Base DN for group entries.
    pub group_base: String,

    /// Service account bind DN.
    pub bind_dn: String,

    /// Bind password (plaintext — prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the bind password.
    pub password_env: Option<String>,

    /// Base predicate selecting user entries.
    #[serde(default = "default_user_filter")]
    pub user_filter: String,

    /// Identity lookup template (`%uid` placeholder).
    #[serde(default = "default_user_login_filter")]
    pub user_login_filter: String,

    /// Base predicate selecting group entries.
    #[serde(default = "default_group_filter")]
    pub group_filter: String,

    /// Group lookup template (`%gid` placeholder).
    #[serde(default = "default_group_gid_filter")]
    pub group_gid_filter: String,

    /// Object class marking hidden entries.
    #[serde(default = "default_hidden_class")]
    pub hidden_class: String,

    /// Attribute carrying the directory username.
    #[serde(default = "default_login_attribute")]
    pub login_attribute: String,

    /// Contact attributes this deployment exposes.
    #[serde(default = "default_attributes")]
    pub attributes: Vec<String>,

    /// Listing sort order: "givenname" (default) or "surname"/"lastname".
    #[serde(default)]
    pub sort_order: Option<String>,

    /// Per-user sort order overrides, keyed by user id.
    #[serde(default)]
    pub sort_overrides: HashMap<String, String>,

    /// Concurrent group-membership lookups per listing (1 = sequential).
    #[serde(default = "default_group_fanout")]
    pub group_fanout: usize,

    /// Override request timeout (seconds).
    pub timeout: Option<u64>,
}

fn default_port() -> u16 {
    389
}
fn default_tls() -> String {
    "plain".into()
}
fn default_user_filter() -> String {
    "(objectClass=inetOrgPerson)".into()
}
fn default_user_login_filter() -> String {
    "(&(objectClass=inetOrgPerson)(mail=%uid))".into()
}
fn default_group_filter() -> String {
    "(objectClass=posixGroup)".into()
}
fn default_group_gid_filter() -> String {
    "(&(objectClass=posixGroup)(gidNumber=%gid))".into()
}
fn default_hidden_class() -> String {
    "shadowAccount".into()
}
fn default_login_attribute() -> String {
    "uid".into()
}
fn default_group_fanout() -> usize {
    8
}
fn default_attributes() -> Vec<String> {
    vec![
        "mail".into(),
        "givenname".into(),
        "sn".into(),
        "street".into(),
        "postaladdress".into(),
        "postalcode".into(),
        "l".into(),
        "homephone".into(),
        "mobile".into(),
        "description".into(),
    ]
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "dirbook", "dirbook").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("dirbook");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load a Config from an explicit path + environment (used by tests).
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("DIRBOOK_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the bind password from the credential chain:
/// profile's env var, then the system keyring, then plaintext config.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new("dirbook", &format!("{profile_name}/bind-password")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref password) = profile.password {
        return Ok(SecretString::from(password.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store the bind password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new("dirbook", &format!("{profile_name}/bind-password")).map_err(
        |e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        },
    )?;
    entry
        .set_password(password)
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}

// ── Profile translation ─────────────────────────────────────────────

fn parse_tls(raw: &str) -> Result<TlsMode, ConfigError> {
    match raw {
        "plain" => Ok(TlsMode::Plain),
        "ldaps" => Ok(TlsMode::Ldaps),
        "starttls" => Ok(TlsMode::StartTls),
        other => Err(ConfigError::Validation {
            field: "tls".into(),
            reason: format!("expected 'plain', 'ldaps', or 'starttls', got '{other}'"),
        }),
    }
}

fn parse_sort_order(raw: &str) -> Result<SortOrder, ConfigError> {
    match raw {
        "givenname" | "firstname" => Ok(SortOrder::GivenName),
        "surname" | "lastname" => Ok(SortOrder::Surname),
        other => Err(ConfigError::Validation {
            field: "sort_order".into(),
            reason: format!("expected 'givenname' or 'surname', got '{other}'"),
        }),
    }
}

fn parse_attributes(raw: &[String]) -> Result<Vec<ContactAttribute>, ConfigError> {
    raw.iter()
        .map(|name| {
            ContactAttribute::from_str(name).map_err(|_| ConfigError::Validation {
                field: "attributes".into(),
                reason: format!("unknown contact attribute '{name}'"),
            })
        })
        .collect()
}

/// Build a `DirectoryConfig` from a profile, resolving credentials through
/// the chain.
pub fn profile_to_directory_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<DirectoryConfig, ConfigError> {
    let bind_password = resolve_password(profile, profile_name)?;

    Ok(DirectoryConfig {
        host: profile.host.clone(),
        port: profile.port,
        tls: parse_tls(&profile.tls)?,
        danger_accept_invalid_certs: profile.insecure,
        user_base_dn: profile.user_base.clone(),
        group_base_dn: profile.group_base.clone(),
        bind_dn: profile.bind_dn.clone(),
        bind_password,
        protocol_version: 3,
        filters: FilterTemplates {
            user_base: profile.user_filter.clone(),
            user_login: profile.user_login_filter.clone(),
            group_base: profile.group_filter.clone(),
            group_gid: profile.group_gid_filter.clone(),
            hidden_class: profile.hidden_class.clone(),
        },
        login_attribute: profile.login_attribute.clone(),
        group_fanout: profile.group_fanout,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(default_timeout())),
    })
}

// ── File-backed settings provider ───────────────────────────────────

/// `SettingsProvider` backed by a profile: the exposed attribute set plus
/// the default and per-user sort orders.
#[derive(Debug, Clone)]
pub struct FileSettings {
    attributes: Vec<ContactAttribute>,
    default_order: SortOrder,
    overrides: HashMap<String, SortOrder>,
}

impl FileSettings {
    pub fn from_profile(profile: &Profile) -> Result<Self, ConfigError> {
        let attributes = parse_attributes(&profile.attributes)?;
        let default_order = profile
            .sort_order
            .as_deref()
            .map(parse_sort_order)
            .transpose()?
            .unwrap_or_default();
        let overrides = profile
            .sort_overrides
            .iter()
            .map(|(user, raw)| Ok((user.clone(), parse_sort_order(raw)?)))
            .collect::<Result<_, ConfigError>>()?;

        Ok(Self {
            attributes,
            default_order,
            overrides,
        })
    }
}

impl SettingsProvider for FileSettings {
    fn available_attributes(&self) -> Vec<ContactAttribute> {
        self.attributes.clone()
    }

    fn sort_order(&self, user_id: &str) -> SortOrder {
        self.overrides
            .get(user_id)
            .copied()
            .unwrap_or(self.default_order)
    }
}
