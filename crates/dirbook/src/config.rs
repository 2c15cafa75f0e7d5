//! CLI-side configuration resolution: profile selection plus flag overrides.

use std::sync::Arc;
use std::time::Duration;

use dirbook_config::{Config, FileSettings, Profile};
use dirbook_core::{DirectoryConfig, RequestContext, SettingsProvider};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use dirbook_config::{config_path, load_config_or_default};

/// The profile name selected by flags, env, or the config default.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Look up the active profile, with a helpful listing when it is missing.
pub fn active_profile<'a>(
    global: &GlobalOpts,
    config: &'a Config,
) -> Result<(String, &'a Profile), CliError> {
    let name = active_profile_name(global, config);
    if let Some(profile) = config.profiles.get(&name) {
        return Ok((name, profile));
    }

    if config.profiles.is_empty() {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    }
    let mut available: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
    available.sort_unstable();
    Err(CliError::ProfileNotFound {
        name,
        available: available.join(", "),
    })
}

/// Resolve a profile into a `DirectoryConfig`, applying CLI flag overrides.
pub fn resolve_directory_config(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<DirectoryConfig, CliError> {
    let mut config = dirbook_config::profile_to_directory_config(profile, profile_name)?;

    if global.insecure {
        config.danger_accept_invalid_certs = true;
    }
    if let Some(timeout) = global.timeout {
        config.timeout = Duration::from_secs(timeout);
    }

    Ok(config)
}

/// Build the settings provider for a profile.
pub fn resolve_settings(profile: &Profile) -> Result<Arc<dyn SettingsProvider>, CliError> {
    Ok(Arc::new(FileSettings::from_profile(profile)?))
}

/// Build the per-request context from global flags.
///
/// The user id keys per-user preferences (sort order); the mail address is
/// what own-contact operations resolve against.
pub fn request_context(global: &GlobalOpts) -> RequestContext {
    let user_id = global
        .user
        .clone()
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_else(|| "default".into());
    RequestContext::new(user_id, global.mail.clone())
}
