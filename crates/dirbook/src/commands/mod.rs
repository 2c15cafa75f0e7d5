//! Command handlers and the shared dispatch path.

pub mod config_cmd;
pub mod contacts;
pub mod groups;
pub mod stats;
pub mod visibility;

use dirbook_core::{ContactService, LdapDirectory};

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// Connect a directory session for the active profile and route the command.
///
/// The session is scoped: bind once, run the handler, release on every exit
/// path (including handler failure).
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let file_config = config::load_config_or_default();
    let (profile_name, profile) = config::active_profile(global, &file_config)?;
    let dir_config = config::resolve_directory_config(profile, &profile_name, global)?;
    let settings = config::resolve_settings(profile)?;
    let ctx = config::request_context(global);

    let outcome = ContactService::oneshot(dir_config, settings, ctx, |service| async move {
        Ok(route(cmd, &service, global).await)
    })
    .await;

    match outcome {
        Ok(handler_result) => handler_result,
        Err(core_err) => Err(with_profile(core_err.into(), &profile_name)),
    }
}

async fn route(
    cmd: Command,
    service: &ContactService<LdapDirectory>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Contacts(args) => contacts::handle(service, args, global).await,
        Command::Groups(args) => groups::handle(service, args, global).await,
        Command::Visibility(args) => visibility::handle(service, args, global).await,
        Command::Stats(args) => stats::handle(service, args, global).await,

        // Handled before a session is established.
        Command::Config(_) | Command::Completions(_) => unreachable!("handled in run()"),
    }
}

/// Attach the active profile name to auth failures for actionable help text.
fn with_profile(err: CliError, profile_name: &str) -> CliError {
    match err {
        CliError::AuthFailed { .. } => CliError::AuthFailed {
            profile: profile_name.to_string(),
        },
        other => other,
    }
}
