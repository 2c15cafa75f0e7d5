//! Visibility command handlers: hide/show for users and groups.

use dirbook_core::{ContactService, LdapDirectory, ToggleOutcome};

use crate::cli::{GlobalOpts, VisibilityArgs, VisibilityCommand};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    service: &ContactService<LdapDirectory>,
    args: VisibilityArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (outcome, applied_msg, unchanged_msg) = match args.command {
        VisibilityCommand::HideUser { identity } => (
            service.hide_user(&identity).await?,
            "User is now hidden",
            "User was already hidden",
        ),
        VisibilityCommand::ShowUser { identity } => (
            service.show_user(&identity).await?,
            "User is now visible again",
            "User was already visible",
        ),
        VisibilityCommand::HideGroup { gid } => (
            service.hide_group(&gid).await?,
            "Group is now hidden",
            "Group was already hidden",
        ),
        VisibilityCommand::ShowGroup { gid } => (
            service.show_group(&gid).await?,
            "Group is now visible again",
            "Group was already visible",
        ),
    };

    let message = match outcome {
        ToggleOutcome::Applied => applied_msg,
        ToggleOutcome::Unchanged => unchanged_msg,
    };
    output::print_output(
        &output::status_line(message, output::should_color(&global.color)),
        global.quiet,
    );
    Ok(())
}
