//! Group command handlers.

use tabled::Tabled;

use dirbook_core::{ContactService, Group, LdapDirectory};

use crate::cli::{GlobalOpts, GroupsArgs, GroupsCommand, GroupsListArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    service: &ContactService<LdapDirectory>,
    args: GroupsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        GroupsCommand::List(list_args) => list(service, list_args, global).await,
    }
}

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "Name")]
    cn: String,
    #[tabled(rename = "Gid")]
    gid: String,
    #[tabled(rename = "DN")]
    dn: String,
}

fn to_row(group: &Group) -> GroupRow {
    GroupRow {
        cn: group.cn.clone(),
        gid: group.gid.clone().unwrap_or_default(),
        dn: group.dn.clone(),
    }
}

async fn list(
    service: &ContactService<LdapDirectory>,
    args: GroupsListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let groups = if args.hidden {
        service.list_hidden_groups().await?
    } else {
        service.list_visible_groups().await?
    };

    let rendered = output::render_list(&global.output, &groups, to_row, |g| g.cn.clone());
    output::print_output(&rendered, global.quiet);
    Ok(())
}
