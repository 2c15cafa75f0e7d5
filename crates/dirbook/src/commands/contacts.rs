//! Contact command handlers: listings, own record, self-service updates.

use tabled::Tabled;

use dirbook_core::{Contact, ContactAttribute, ContactService, LdapDirectory};

use crate::cli::{ContactsArgs, ContactsCommand, ContactsListArgs, ContactsUpdateArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    service: &ContactService<LdapDirectory>,
    args: ContactsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ContactsCommand::List(list_args) => list(service, list_args, global).await,
        ContactsCommand::Me => me(service, global).await,
        ContactsCommand::Update(update_args) => update(service, update_args, global).await,
    }
}

// ── Listing ──────────────────────────────────────────────────────────

#[derive(Tabled)]
struct ContactRow {
    #[tabled(rename = "#")]
    id: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Mail")]
    mail: String,
    #[tabled(rename = "Mobile")]
    mobile: String,
    #[tabled(rename = "Groups")]
    groups: String,
}

fn to_row(contact: &Contact) -> ContactRow {
    ContactRow {
        id: contact.id,
        name: contact.name.clone(),
        mail: contact.mail.clone().unwrap_or_default(),
        mobile: contact.mobile.clone().unwrap_or_default(),
        groups: contact
            .groups
            .iter()
            .map(|g| g.cn.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn contact_id(contact: &Contact) -> String {
    contact
        .mail
        .clone()
        .unwrap_or_else(|| contact.name.clone())
}

async fn list(
    service: &ContactService<LdapDirectory>,
    args: ContactsListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let contacts = if args.hidden {
        service.list_hidden_users().await?
    } else {
        service.list_visible_users().await?
    };

    let rendered = output::render_list(&global.output, &contacts, to_row, contact_id);
    output::print_output(&rendered, global.quiet);
    Ok(())
}

// ── Own record ───────────────────────────────────────────────────────

fn contact_detail(contact: &Contact) -> String {
    let mut lines = vec![format!("Name: {}", contact.name)];
    let fields = [
        ("Mail", &contact.mail),
        ("Street", &contact.street),
        ("Postal address", &contact.postal_address),
        ("Postal code", &contact.postal_code),
        ("Locality", &contact.locality),
        ("Home phone", &contact.home_phone),
        ("Mobile", &contact.mobile),
        ("Description", &contact.description),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            lines.push(format!("{label}: {value}"));
        }
    }
    if !contact.groups.is_empty() {
        let groups: Vec<&str> = contact.groups.iter().map(|g| g.cn.as_str()).collect();
        lines.push(format!("Groups: {}", groups.join(", ")));
    }
    lines.join("\n")
}

async fn me(
    service: &ContactService<LdapDirectory>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let contact = service.get_own_contact().await?;
    let rendered = output::render_single(&global.output, &contact, contact_detail, contact_id);
    output::print_output(&rendered, global.quiet);
    Ok(())
}

// ── Self-service update ──────────────────────────────────────────────

async fn update(
    service: &ContactService<LdapDirectory>,
    args: ContactsUpdateArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let changes = collect_changes(args);
    if changes.is_empty() {
        return Err(CliError::Validation {
            field: "fields".into(),
            reason: "pass at least one field flag (e.g. --mobile); an empty value clears the field"
                .into(),
        });
    }

    service.update_own_contact(&changes).await?;

    let message = output::status_line(
        "Contact updated",
        output::should_color(&global.color),
    );
    output::print_output(&message, global.quiet);
    Ok(())
}

fn collect_changes(args: ContactsUpdateArgs) -> Vec<(ContactAttribute, String)> {
    let flags = [
        (ContactAttribute::GivenName, args.givenname),
        (ContactAttribute::Surname, args.surname),
        (ContactAttribute::Street, args.street),
        (ContactAttribute::PostalAddress, args.postal_address),
        (ContactAttribute::PostalCode, args.postal_code),
        (ContactAttribute::Locality, args.locality),
        (ContactAttribute::HomePhone, args.home_phone),
        (ContactAttribute::Mobile, args.mobile),
        (ContactAttribute::Description, args.description),
    ];
    flags
        .into_iter()
        .filter_map(|(attr, value)| value.map(|v| (attr, v)))
        .collect()
}
