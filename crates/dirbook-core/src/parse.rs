// ── Raw-entry-to-domain conversions ──
//
// Bridges raw `dirbook_api` search results into canonical domain types.
// Parsing tolerates partial data: multi-valued attributes collapse to their
// first value, blank values are dropped rather than kept as empty strings,
// and malformed entries are skipped, never fatal.

use strum::IntoEnumIterator;
use tracing::debug;

use dirbook_api::RawEntry;

use crate::model::{Contact, ContactAttribute, Group};

/// Parse user entries into contacts, preserving input order.
///
/// An entry is skipped when its dn is missing/blank or when both name
/// components are absent -- a contact has to have a name. The dn is always
/// populated here; the repository strips it unless explicitly requested.
pub fn users(entries: &[RawEntry]) -> Vec<Contact> {
    entries.iter().filter_map(user).collect()
}

fn user(entry: &RawEntry) -> Option<Contact> {
    if entry.dn.trim().is_empty() {
        debug!("skipping user entry without dn");
        return None;
    }

    let mut contact = Contact::default();
    for attr in ContactAttribute::iter() {
        if let Some(value) = non_blank(entry.first(attr.ldap_name())) {
            contact.set(attr, value);
        }
    }

    contact.name = display_name(
        contact.given_name.as_deref(),
        contact.surname.as_deref(),
    )?;
    contact.uid = non_blank(entry.first("uid")).map(str::to_string);
    contact.dn = Some(entry.dn.trim().to_string());

    Some(contact)
}

/// Parse group entries, preserving input order.
///
/// Entries without a dn or cn are skipped; gidNumber is optional.
pub fn groups(entries: &[RawEntry]) -> Vec<Group> {
    entries
        .iter()
        .filter_map(|entry| {
            if entry.dn.trim().is_empty() {
                debug!("skipping group entry without dn");
                return None;
            }
            let cn = non_blank(entry.first("cn"))?;
            Some(Group {
                dn: entry.dn.trim().to_string(),
                cn: cn.to_string(),
                gid: non_blank(entry.first("gidnumber")).map(str::to_string),
            })
        })
        .collect()
}

// ── Helpers ────────────────────────────────────────────────────────

/// Trim a raw attribute value, dropping it entirely when blank.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Join the present name components with a single space; `None` when both
/// are absent.
fn display_name(given: Option<&str>, surname: Option<&str>) -> Option<String> {
    match (given, surname) {
        (Some(g), Some(s)) => Some(format!("{g} {s}")),
        (Some(g), None) => Some(g.to_string()),
        (None, Some(s)) => Some(s.to_string()),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(dn: &str, attrs: &[(&str, &[&str])]) -> RawEntry {
        RawEntry::new(
            dn,
            attrs.iter().map(|(name, values)| {
                (
                    (*name).to_string(),
                    values.iter().map(|v| (*v).to_string()).collect(),
                )
            }),
        )
    }

    #[test]
    fn test_parse_full_user() {
        let raw = entry(
            "uid=asmith,ou=users,dc=example,dc=com",
            &[
                ("givenname", &["Alice"]),
                ("sn", &["Smith"]),
                ("mail", &["alice@example.com"]),
                ("mobile", &["+1 555 0100"]),
                ("uid", &["asmith"]),
            ],
        );

        let contacts = users(&[raw]);
        assert_eq!(contacts.len(), 1);
        let c = &contacts[0];
        assert_eq!(c.name, "Alice Smith");
        assert_eq!(c.mail.as_deref(), Some("alice@example.com"));
        assert_eq!(c.mobile.as_deref(), Some("+1 555 0100"));
        assert_eq!(c.uid.as_deref(), Some("asmith"));
        assert_eq!(c.dn.as_deref(), Some("uid=asmith,ou=users,dc=example,dc=com"));
        assert_eq!(c.street, None);
    }

    #[test]
    fn test_multi_valued_attributes_take_first_trimmed() {
        let raw = entry(
            "uid=a,ou=users,dc=example,dc=com",
            &[
                ("givenname", &["  Alice  ", "Alicia"]),
                ("sn", &["Smith"]),
            ],
        );
        let contacts = users(&[raw]);
        assert_eq!(contacts[0].given_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_nameless_entry_skipped() {
        let raw = entry(
            "uid=ghost,ou=users,dc=example,dc=com",
            &[("mail", &["ghost@example.com"]), ("givenname", &["  "])],
        );
        assert!(users(&[raw]).is_empty());
    }

    #[test]
    fn test_single_name_component_is_enough() {
        let only_given = entry("uid=a,ou=u,dc=e", &[("givenname", &["Alice"])]);
        let only_surname = entry("uid=b,ou=u,dc=e", &[("sn", &["Jones"])]);
        let contacts = users(&[only_given, only_surname]);
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].name, "Alice");
        assert_eq!(contacts[1].name, "Jones");
    }

    #[test]
    fn test_blank_values_are_dropped_not_empty() {
        let raw = entry(
            "uid=a,ou=u,dc=e",
            &[("givenname", &["Alice"]), ("street", &["   "])],
        );
        let contacts = users(&[raw]);
        assert_eq!(contacts[0].street, None);
    }

    #[test]
    fn test_entry_without_dn_skipped() {
        let raw = entry("", &[("givenname", &["Alice"]), ("sn", &["Smith"])]);
        assert!(users(&[raw]).is_empty());
    }

    #[test]
    fn test_output_mirrors_input_order() {
        let first = entry("uid=b,ou=u,dc=e", &[("givenname", &["Bob"])]);
        let second = entry("uid=a,ou=u,dc=e", &[("givenname", &["Alice"])]);
        let contacts = users(&[first, second]);
        assert_eq!(contacts[0].name, "Bob");
        assert_eq!(contacts[1].name, "Alice");
    }

    #[test]
    fn test_parse_groups() {
        let raw = vec![
            entry(
                "cn=devs,ou=groups,dc=example,dc=com",
                &[("cn", &["devs"]), ("gidnumber", &["5000"])],
            ),
            entry("cn=nameless,ou=groups,dc=example,dc=com", &[]),
            entry(
                "cn=ops,ou=groups,dc=example,dc=com",
                &[("cn", &["ops"])],
            ),
        ];

        let parsed = groups(&raw);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].cn, "devs");
        assert_eq!(parsed[0].gid.as_deref(), Some("5000"));
        assert_eq!(parsed[1].cn, "ops");
        assert_eq!(parsed[1].gid, None);
    }
}
