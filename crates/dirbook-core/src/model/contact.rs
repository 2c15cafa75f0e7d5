// ── Contact entity ──

use std::cmp::Ordering;

use serde::Serialize;

use super::attribute::ContactAttribute;
use super::group::Group;

/// A normalized directory contact.
///
/// Attributes with no value are `None` and omitted from serialized output --
/// an empty string never appears in a returned record. `id` is the 1-based
/// position in the sorted listing, recomputed on every query; the dn is the
/// only stable reference across calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Contact {
    /// Position in the sorted result set, starting at 1. Presentational.
    pub id: usize,
    /// Display name derived from the given name and surname; never empty in
    /// a returned record.
    pub name: String,
    #[serde(rename = "givenname", skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(rename = "sn", skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(rename = "postaladdress", skip_serializing_if = "Option::is_none")]
    pub postal_address: Option<String>,
    #[serde(rename = "postalcode", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(rename = "l", skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(rename = "homephone", skip_serializing_if = "Option::is_none")]
    pub home_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Directory login name, when the entry exposes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Distinguished name; populated only when explicitly requested and
    /// stripped before results reach untrusted callers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dn: Option<String>,
    /// Groups this contact is a member of, sorted by cn.
    pub groups: Vec<Group>,
}

impl Contact {
    /// Read a recognized attribute.
    pub fn get(&self, attr: ContactAttribute) -> Option<&str> {
        let field = match attr {
            ContactAttribute::Mail => &self.mail,
            ContactAttribute::GivenName => &self.given_name,
            ContactAttribute::Surname => &self.surname,
            ContactAttribute::Street => &self.street,
            ContactAttribute::PostalAddress => &self.postal_address,
            ContactAttribute::PostalCode => &self.postal_code,
            ContactAttribute::Locality => &self.locality,
            ContactAttribute::HomePhone => &self.home_phone,
            ContactAttribute::Mobile => &self.mobile,
            ContactAttribute::Description => &self.description,
        };
        field.as_deref()
    }

    /// Write a recognized attribute.
    pub fn set(&mut self, attr: ContactAttribute, value: impl Into<String>) {
        let value = Some(value.into());
        match attr {
            ContactAttribute::Mail => self.mail = value,
            ContactAttribute::GivenName => self.given_name = value,
            ContactAttribute::Surname => self.surname = value,
            ContactAttribute::Street => self.street = value,
            ContactAttribute::PostalAddress => self.postal_address = value,
            ContactAttribute::PostalCode => self.postal_code = value,
            ContactAttribute::Locality => self.locality = value,
            ContactAttribute::HomePhone => self.home_phone = value,
            ContactAttribute::Mobile => self.mobile = value,
            ContactAttribute::Description => self.description = value,
        }
    }
}

// ── Sorting ──────────────────────────────────────────────────────────

/// Which name component leads the listing sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Given name first, surname breaks ties (the default).
    #[default]
    GivenName,
    /// Surname first, given name breaks ties.
    Surname,
}

/// Sort contacts ascending with case-sensitive lexical comparison, then
/// assign 1-based positional ids.
pub fn sort_and_number(contacts: &mut [Contact], order: SortOrder) {
    contacts.sort_by(|a, b| compare(a, b, order));
    for (index, contact) in contacts.iter_mut().enumerate() {
        contact.id = index + 1;
    }
}

fn compare(a: &Contact, b: &Contact, order: SortOrder) -> Ordering {
    let given_a = a.given_name.as_deref().unwrap_or_default();
    let given_b = b.given_name.as_deref().unwrap_or_default();
    let sur_a = a.surname.as_deref().unwrap_or_default();
    let sur_b = b.surname.as_deref().unwrap_or_default();

    match order {
        SortOrder::GivenName => given_a.cmp(given_b).then_with(|| sur_a.cmp(sur_b)),
        SortOrder::Surname => sur_a.cmp(sur_b).then_with(|| given_a.cmp(given_b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(given: &str, sur: &str) -> Contact {
        Contact {
            name: format!("{given} {sur}"),
            given_name: (!given.is_empty()).then(|| given.to_string()),
            surname: (!sur.is_empty()).then(|| sur.to_string()),
            ..Contact::default()
        }
    }

    fn names(contacts: &[Contact]) -> Vec<&str> {
        contacts.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_sort_by_given_name_with_surname_tiebreak() {
        let mut contacts = vec![
            contact("Bob", "Jones"),
            contact("Alice", "Smith"),
            contact("Alice", "Jones"),
        ];
        sort_and_number(&mut contacts, SortOrder::GivenName);
        assert_eq!(
            names(&contacts),
            ["Alice Jones", "Alice Smith", "Bob Jones"]
        );
    }

    #[test]
    fn test_sort_by_surname_with_given_name_tiebreak() {
        let mut contacts = vec![
            contact("Alice", "Smith"),
            contact("Bob", "Jones"),
            contact("Alice", "Jones"),
        ];
        sort_and_number(&mut contacts, SortOrder::Surname);
        assert_eq!(
            names(&contacts),
            ["Alice Jones", "Bob Jones", "Alice Smith"]
        );
    }

    #[test]
    fn test_sort_is_case_sensitive() {
        // Uppercase sorts before lowercase in lexical byte order.
        let mut contacts = vec![contact("alice", "x"), contact("Bob", "x")];
        sort_and_number(&mut contacts, SortOrder::GivenName);
        assert_eq!(names(&contacts), ["Bob x", "alice x"]);
    }

    #[test]
    fn test_ids_follow_sorted_positions() {
        let mut contacts = vec![contact("Bob", "Jones"), contact("Alice", "Smith")];
        sort_and_number(&mut contacts, SortOrder::GivenName);
        assert_eq!(contacts[0].id, 1);
        assert_eq!(contacts[0].name, "Alice Smith");
        assert_eq!(contacts[1].id, 2);
    }

    #[test]
    fn test_sort_is_deterministic_across_runs() {
        let build = || {
            vec![
                contact("Carol", "Adams"),
                contact("Alice", "Smith"),
                contact("Bob", "Jones"),
            ]
        };
        let mut first = build();
        let mut second = build();
        sort_and_number(&mut first, SortOrder::Surname);
        sort_and_number(&mut second, SortOrder::Surname);
        assert_eq!(first, second);
    }

    #[test]
    fn test_attribute_accessors_round_trip() {
        let mut c = Contact::default();
        c.set(ContactAttribute::Mobile, "+1 555 0100");
        assert_eq!(c.get(ContactAttribute::Mobile), Some("+1 555 0100"));
        assert_eq!(c.get(ContactAttribute::Street), None);
    }

    #[test]
    fn test_empty_attributes_skipped_in_serialization() {
        let c = contact("Alice", "Smith");
        let json = serde_json::to_value(&c).expect("contact serializes");
        assert!(json.get("mobile").is_none());
        assert!(json.get("dn").is_none());
        assert_eq!(json["givenname"], "Alice");
        assert_eq!(json["sn"], "Smith");
    }
}
