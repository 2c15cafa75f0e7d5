// ── Field-completeness statistics ──
//
// Ten aggregate metrics over the editable attribute set (everything the
// deployment exposes beyond the fixed defaults) across the visible user
// population. Computed fresh per request; nothing is cached.

use serde::Serialize;
use strum::{Display, EnumIter, EnumString};

use crate::model::{Contact, ContactAttribute};

/// One of the ten available statistics, named as exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Statistic {
    Entries,
    EntriesFilled,
    EntriesEmpty,
    EntriesFilledPercent,
    EntriesEmptyPercent,
    Users,
    UsersFilledEntries,
    UsersEmptyEntries,
    UsersFilledEntriesPercent,
    UsersEmptyEntriesPercent,
}

/// The full batch of statistics. Percentages are rounded to 2 decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatisticsReport {
    pub entries: u64,
    pub entries_filled: u64,
    pub entries_empty: u64,
    pub entries_filled_percent: f64,
    pub entries_empty_percent: f64,
    pub users: u64,
    pub users_filled_entries: u64,
    pub users_empty_entries: u64,
    pub users_filled_entries_percent: f64,
    pub users_empty_entries_percent: f64,
}

/// Computes completeness metrics over a contact population.
#[derive(Debug, Clone)]
pub struct StatisticsEngine {
    editable: Vec<ContactAttribute>,
}

impl StatisticsEngine {
    /// Build an engine over the editable subset of the given attributes:
    /// the configured set minus the fixed defaults.
    pub fn new(available: &[ContactAttribute]) -> Self {
        Self {
            editable: available
                .iter()
                .copied()
                .filter(|attr| !attr.is_default())
                .collect(),
        }
    }

    /// The editable attributes the metrics range over.
    pub fn editable(&self) -> &[ContactAttribute] {
        &self.editable
    }

    /// Compute all ten metrics in one pass over the population.
    ///
    /// Every metric is 0 when the editable set or the population is empty.
    pub fn report(&self, users: &[Contact]) -> StatisticsReport {
        if self.editable.is_empty() || users.is_empty() {
            return StatisticsReport::default();
        }

        let user_count = users.len() as u64;
        let entries = self.editable.len() as u64 * user_count;

        let mut entries_filled = 0u64;
        let mut users_filled_entries = 0u64;
        for user in users {
            let filled = self
                .editable
                .iter()
                .filter(|attr| user.get(**attr).is_some())
                .count() as u64;
            entries_filled += filled;
            if filled > 0 {
                users_filled_entries += 1;
            }
        }

        let entries_empty = entries - entries_filled;
        let users_empty_entries = user_count - users_filled_entries;

        StatisticsReport {
            entries,
            entries_filled,
            entries_empty,
            entries_filled_percent: percent(entries_filled, entries),
            entries_empty_percent: percent(entries_empty, entries),
            users: user_count,
            users_filled_entries,
            users_empty_entries,
            users_filled_entries_percent: percent(users_filled_entries, user_count),
            users_empty_entries_percent: percent(users_empty_entries, user_count),
        }
    }

    /// Compute one metric. Counts come back as whole numbers, percentages
    /// with 2-decimal rounding.
    pub fn value(&self, statistic: Statistic, users: &[Contact]) -> f64 {
        let report = self.report(users);
        match statistic {
            Statistic::Entries => report.entries as f64,
            Statistic::EntriesFilled => report.entries_filled as f64,
            Statistic::EntriesEmpty => report.entries_empty as f64,
            Statistic::EntriesFilledPercent => report.entries_filled_percent,
            Statistic::EntriesEmptyPercent => report.entries_empty_percent,
            Statistic::Users => report.users as f64,
            Statistic::UsersFilledEntries => report.users_filled_entries as f64,
            Statistic::UsersEmptyEntries => report.users_empty_entries as f64,
            Statistic::UsersFilledEntriesPercent => report.users_filled_entries_percent,
            Statistic::UsersEmptyEntriesPercent => report.users_empty_entries_percent,
        }
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round2(part as f64 / whole as f64 * 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;
    use crate::model::Contact;

    fn contact(fields: &[(ContactAttribute, &str)]) -> Contact {
        let mut c = Contact {
            name: "Test Contact".into(),
            ..Contact::default()
        };
        for (attr, value) in fields {
            c.set(*attr, *value);
        }
        c
    }

    fn engine(attrs: &[ContactAttribute]) -> StatisticsEngine {
        StatisticsEngine::new(attrs)
    }

    #[test]
    fn test_defaults_excluded_from_editable_set() {
        let e = engine(&[
            ContactAttribute::Mail,
            ContactAttribute::GivenName,
            ContactAttribute::Surname,
            ContactAttribute::Mobile,
        ]);
        assert_eq!(e.editable(), [ContactAttribute::Mobile]);
    }

    #[test]
    fn test_spec_scenario_alice_and_bob() {
        // Alice: mail filled, mobile empty. Bob: everything filled.
        // Editable set = {mobile, street}.
        let alice = contact(&[
            (ContactAttribute::GivenName, "Alice"),
            (ContactAttribute::Surname, "Smith"),
            (ContactAttribute::Mail, "alice@example.com"),
            (ContactAttribute::Street, "1 Main St"),
        ]);
        let bob = contact(&[
            (ContactAttribute::GivenName, "Bob"),
            (ContactAttribute::Surname, "Jones"),
            (ContactAttribute::Mail, "bob@example.com"),
            (ContactAttribute::Mobile, "+1 555 0101"),
            (ContactAttribute::Street, "2 Main St"),
        ]);
        let e = engine(&[
            ContactAttribute::Mail,
            ContactAttribute::GivenName,
            ContactAttribute::Surname,
            ContactAttribute::Mobile,
            ContactAttribute::Street,
        ]);

        let report = e.report(&[alice, bob]);
        assert_eq!(report.entries, 4);
        assert_eq!(report.entries_filled, 3);
        assert_eq!(report.entries_empty, 1);
        assert!((report.entries_filled_percent - 75.0).abs() < f64::EPSILON);
        assert_eq!(report.users, 2);
        assert_eq!(report.users_filled_entries, 2);
        assert_eq!(report.users_empty_entries, 0);
    }

    #[test]
    fn test_filled_plus_empty_equals_entries() {
        let users = vec![
            contact(&[(ContactAttribute::Mobile, "+1")]),
            contact(&[(ContactAttribute::Street, "x")]),
            contact(&[]),
        ];
        let e = engine(&[
            ContactAttribute::Mobile,
            ContactAttribute::Street,
            ContactAttribute::Description,
        ]);
        let report = e.report(&users);
        assert_eq!(report.entries_filled + report.entries_empty, report.entries);
        assert_eq!(
            report.users_filled_entries + report.users_empty_entries,
            report.users
        );
    }

    #[test]
    fn test_percentages_sum_to_100_within_tolerance() {
        let users = vec![
            contact(&[(ContactAttribute::Mobile, "+1")]),
            contact(&[]),
            contact(&[(ContactAttribute::Street, "x")]),
        ];
        let e = engine(&[ContactAttribute::Mobile, ContactAttribute::Street]);
        let report = e.report(&users);
        assert!(report.entries > 0);
        assert!((report.entries_filled_percent + report.entries_empty_percent - 100.0).abs() < 0.011);
    }

    #[test]
    fn test_all_zero_with_empty_editable_set() {
        let users = vec![contact(&[(ContactAttribute::Mobile, "+1")])];
        let e = engine(&[
            ContactAttribute::Mail,
            ContactAttribute::GivenName,
            ContactAttribute::Surname,
        ]);
        assert_eq!(e.report(&users), StatisticsReport::default());
        for stat in Statistic::iter() {
            assert!(e.value(stat, &users).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_all_zero_with_empty_population() {
        let e = engine(&[ContactAttribute::Mobile]);
        assert_eq!(e.report(&[]), StatisticsReport::default());
    }

    #[test]
    fn test_rounding_to_two_decimals() {
        // 1 of 3 filled -> 33.333...% rounds to 33.33.
        let users = vec![
            contact(&[(ContactAttribute::Mobile, "+1")]),
            contact(&[]),
            contact(&[]),
        ];
        let e = engine(&[ContactAttribute::Mobile]);
        let report = e.report(&users);
        assert!((report.entries_filled_percent - 33.33).abs() < f64::EPSILON);
        assert!((report.entries_empty_percent - 66.67).abs() < f64::EPSILON);
    }

    #[test]
    fn test_statistic_names_parse() {
        assert_eq!(
            Statistic::from_str("entries_filled_percent"),
            Ok(Statistic::EntriesFilledPercent)
        );
        assert_eq!(Statistic::from_str("users"), Ok(Statistic::Users));
        assert!(Statistic::from_str("bogus").is_err());
        assert_eq!(Statistic::Users.to_string(), "users");
    }
}
