// Shared test fixture: an in-memory directory implementing `DirectoryClient`.
//
// Entries live in a dn-keyed store; searches are routed by exact filter
// string to a list of dns and always serve the *current* entry state, so
// state-machine tests observe their own writes. Every call is logged for
// assertions on round-trip counts.

#![allow(dead_code)] // not every test binary exercises every helper

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use dirbook_api::{AttributeChange, DirectoryClient, Error, RawEntry, SearchScope};

#[derive(Debug, Clone)]
pub struct SearchCall {
    pub base: String,
    pub scope: SearchScope,
    pub filter: String,
    pub attrs: Option<Vec<String>>,
}

#[derive(Default)]
struct MockState {
    /// dn -> ordered attribute list (names stored lowercase).
    entries: BTreeMap<String, Vec<(String, Vec<String>)>>,
    /// exact filter string -> dns served.
    routes: Vec<(String, Vec<String>)>,
    /// filters that answer with an injected transport failure.
    fail_filters: Vec<String>,
    searches: Vec<SearchCall>,
    modifies: Vec<(String, Vec<AttributeChange>)>,
}

#[derive(Clone, Default)]
pub struct MockDirectory {
    state: Arc<Mutex<MockState>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_entry(&self, dn: &str, attrs: &[(&str, &[&str])]) {
        let attrs = attrs
            .iter()
            .map(|(name, values)| {
                (
                    name.to_lowercase(),
                    values.iter().map(|v| (*v).to_string()).collect(),
                )
            })
            .collect();
        self.state
            .lock()
            .expect("mock state lock")
            .entries
            .insert(dn.to_string(), attrs);
    }

    /// Serve the given dns (in order) for an exact filter string.
    pub fn route(&self, filter: &str, dns: &[&str]) {
        self.state.lock().expect("mock state lock").routes.push((
            filter.to_string(),
            dns.iter().map(|d| (*d).to_string()).collect(),
        ));
    }

    /// Answer searches for the given filter with a transport failure.
    pub fn fail_on(&self, filter: &str) {
        self.state
            .lock()
            .expect("mock state lock")
            .fail_filters
            .push(filter.to_string());
    }

    pub fn search_log(&self) -> Vec<SearchCall> {
        self.state.lock().expect("mock state lock").searches.clone()
    }

    pub fn modify_log(&self) -> Vec<(String, Vec<AttributeChange>)> {
        self.state.lock().expect("mock state lock").modifies.clone()
    }

    /// Current values of an attribute on a stored entry.
    pub fn attr_values(&self, dn: &str, attr: &str) -> Vec<String> {
        let state = self.state.lock().expect("mock state lock");
        state
            .entries
            .get(dn)
            .and_then(|attrs| {
                attrs
                    .iter()
                    .find(|(name, _)| name == &attr.to_lowercase())
                    .map(|(_, values)| values.clone())
            })
            .unwrap_or_default()
    }

    pub fn has_attr(&self, dn: &str, attr: &str) -> bool {
        !self.attr_values(dn, attr).is_empty()
    }
}

#[async_trait]
impl DirectoryClient for MockDirectory {
    async fn search(
        &self,
        base: &str,
        scope: SearchScope,
        filter: &str,
        attrs: Option<&[&str]>,
    ) -> Result<Vec<RawEntry>, Error> {
        let mut state = self.state.lock().expect("mock state lock");
        state.searches.push(SearchCall {
            base: base.to_string(),
            scope,
            filter: filter.to_string(),
            attrs: attrs.map(|a| a.iter().map(|s| (*s).to_string()).collect()),
        });

        if state.fail_filters.iter().any(|f| f == filter) {
            return Err(Error::ResultCode {
                op: "search",
                code: 1,
                text: "injected failure".into(),
            });
        }

        let dns = state
            .routes
            .iter()
            .find(|(f, _)| f == filter)
            .map(|(_, dns)| dns.clone())
            .unwrap_or_default();

        Ok(dns
            .iter()
            .filter_map(|dn| {
                state
                    .entries
                    .get(dn)
                    .map(|attrs| RawEntry::new(dn.clone(), attrs.iter().cloned()))
            })
            .collect())
    }

    async fn modify(&self, dn: &str, changes: Vec<AttributeChange>) -> Result<(), Error> {
        let mut state = self.state.lock().expect("mock state lock");
        state.modifies.push((dn.to_string(), changes.clone()));

        let Some(entry) = state.entries.get_mut(dn) else {
            return Err(Error::NoSuchObject { dn: dn.to_string() });
        };

        for change in changes {
            match change {
                AttributeChange::Set { attr, values } => {
                    let key = attr.to_lowercase();
                    if let Some(slot) = entry.iter_mut().find(|(name, _)| name == &key) {
                        slot.1 = values;
                    } else {
                        entry.push((key, values));
                    }
                }
                AttributeChange::Delete { attr } => {
                    let key = attr.to_lowercase();
                    entry.retain(|(name, _)| name != &key);
                }
            }
        }
        Ok(())
    }
}
