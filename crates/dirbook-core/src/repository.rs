// ── Contact repository ──
//
// Orchestrates filter construction, directory searches, entry parsing, and
// group-membership enrichment into ordered contact listings. All per-request
// state lives in the `RequestContext` handed to each operation -- nothing is
// cached across calls.

use std::sync::Arc;

use futures_util::{StreamExt, stream};
use tracing::{debug, warn};

use dirbook_api::{
    AttributeChange, DirectoryClient, FilterBuilder, GroupFilter, SearchScope, UserFilter,
};

use crate::config::DirectoryConfig;
use crate::error::CoreError;
use crate::model::contact::sort_and_number;
use crate::model::{Contact, ContactAttribute, Group, Visibility};
use crate::parse;
use crate::settings::SettingsProvider;

// ── Request context ──────────────────────────────────────────────────

/// Per-request identity of the caller.
///
/// Replaces ambient session state: every repository operation receives the
/// bound user explicitly.
#[derive(Debug, Clone)]
pub struct RequestContext {
    user_id: String,
    mail: Option<String>,
}

impl RequestContext {
    /// A blank mail address is normalized to `None` -- an account without a
    /// mail value can browse but never resolves to its own entry.
    pub fn new(user_id: impl Into<String>, mail: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            mail: mail.map(|m| m.trim().to_string()).filter(|m| !m.is_empty()),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn bound_mail(&self) -> Option<&str> {
        self.mail.as_deref()
    }

    /// The bound mail, or `NotFound` -- checked before any directory round
    /// trip is issued.
    pub(crate) fn require_mail(&self) -> Result<&str, CoreError> {
        self.mail
            .as_deref()
            .ok_or_else(|| CoreError::not_found("contact", "no mail address bound to the session"))
    }
}

// ── Repository ───────────────────────────────────────────────────────

/// Read/derive/update operations over the contact and group trees.
pub struct ContactRepository<D> {
    dir: D,
    config: DirectoryConfig,
    settings: Arc<dyn SettingsProvider>,
    filters: FilterBuilder,
}

impl<D: DirectoryClient> ContactRepository<D> {
    pub fn new(
        dir: D,
        config: DirectoryConfig,
        settings: Arc<dyn SettingsProvider>,
    ) -> Result<Self, CoreError> {
        let filters = config.filter_builder()?;
        Ok(Self {
            dir,
            config,
            settings,
            filters,
        })
    }

    pub fn directory(&self) -> &D {
        &self.dir
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    pub fn settings(&self) -> &Arc<dyn SettingsProvider> {
        &self.settings
    }

    pub(crate) fn filters(&self) -> &FilterBuilder {
        &self.filters
    }

    // ── Listings ─────────────────────────────────────────────────────

    /// List users on one side of the visibility predicate, enriched with
    /// group membership, sorted per the caller's preference, numbered from 1.
    /// The dn never leaves this method.
    pub async fn list_users(
        &self,
        ctx: &RequestContext,
        visibility: Visibility,
    ) -> Result<Vec<Contact>, CoreError> {
        let kind = match visibility {
            Visibility::Visible => UserFilter::Visible,
            Visibility::Hidden => UserFilter::Hidden,
        };
        let filter = self.filters.users(kind)?;
        let raw = self
            .dir
            .search(&self.config.user_base_dn, SearchScope::Subtree, &filter, None)
            .await?;

        let mut contacts = parse::users(&raw);
        self.attach_groups(&mut contacts).await;
        for contact in &mut contacts {
            contact.dn = None;
        }
        sort_and_number(&mut contacts, self.settings.sort_order(&ctx.user_id));

        debug!(count = contacts.len(), ?visibility, "listed users");
        Ok(contacts)
    }

    /// List groups on one side of the visibility predicate, sorted by cn.
    pub async fn list_groups(&self, visibility: Visibility) -> Result<Vec<Group>, CoreError> {
        let kind = match visibility {
            Visibility::Visible => GroupFilter::Visible,
            Visibility::Hidden => GroupFilter::Hidden,
        };
        let filter = self.filters.groups(kind)?;
        let raw = self
            .dir
            .search(
                &self.config.group_base_dn,
                SearchScope::OneLevel,
                &filter,
                None,
            )
            .await?;

        let mut groups = parse::groups(&raw);
        groups.sort_by(|a, b| a.cn.cmp(&b.cn));

        debug!(count = groups.len(), ?visibility, "listed groups");
        Ok(groups)
    }

    // ── Single-user lookups ──────────────────────────────────────────

    /// Look up the single user matching the given mail address.
    pub async fn get_user(&self, mail: &str) -> Result<Contact, CoreError> {
        self.find_by_login(mail, false)
            .await?
            .ok_or_else(|| CoreError::not_found("contact", mail))
    }

    /// The bound caller's own contact record. Fails with `NotFound` before
    /// any search when no mail is bound to the session.
    pub async fn own_contact(&self, ctx: &RequestContext) -> Result<Contact, CoreError> {
        let mail = ctx.require_mail()?;
        self.get_user(mail).await
    }

    /// Resolve the bound caller's dn for a self-update.
    async fn own_dn(&self, ctx: &RequestContext) -> Result<String, CoreError> {
        let mail = ctx.require_mail()?;
        let contact = self
            .find_by_login(mail, true)
            .await?
            .ok_or_else(|| CoreError::not_found("contact", mail))?;
        contact
            .dn
            .filter(|dn| !dn.trim().is_empty())
            .ok_or_else(|| CoreError::not_found("contact", mail))
    }

    async fn find_by_login(
        &self,
        identity: &str,
        keep_dn: bool,
    ) -> Result<Option<Contact>, CoreError> {
        let filter = self.filters.users(UserFilter::ByLogin(identity))?;
        let raw = self
            .dir
            .search(&self.config.user_base_dn, SearchScope::Subtree, &filter, None)
            .await?;

        let mut contacts = parse::users(&raw);
        if contacts.is_empty() {
            return Ok(None);
        }
        // The login attribute is unique per deployment; the first entry is
        // the entry.
        let mut contact = contacts.swap_remove(0);
        contact.groups = self.groups_or_empty(contact.mail.clone()).await;
        contact.id = 1;
        if !keep_dn {
            contact.dn = None;
        }
        Ok(Some(contact))
    }

    // ── Self-service update ──────────────────────────────────────────

    /// Update the bound caller's own entry.
    ///
    /// Each change with a blank trimmed value deletes the attribute; every
    /// other change replaces it. The mail attribute is the login key and is
    /// never self-served.
    pub async fn update_self(
        &self,
        ctx: &RequestContext,
        changes: &[(ContactAttribute, String)],
    ) -> Result<(), CoreError> {
        if changes.iter().any(|(attr, _)| *attr == ContactAttribute::Mail) {
            return Err(CoreError::Validation {
                message: "the mail attribute cannot be changed through self-service".into(),
            });
        }

        let diff: Vec<AttributeChange> = changes
            .iter()
            .map(|(attr, value)| {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    AttributeChange::delete(attr.ldap_name())
                } else {
                    AttributeChange::set(attr.ldap_name(), [trimmed.to_string()])
                }
            })
            .collect();
        if diff.is_empty() {
            return Ok(());
        }

        let dn = self.own_dn(ctx).await?;
        self.dir.modify(&dn, diff).await?;
        debug!(user = ctx.user_id(), fields = changes.len(), "own contact updated");
        Ok(())
    }

    // ── Group membership ─────────────────────────────────────────────

    /// Groups the user with the given mail address belongs to, sorted by cn.
    ///
    /// Resolves the directory username first; an unresolvable mail yields an
    /// empty list, not an error.
    pub async fn groups_of(&self, mail: &str) -> Result<Vec<Group>, CoreError> {
        if mail.trim().is_empty() {
            return Ok(Vec::new());
        }
        let Some(username) = self.resolve_login(mail).await? else {
            return Ok(Vec::new());
        };

        let filter = self.filters.groups(GroupFilter::WithMember(&username))?;
        let raw = self
            .dir
            .search(
                &self.config.group_base_dn,
                SearchScope::OneLevel,
                &filter,
                None,
            )
            .await?;

        let mut groups = parse::groups(&raw);
        groups.sort_by(|a, b| a.cn.cmp(&b.cn));
        Ok(groups)
    }

    /// Resolve a mail address to the directory username used as the group
    /// membership key, requesting only that attribute.
    async fn resolve_login(&self, mail: &str) -> Result<Option<String>, CoreError> {
        let filter = self.filters.users(UserFilter::ByLogin(mail))?;
        let attrs = [self.config.login_attribute.as_str()];
        let raw = self
            .dir
            .search(
                &self.config.user_base_dn,
                SearchScope::Subtree,
                &filter,
                Some(&attrs),
            )
            .await?;

        Ok(raw
            .first()
            .and_then(|entry| entry.first(&self.config.login_attribute))
            .map(str::to_string))
    }

    /// Attach group membership to every contact with a bounded concurrent
    /// fan-out (`group_fanout` of 1 degenerates to sequential round trips).
    /// Ordering is unaffected: results are re-attached by position. A failed
    /// lookup degrades that contact's groups to empty rather than failing
    /// the listing.
    async fn attach_groups(&self, contacts: &mut [Contact]) {
        let mails: Vec<Option<String>> = contacts.iter().map(|c| c.mail.clone()).collect();

        let lookups: Vec<Vec<Group>> = stream::iter(mails)
            .map(|mail| self.groups_or_empty(mail))
            .buffered(self.config.group_fanout.max(1))
            .collect()
            .await;

        for (contact, groups) in contacts.iter_mut().zip(lookups) {
            contact.groups = groups;
        }
    }

    async fn groups_or_empty(&self, mail: Option<String>) -> Vec<Group> {
        let Some(mail) = mail else {
            return Vec::new();
        };
        match self.groups_of(&mail).await {
            Ok(groups) => groups,
            Err(e) => {
                warn!(error = %e, mail = %mail, "group lookup failed, leaving groups empty");
                Vec::new()
            }
        }
    }
}
