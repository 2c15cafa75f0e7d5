// ── Visibility state machine ──
//
// An entry is Hidden when its objectClass values contain the configured
// marker class, Visible otherwise. hide/show flip the state by rewriting the
// objectClass list; both are idempotent -- a transition into the current
// state is a no-op success. Groups additionally carry a synthetic member
// identifier while hidden, provisioned on first hide.

use tracing::{debug, info};

use dirbook_api::{
    AttributeChange, DirectoryClient, FilterBuilder, GroupFilter, SearchScope, UserFilter,
    filter::escape_value,
};

use crate::config::DirectoryConfig;
use crate::error::CoreError;

/// What a successful transition actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The marker was added or removed.
    Applied,
    /// The entry was already in the requested state; nothing was written.
    Unchanged,
}

/// The entry data a transition operates on.
struct MarkerTarget {
    dn: String,
    object_classes: Vec<String>,
    uid: Option<String>,
    cn: Option<String>,
}

/// Flips entries between visible and hidden.
pub struct VisibilityToggler<'a, D> {
    dir: &'a D,
    config: &'a DirectoryConfig,
    filters: &'a FilterBuilder,
}

impl<'a, D: DirectoryClient> VisibilityToggler<'a, D> {
    pub fn new(dir: &'a D, config: &'a DirectoryConfig, filters: &'a FilterBuilder) -> Self {
        Self {
            dir,
            config,
            filters,
        }
    }

    // ── User transitions ─────────────────────────────────────────────

    pub async fn hide_user(&self, identity: &str) -> Result<ToggleOutcome, CoreError> {
        let filter = self.filters.users(UserFilter::ByLogin(identity))?;
        let target = self
            .fetch_target(
                &self.config.user_base_dn,
                SearchScope::Subtree,
                &filter,
                &["objectClass"],
                identity,
            )
            .await?;

        if self.is_hidden(&target.object_classes) {
            debug!(identity, "user already hidden");
            return Ok(ToggleOutcome::Unchanged);
        }
        self.write_marker(target, None).await
    }

    pub async fn show_user(&self, identity: &str) -> Result<ToggleOutcome, CoreError> {
        let filter = self.filters.users(UserFilter::ByLogin(identity))?;
        let target = self
            .fetch_target(
                &self.config.user_base_dn,
                SearchScope::Subtree,
                &filter,
                &["objectClass"],
                identity,
            )
            .await?;

        if !self.is_hidden(&target.object_classes) {
            debug!(identity, "user already visible");
            return Ok(ToggleOutcome::Unchanged);
        }
        self.clear_marker(target, false).await
    }

    // ── Group transitions ────────────────────────────────────────────

    pub async fn hide_group(&self, gid: &str) -> Result<ToggleOutcome, CoreError> {
        let filter = self.filters.groups(GroupFilter::ByGid(gid))?;
        let target = self
            .fetch_target(
                &self.config.group_base_dn,
                SearchScope::OneLevel,
                &filter,
                &["objectClass", "uid", "cn"],
                gid,
            )
            .await?;

        if self.is_hidden(&target.object_classes) {
            debug!(gid, "group already hidden");
            return Ok(ToggleOutcome::Unchanged);
        }

        // Hidden groups need a member identifier; provision a deterministic
        // synthetic one when the entry has none.
        let synthetic_uid = if target.uid.is_none() {
            let cn = target
                .cn
                .as_deref()
                .ok_or_else(|| CoreError::not_found("group", gid))?;
            let uid = synthesize_group_uid(cn);
            self.ensure_uid_unused(&uid, &target.dn).await?;
            Some(uid)
        } else {
            None
        };

        self.write_marker(target, synthetic_uid).await
    }

    pub async fn show_group(&self, gid: &str) -> Result<ToggleOutcome, CoreError> {
        let filter = self.filters.groups(GroupFilter::ByGid(gid))?;
        let target = self
            .fetch_target(
                &self.config.group_base_dn,
                SearchScope::OneLevel,
                &filter,
                &["objectClass", "uid", "cn"],
                gid,
            )
            .await?;

        if !self.is_hidden(&target.object_classes) {
            debug!(gid, "group already visible");
            return Ok(ToggleOutcome::Unchanged);
        }
        let clear_uid = target.uid.is_some();
        self.clear_marker(target, clear_uid).await
    }

    // ── Shared transition mechanics ──────────────────────────────────

    fn is_hidden(&self, object_classes: &[String]) -> bool {
        let marker = self.filters.hidden_class();
        object_classes.iter().any(|class| class == marker)
    }

    /// Append the marker class (order-preserving) and write the full list
    /// back, together with a synthetic uid when one was provisioned.
    async fn write_marker(
        &self,
        target: MarkerTarget,
        synthetic_uid: Option<String>,
    ) -> Result<ToggleOutcome, CoreError> {
        let mut classes = target.object_classes;
        classes.push(self.filters.hidden_class().to_string());

        let mut changes = vec![AttributeChange::set("objectClass", classes)];
        if let Some(uid) = synthetic_uid {
            info!(dn = %target.dn, uid = %uid, "provisioning synthetic group identifier");
            changes.push(AttributeChange::set("uid", [uid]));
        }

        self.dir.modify(&target.dn, changes).await?;
        info!(dn = %target.dn, "entry hidden");
        Ok(ToggleOutcome::Applied)
    }

    /// Remove every occurrence of the marker class and write the re-sequenced
    /// remainder back; optionally drop the synthetic uid in the same call.
    async fn clear_marker(
        &self,
        target: MarkerTarget,
        clear_uid: bool,
    ) -> Result<ToggleOutcome, CoreError> {
        let marker = self.filters.hidden_class();
        let mut classes = target.object_classes;
        classes.retain(|class| class != marker);

        let mut changes = vec![AttributeChange::set("objectClass", classes)];
        if clear_uid {
            changes.push(AttributeChange::delete("uid"));
        }

        self.dir.modify(&target.dn, changes).await?;
        info!(dn = %target.dn, "entry visible again");
        Ok(ToggleOutcome::Applied)
    }

    /// Fetch the single entry a transition targets.
    ///
    /// Anything other than exactly one match carrying a dn and at least one
    /// objectClass value is a structured failure.
    async fn fetch_target(
        &self,
        base: &str,
        scope: SearchScope,
        filter: &str,
        attrs: &[&str],
        identifier: &str,
    ) -> Result<MarkerTarget, CoreError> {
        let mut entries = self.dir.search(base, scope, filter, Some(attrs)).await?;
        if entries.len() != 1 {
            debug!(identifier, matches = entries.len(), "identity did not resolve to one entry");
            return Err(CoreError::not_found("entry", identifier));
        }
        let entry = entries.swap_remove(0);

        if entry.dn.trim().is_empty() {
            return Err(CoreError::not_found("entry", identifier));
        }
        let object_classes = entry.values("objectclass").to_vec();
        if object_classes.is_empty() {
            return Err(CoreError::not_found("entry", identifier));
        }

        Ok(MarkerTarget {
            dn: entry.dn.clone(),
            object_classes,
            uid: entry.first("uid").map(str::to_string),
            cn: entry.first("cn").map(str::to_string),
        })
    }

    /// Fail with `Conflict` when another entry under the group base already
    /// bears the candidate uid.
    async fn ensure_uid_unused(&self, uid: &str, own_dn: &str) -> Result<(), CoreError> {
        let filter = format!("(uid={})", escape_value(uid));
        let entries = self
            .dir
            .search(
                &self.config.group_base_dn,
                SearchScope::OneLevel,
                &filter,
                Some(&["uid"]),
            )
            .await?;

        if entries.iter().any(|entry| entry.dn != own_dn) {
            return Err(CoreError::Conflict {
                message: format!("synthetic group identifier '{uid}' is already in use"),
            });
        }
        Ok(())
    }
}

/// Deterministic member identifier for a hidden group: `group` plus the cn
/// lowercased with all whitespace removed.
pub fn synthesize_group_uid(cn: &str) -> String {
    let compact: String = cn.chars().filter(|c| !c.is_whitespace()).collect();
    format!("group{}", compact.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesize_group_uid() {
        assert_eq!(synthesize_group_uid("devs"), "groupdevs");
        assert_eq!(synthesize_group_uid("Build Engineers"), "groupbuildengineers");
        assert_eq!(synthesize_group_uid("  Ops \t Team "), "groupopsteam");
    }
}
