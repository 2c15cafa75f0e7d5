// Directory search filter construction.
//
// Filters are composed from operator-configured templates; every value that
// originates from a caller (login, gid, member name) passes through RFC 4515
// escaping before substitution. Templates themselves are trusted config and
// are embedded verbatim.

use crate::error::Error;

/// Substitution token for identity values in the user login template.
const UID_TOKEN: &str = "%uid";
/// Substitution token for group id values in the gid template.
const GID_TOKEN: &str = "%gid";

/// Escape a value for embedding in a search filter (RFC 4515).
///
/// Backslash must be escaped first, then the metacharacters `* ( )` and NUL.
pub fn escape_value(value: &str) -> String {
    value
        .replace('\\', "\\5c")
        .replace('*', "\\2a")
        .replace('(', "\\28")
        .replace(')', "\\29")
        .replace('\0', "\\00")
}

/// The operator-configured filter templates a [`FilterBuilder`] composes from.
#[derive(Debug, Clone)]
pub struct FilterTemplates {
    /// Base predicate selecting user entries, e.g. `(objectClass=inetOrgPerson)`.
    pub user_base: String,
    /// Identity lookup template with a `%uid` placeholder,
    /// e.g. `(&(objectClass=inetOrgPerson)(mail=%uid))`.
    pub user_login: String,
    /// Base predicate selecting group entries, e.g. `(objectClass=posixGroup)`.
    pub group_base: String,
    /// Group lookup template with a `%gid` placeholder,
    /// e.g. `(&(objectClass=posixGroup)(gidNumber=%gid))`.
    pub group_gid: String,
    /// Object class whose presence marks an entry as hidden.
    pub hidden_class: String,
}

/// Which user entries a filter should select.
#[derive(Debug, Clone, Copy)]
pub enum UserFilter<'a> {
    /// Users without the hidden-marker class.
    Visible,
    /// Users carrying the hidden-marker class.
    Hidden,
    /// The single user matching the given login identity.
    ByLogin(&'a str),
}

/// Which group entries a filter should select.
#[derive(Debug, Clone, Copy)]
pub enum GroupFilter<'a> {
    /// Groups without the hidden-marker class.
    Visible,
    /// Groups carrying the hidden-marker class.
    Hidden,
    /// The single group matching the given numeric group id.
    ByGid(&'a str),
    /// Groups listing the given member username.
    WithMember(&'a str),
}

/// Composes directory search filters from configured templates.
///
/// Construction validates that the lookup templates actually contain their
/// substitution tokens, so a misconfigured deployment fails before the first
/// query rather than silently matching nothing.
#[derive(Debug, Clone)]
pub struct FilterBuilder {
    templates: FilterTemplates,
}

impl FilterBuilder {
    pub fn new(templates: FilterTemplates) -> Result<Self, Error> {
        if !templates.user_login.contains(UID_TOKEN) {
            return Err(Error::BadTemplate {
                template: "user_login",
                token: UID_TOKEN,
            });
        }
        if !templates.group_gid.contains(GID_TOKEN) {
            return Err(Error::BadTemplate {
                template: "group_gid",
                token: GID_TOKEN,
            });
        }
        Ok(Self { templates })
    }

    /// Build a filter selecting user entries.
    pub fn users(&self, kind: UserFilter<'_>) -> Result<String, Error> {
        match kind {
            UserFilter::Visible => Ok(self.visible(&self.templates.user_base)),
            UserFilter::Hidden => Ok(self.hidden(&self.templates.user_base)),
            UserFilter::ByLogin(identity) => {
                let identity = required(identity, "identity")?;
                Ok(self
                    .templates
                    .user_login
                    .replace(UID_TOKEN, &escape_value(identity)))
            }
        }
    }

    /// Build a filter selecting group entries.
    pub fn groups(&self, kind: GroupFilter<'_>) -> Result<String, Error> {
        match kind {
            GroupFilter::Visible => Ok(self.visible(&self.templates.group_base)),
            GroupFilter::Hidden => Ok(self.hidden(&self.templates.group_base)),
            GroupFilter::ByGid(gid) => {
                let gid = required(gid, "gid")?;
                Ok(self
                    .templates
                    .group_gid
                    .replace(GID_TOKEN, &escape_value(gid)))
            }
            GroupFilter::WithMember(member) => {
                let member = required(member, "member")?;
                Ok(format!(
                    "(&{}(memberUid={}))",
                    self.templates.group_base,
                    escape_value(member)
                ))
            }
        }
    }

    /// The configured hidden-marker class name.
    pub fn hidden_class(&self) -> &str {
        &self.templates.hidden_class
    }

    fn visible(&self, base: &str) -> String {
        format!("(&{}(!(objectClass={})))", base, self.templates.hidden_class)
    }

    fn hidden(&self, base: &str) -> String {
        format!("(&{}(objectClass={}))", base, self.templates.hidden_class)
    }
}

fn required<'a>(value: &'a str, param: &'static str) -> Result<&'a str, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::MissingParameter { param });
    }
    Ok(trimmed)
}
