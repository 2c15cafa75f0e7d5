// ── Group entity ──

use serde::Serialize;

/// A directory group a contact can belong to.
///
/// The dn is the canonical key: two groups are equal iff their dn values
/// are equal. The numeric group id stays in its raw directory string form.
#[derive(Debug, Clone, Serialize)]
pub struct Group {
    pub dn: String,
    pub cn: String,
    /// gidNumber value, absent on groups without a posix id.
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub gid: Option<String>,
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.dn == other.dn
    }
}

impl Eq for Group {}

impl std::hash::Hash for Group {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.dn.hash(state);
    }
}
