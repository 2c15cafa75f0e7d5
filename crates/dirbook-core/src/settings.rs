// ── Deployment settings seam ──
//
// The surrounding application decides which contact attributes a deployment
// exposes and how each user wants listings sorted. Core consumes that
// through this trait; dirbook-config provides the file-backed
// implementation, tests use `StaticSettings`.

use crate::model::{ContactAttribute, SortOrder};

/// Deployment-level settings the core consults at query time.
pub trait SettingsProvider: Send + Sync {
    /// The full set of contact attributes this deployment exposes.
    fn available_attributes(&self) -> Vec<ContactAttribute>;

    /// The listing sort order preferred by the given bound user.
    fn sort_order(&self, user_id: &str) -> SortOrder;
}

/// Fixed settings: every recognized attribute, one sort order for everyone.
#[derive(Debug, Clone)]
pub struct StaticSettings {
    pub attributes: Vec<ContactAttribute>,
    pub sort_order: SortOrder,
}

impl Default for StaticSettings {
    fn default() -> Self {
        use strum::IntoEnumIterator;
        Self {
            attributes: ContactAttribute::iter().collect(),
            sort_order: SortOrder::default(),
        }
    }
}

impl SettingsProvider for StaticSettings {
    fn available_attributes(&self) -> Vec<ContactAttribute> {
        self.attributes.clone()
    }

    fn sort_order(&self, _user_id: &str) -> SortOrder {
        self.sort_order
    }
}
