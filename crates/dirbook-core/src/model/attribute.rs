// ── Contact attribute set ──
//
// The recognized directory attributes form a closed enum rather than
// free-form string keys: accessors are compile-time checked and a typo'd
// attribute name cannot silently match nothing.

use strum::{Display, EnumIter, EnumString};

/// A recognized contact attribute, named after its directory counterpart.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter,
)]
pub enum ContactAttribute {
    #[strum(serialize = "mail")]
    Mail,
    #[strum(serialize = "givenname")]
    GivenName,
    #[strum(serialize = "sn")]
    Surname,
    #[strum(serialize = "street")]
    Street,
    #[strum(serialize = "postaladdress")]
    PostalAddress,
    #[strum(serialize = "postalcode")]
    PostalCode,
    #[strum(serialize = "l")]
    Locality,
    #[strum(serialize = "homephone")]
    HomePhone,
    #[strum(serialize = "mobile")]
    Mobile,
    #[strum(serialize = "description")]
    Description,
}

impl ContactAttribute {
    /// Attributes every deployment carries; excluded from the editable set
    /// that statistics are computed over.
    pub const DEFAULTS: [Self; 3] = [Self::Mail, Self::GivenName, Self::Surname];

    /// The directory attribute name (lowercase, as normalized by the
    /// protocol layer).
    pub fn ldap_name(self) -> &'static str {
        match self {
            Self::Mail => "mail",
            Self::GivenName => "givenname",
            Self::Surname => "sn",
            Self::Street => "street",
            Self::PostalAddress => "postaladdress",
            Self::PostalCode => "postalcode",
            Self::Locality => "l",
            Self::HomePhone => "homephone",
            Self::Mobile => "mobile",
            Self::Description => "description",
        }
    }

    /// Whether this attribute belongs to the fixed default set.
    pub fn is_default(self) -> bool {
        Self::DEFAULTS.contains(&self)
    }
}
