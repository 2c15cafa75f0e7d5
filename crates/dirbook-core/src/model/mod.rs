// ── Domain model ──

pub mod attribute;
pub mod contact;
pub mod group;

pub use attribute::ContactAttribute;
pub use contact::{Contact, SortOrder};
pub use group::Group;

/// Which side of the hidden-marker predicate a listing selects.
///
/// Derived purely from the presence of the marker class on an entry --
/// never stored as its own attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}
