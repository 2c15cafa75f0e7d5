//! # dirbook-api
//!
//! Directory protocol layer for dirbook.
//!
//! Wraps the `ldap3` crate behind a small, mockable surface: a
//! [`DirectoryClient`] trait covering the four operations the domain layer
//! needs (connect/bind happen at construction; `search` and `modify` are the
//! trait methods), a [`FilterBuilder`] that composes search filters from
//! configured templates with mandatory escaping of untrusted values, and a
//! [`TransportConfig`] describing TLS and timeout settings.
//!
//! `dirbook-core` maps this crate's [`Error`] into its own domain taxonomy —
//! consumers of the core never see protocol errors raw.

pub mod client;
pub mod error;
pub mod filter;
pub mod transport;

// Re-exports
pub use client::{AttributeChange, DirectoryClient, LdapDirectory, RawEntry, SearchScope};
pub use error::Error;
pub use filter::{FilterBuilder, FilterTemplates, GroupFilter, UserFilter};
pub use transport::{TlsMode, TransportConfig};
