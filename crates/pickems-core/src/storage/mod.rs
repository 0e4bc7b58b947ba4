//! Per-tenant document storage.
//!
//! [`DocumentStore`] owns the on-disk layout; the submodules hold the
//! directory manager and the per-document write locks it relies on.

pub mod directory;
mod document_store;
pub mod locks;

pub use document_store::DocumentStore;
