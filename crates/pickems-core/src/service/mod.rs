//! Services over the document store, and the ports they depend on.
//!
//! `fs` and `platform` are the traits the infrastructure layer implements;
//! the remaining modules are the use cases built on them.

pub mod bootstrap;
pub mod entities;
pub mod fs;
pub mod init;
pub mod mirror;
pub mod platform;
pub mod typed;
