//! Shared domain types for Pickems.
//!
//! This crate contains the types used across the tenant store: tenant ids,
//! document kinds and values, the settings record, chat-platform ids, config,
//! and the error enums.
//!
//! Zero infrastructure dependencies -- only serde, serde_json, thiserror.

pub mod config;
pub mod document;
pub mod entities;
pub mod error;
pub mod platform;
pub mod settings;
pub mod tenant;
