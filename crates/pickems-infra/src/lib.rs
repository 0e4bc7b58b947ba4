//! Infrastructure layer for Pickems.
//!
//! Contains implementations of the ports defined in `pickems-core`: the
//! `tokio::fs` filesystem adapter and the serenity-backed Discord client,
//! plus the `pickems.toml` loader.

pub mod config;
pub mod filesystem;
pub mod platform;
