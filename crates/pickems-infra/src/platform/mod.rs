//! Chat-platform adapters.

pub mod discord;

pub use discord::SerenityPlatform;
