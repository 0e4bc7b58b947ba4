//! Codec, document store, and services for the Pickems tenant store.
//!
//! This crate defines the ports (`FileSystem`, `ChatPlatform`) that the
//! infrastructure layer implements. It depends only on `pickems-types` --
//! never on `pickems-infra` or any platform SDK.

pub mod codec;
pub mod service;
pub mod storage;

#[cfg(test)]
mod testing;
