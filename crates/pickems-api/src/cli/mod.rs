//! CLI command definitions for the `pickems` binary.
//!
//! Uses clap derive macros for argument parsing. Every command takes the
//! tenant (guild) id as its first argument.

pub mod document;
pub mod status;
pub mod tenant;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use pickems_types::document::DocumentKind;
use pickems_types::tenant::TenantId;

/// Inspect and manage per-guild pick'em state.
#[derive(Parser)]
#[command(name = "pickems", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the config file.
    #[arg(long, global = true, env = "PICKEMS_CONFIG", default_value = "pickems.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create any missing documents with their empty defaults.
    Init {
        /// Tenant (guild) id.
        tenant: TenantId,
    },

    /// First-time setup: create the admin role and channels, save settings.
    ///
    /// Requires DISCORD_TOKEN. Refuses to run twice for the same tenant.
    Bootstrap {
        /// Tenant (guild) id.
        tenant: TenantId,
    },

    /// Print a stored document.
    Get {
        /// Tenant (guild) id.
        tenant: TenantId,

        /// Document name (reactionMap, matchups, settings, lastMatchupMessages, weeks).
        kind: DocumentKind,
    },

    /// Replace a stored document.
    Set {
        /// Tenant (guild) id.
        tenant: TenantId,

        /// Document name (reactionMap, matchups, settings, lastMatchupMessages, weeks).
        kind: DocumentKind,

        /// JSON value in the on-disk format, or @path to read it from a file.
        value: String,
    },

    /// Push the stored settings to the tenant's settings channel.
    #[command(name = "publish-settings")]
    PublishSettings {
        /// Tenant (guild) id.
        tenant: TenantId,
    },

    /// Show which documents exist for a tenant.
    Status {
        /// Tenant (guild) id.
        tenant: TenantId,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
