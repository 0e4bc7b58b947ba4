//! Chat-platform identifiers and provisioning requests.
//!
//! Ids are kept as strings (Discord snowflakes are serialized as strings in
//! stored documents); platform adapters parse them into their native form.

use serde::{Deserialize, Serialize};

use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a channel or category.
    ChannelId
);
string_id!(
    /// Identifier of a message within a channel.
    MessageId
);
string_id!(
    /// Identifier of a role within a tenant.
    RoleId
);

/// Kind of channel to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Category,
    Text,
}

/// Who can see and post in a created channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelVisibility {
    /// Platform defaults.
    Inherit,
    /// Hidden from everyone except the given role.
    Private { role: RoleId },
    /// Visible to everyone, posting denied.
    ReadOnly,
}

/// Request to create a channel or category under a tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSpec {
    pub name: String,
    pub kind: ChannelKind,
    pub parent: Option<ChannelId>,
    pub visibility: ChannelVisibility,
}

impl ChannelSpec {
    pub fn category(name: impl Into<String>, visibility: ChannelVisibility) -> Self {
        Self {
            name: name.into(),
            kind: ChannelKind::Category,
            parent: None,
            visibility,
        }
    }

    pub fn text(
        name: impl Into<String>,
        parent: Option<ChannelId>,
        visibility: ChannelVisibility,
    ) -> Self {
        Self {
            name: name.into(),
            kind: ChannelKind::Text,
            parent,
            visibility,
        }
    }
}
