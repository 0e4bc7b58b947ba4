use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::error::TenantIdError;

/// Unique identifier for a tenant (one Discord guild).
///
/// The id is substituted verbatim into the tenant's storage directory name, so
/// it is validated on construction: 1 to 64 characters from `[A-Za-z0-9_-]`.
/// Discord guild ids (decimal snowflakes) always pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    /// Maximum accepted length of a tenant id.
    pub const MAX_LEN: usize = 64;

    /// Validate and wrap a raw tenant id.
    ///
    /// ```
    /// use pickems_types::tenant::TenantId;
    ///
    /// assert!(TenantId::parse("123456789012345678").is_ok());
    /// assert!(TenantId::parse("../etc").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, TenantIdError> {
        if raw.is_empty() {
            return Err(TenantIdError::Empty);
        }
        if raw.len() > Self::MAX_LEN {
            return Err(TenantIdError::TooLong(raw.len()));
        }
        if let Some(c) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(TenantIdError::InvalidCharacter(c));
        }
        Ok(Self(raw.to_string()))
    }

    /// The id as a path-safe string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TenantId {
    type Err = TenantIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TenantId {
    type Error = TenantIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TenantId> for String {
    fn from(id: TenantId) -> Self {
        id.0
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
