//! Typed views of the per-tenant documents.
//!
//! `ReactionMap` and `LastMatchupMessages` have the same Rust shape but are
//! stored differently: the reaction map is an ordered map on the wire, the
//! last-message index a plain record. Distinct newtypes keep them apart.

use crate::document::{DocumentValue, OrderedMap};

/// Reaction token to option token (e.g. emoji to team name), in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReactionMap(pub OrderedMap<String>);

/// Matchup id to matchup record. Records are opaque to the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matchups(pub OrderedMap<DocumentValue>);

/// Week records, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Weeks(pub Vec<DocumentValue>);

/// Matchup id to the id of the last message posted for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LastMatchupMessages(pub OrderedMap<String>);

impl ReactionMap {
    /// Option token for a reaction, if mapped.
    pub fn option_for(&self, reaction: &str) -> Option<&str> {
        self.0.get(reaction).map(String::as_str)
    }
}

impl Matchups {
    pub fn get(&self, id: &str) -> Option<&DocumentValue> {
        self.0.get(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl LastMatchupMessages {
    pub fn message_for(&self, matchup_id: &str) -> Option<&str> {
        self.0.get(matchup_id).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for ReactionMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        ReactionMap(iter.into_iter().collect())
    }
}

impl FromIterator<(String, String)> for LastMatchupMessages {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        LastMatchupMessages(iter.into_iter().collect())
    }
}
