//! Opaque identifiers for managed firewall groups.
//!
//! The appliance has no notion of these ids. They only give each resource
//! instance a stable, non-empty handle after a successful create.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Identifier assigned to a firewall group resource on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(Uuid);

impl GroupId {
    /// Creates a new random id (v4).
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an id from a string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidId`] if the string is not a UUID.
    pub fn parse_str(input: &str) -> Result<Self> {
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|_| Error::InvalidId(input.to_string()))
    }
}

impl From<Uuid> for GroupId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for GroupId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_str(s)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn new_ids_are_random_v4() {
        let first = GroupId::new_v4();
        let second = GroupId::new_v4();
        let uuid = Uuid::parse_str(&first.to_string()).unwrap();
        assert_eq!(uuid.get_version_num(), 4);
        assert_ne!(first, second);
    }

    #[test]
    fn parse_and_display_round_trip() {
        let id: GroupId = VALID_ID.parse().unwrap();
        assert_eq!(id.to_string(), VALID_ID);
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = GroupId::parse_str("fwgroup-1").unwrap_err();
        assert!(matches!(err, Error::InvalidId(_)));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = GroupId::parse_str(VALID_ID).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{VALID_ID}\""));
    }
}
