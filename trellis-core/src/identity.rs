//! Identity types for Trellis entities

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Entity identifier using UUIDv7 for timestamp-sortable IDs.
/// UUIDv7 embeds a Unix timestamp, making IDs naturally sortable by creation time.
pub type EntityId = Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Generate a new UUIDv7 EntityId (timestamp-sortable).
pub fn new_entity_id() -> EntityId {
    Uuid::now_v7()
}

macro_rules! typed_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new(id: Uuid) -> Self {
                Self(id)
            }

            pub fn now_v7() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(
    /// Identifier of an opportunity (a deal in the pipeline).
    OpportunityId
);
typed_id!(
    /// Identifier of a job posting.
    JobId
);
typed_id!(
    /// Identifier of an update record (note, email, activity entry).
    UpdateId
);
typed_id!(
    /// Identifier of a file attachment.
    AttachmentId
);
typed_id!(
    /// Identifier of the workspace all requests are scoped to.
    WorkspaceId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_id_roundtrips_through_uuid() {
        let raw = Uuid::now_v7();
        let id = OpportunityId::new(raw);
        assert_eq!(id.as_uuid(), raw);
        assert_eq!(id.to_string(), raw.to_string());
    }

    #[test]
    fn typed_id_parses_from_str() {
        let raw = Uuid::now_v7();
        let parsed: UpdateId = raw.to_string().parse().unwrap();
        assert_eq!(parsed.as_uuid(), raw);
        assert!("not-a-uuid".parse::<UpdateId>().is_err());
    }

    #[test]
    fn typed_id_serde_is_transparent() {
        let id = AttachmentId::now_v7();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
        let back: AttachmentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn now_v7_ids_are_timestamp_sortable() {
        let a = new_entity_id();
        let b = new_entity_id();
        assert!(a <= b);
    }
}
