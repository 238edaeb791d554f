//! Wire types exchanged with the Trellis server.

use serde::{Deserialize, Serialize};
use trellis_core::{AttachmentId, EntityId, Timestamp, UpdateId, UpdateKind};

/// An update attached to an entity: a note, an email, or an activity entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRecord {
    pub update_id: UpdateId,
    pub entity_id: EntityId,
    pub kind: UpdateKind,
    pub author: String,
    pub body: String,
    pub created_at: Timestamp,
}

/// A file attached to an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentRecord {
    pub attachment_id: AttachmentId,
    pub entity_id: EntityId,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub uploaded_by: String,
    pub created_at: Timestamp,
}

/// A row in an entity directory listing (opportunities or jobs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub entity_id: EntityId,
    pub name: String,
    pub stage: String,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUpdateRequest {
    pub kind: UpdateKind,
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListUpdatesResponse {
    pub updates: Vec<UpdateRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListAttachmentsResponse {
    pub attachments: Vec<AttachmentRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListEntitiesResponse {
    pub entities: Vec<EntitySummary>,
}

/// Error payload the server returns on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerError {
    pub code: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn update_record_deserializes_from_wire_json() {
        let id = Uuid::now_v7();
        let entity = Uuid::now_v7();
        let json = format!(
            r#"{{
                "update_id": "{id}",
                "entity_id": "{entity}",
                "kind": "email",
                "author": "dana@acme.test",
                "body": "Sent the revised proposal.",
                "created_at": "2026-01-15T10:30:00Z"
            }}"#
        );
        let record: UpdateRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record.kind, UpdateKind::Email);
        assert_eq!(record.update_id.as_uuid(), id);
    }

    #[test]
    fn server_error_payload_shape() {
        let err: ServerError =
            serde_json::from_str(r#"{"code":"not_found","message":"no such entity"}"#).unwrap();
        assert_eq!(err.code, "not_found");
    }
}
