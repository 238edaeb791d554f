//! Route tables mapping logical operations to endpoint templates.
//!
//! A `RouteSet` is constructed once per entity kind and never mutated.
//! Operations form a closed enum, so a tab cannot reference a route that
//! does not exist.

use trellis_core::{EntityId, EntityKind};

/// Placeholder substituted with the entity id when a template is rendered.
const ID_PLACEHOLDER: &str = "{id}";

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("Route template missing '{{id}}' placeholder: {template}")]
    MissingPlaceholder { template: String },
}

/// Logical fetch/mutation operations the sidebar performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListUpdates,
    CreateUpdate,
    DeleteUpdate,
    ListAttachments,
    DeleteAttachment,
}

impl Operation {
    /// Stable token used as the leading cache-key fragment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ListUpdates => "list-updates",
            Operation::CreateUpdate => "create-update",
            Operation::DeleteUpdate => "delete-update",
            Operation::ListAttachments => "list-attachments",
            Operation::DeleteAttachment => "delete-attachment",
        }
    }
}

/// URL path template parameterized by entity id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate(String);

impl RouteTemplate {
    /// Build a template, rejecting ones without the `{id}` placeholder.
    pub fn new(template: impl Into<String>) -> Result<Self, RouteError> {
        let template = template.into();
        if !template.contains(ID_PLACEHOLDER) {
            return Err(RouteError::MissingPlaceholder { template });
        }
        Ok(Self(template))
    }

    /// Canonical tables are static and covered by tests; a bad literal here
    /// is a programming error, not a runtime condition.
    fn from_static(template: &'static str) -> Self {
        debug_assert!(template.contains(ID_PLACEHOLDER));
        Self(template.to_string())
    }

    /// Substitute the entity id into the template.
    pub fn render(&self, id: EntityId) -> String {
        self.0.replace(ID_PLACEHOLDER, &id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Immutable mapping from logical operation to endpoint template for one
/// entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSet {
    list_updates: RouteTemplate,
    create_update: RouteTemplate,
    delete_update: RouteTemplate,
    list_attachments: RouteTemplate,
    delete_attachment: RouteTemplate,
}

impl RouteSet {
    /// Canonical route table for an entity kind.
    pub fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Opportunity => Self {
                list_updates: RouteTemplate::from_static("/api/v1/opportunities/{id}/updates"),
                create_update: RouteTemplate::from_static("/api/v1/opportunities/{id}/updates"),
                delete_update: RouteTemplate::from_static("/api/v1/updates/{id}"),
                list_attachments: RouteTemplate::from_static(
                    "/api/v1/opportunities/{id}/attachments",
                ),
                delete_attachment: RouteTemplate::from_static("/api/v1/attachments/{id}"),
            },
            EntityKind::Job => Self {
                list_updates: RouteTemplate::from_static("/api/v1/jobs/{id}/updates"),
                create_update: RouteTemplate::from_static("/api/v1/jobs/{id}/updates"),
                delete_update: RouteTemplate::from_static("/api/v1/updates/{id}"),
                list_attachments: RouteTemplate::from_static("/api/v1/jobs/{id}/attachments"),
                delete_attachment: RouteTemplate::from_static("/api/v1/attachments/{id}"),
            },
        }
    }

    pub fn operation(&self, op: Operation) -> &RouteTemplate {
        match op {
            Operation::ListUpdates => &self.list_updates,
            Operation::CreateUpdate => &self.create_update,
            Operation::DeleteUpdate => &self.delete_update,
            Operation::ListAttachments => &self.list_attachments,
            Operation::DeleteAttachment => &self.delete_attachment,
        }
    }
}
