//! Event types for the TUI event loop.

use crossterm::event::KeyEvent;
use trellis_client::types::{AttachmentRecord, EntitySummary, UpdateRecord};
use trellis_core::{EntityId, EntityKind, SidebarTab};

/// Records carried by a completed tab fetch.
#[derive(Debug, Clone)]
pub enum TabRecords {
    Updates(Vec<UpdateRecord>),
    Files(Vec<AttachmentRecord>),
}

/// What a completed mutation did, for the success notification and the
/// follow-up re-fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    CreateUpdate,
    DeleteUpdate,
    DeleteAttachment,
}

#[derive(Debug, Clone)]
pub enum TuiEvent {
    Input(KeyEvent),
    Tick,
    Resize { width: u16, height: u16 },
    /// A tab fetch finished. `generation` is the sidebar generation at
    /// spawn time; stale completions are discarded, never rendered.
    TabLoaded {
        generation: u64,
        tab: SidebarTab,
        entity_id: EntityId,
        result: Result<TabRecords, String>,
    },
    /// The entity directory finished loading.
    DirectoryLoaded {
        kind: EntityKind,
        result: Result<Vec<EntitySummary>, String>,
    },
    /// A create/delete finished. On success the caches affected by the
    /// mutation have already been invalidated.
    MutationCompleted {
        kind: MutationKind,
        tab: SidebarTab,
        entity_id: EntityId,
        result: Result<(), String>,
    },
}
