//! Application state and sidebar state definitions.

use crate::config::TuiConfig;
use crate::events::TabRecords;
use crate::notifications::{Notification, NotificationLevel};
use crate::panel::SidebarConfig;
use crate::theme::HarborTheme;
use trellis_client::types::{AttachmentRecord, EntitySummary, UpdateRecord};
use trellis_client::CachedClient;
use trellis_core::{EntityId, EntityKind, SidebarTab, UpdateKind};
use tui_textarea::TextArea;
use uuid::Uuid;

pub struct App {
    pub config: TuiConfig,
    pub theme: HarborTheme,
    pub client: CachedClient,
    pub panel: SidebarConfig,

    pub directory: DirectoryState,
    pub sidebar: SidebarState,

    pub notifications: Vec<Notification>,
    pub modal: Option<Modal>,
    pub compose: Option<ComposeState>,
}

impl App {
    pub fn new(config: TuiConfig, client: CachedClient, panel: SidebarConfig) -> Self {
        let theme = HarborTheme::harbor();
        let directory = DirectoryState::new(panel.kind);
        let sidebar = SidebarState::new(panel.initial_tab);
        Self {
            config,
            theme,
            client,
            panel,
            directory,
            sidebar,
            notifications: Vec::new(),
            modal: None,
            compose: None,
        }
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
    }

    /// Swap the board between opportunity and job kinds. Closes the panel:
    /// its routes and copy belong to the previous kind.
    pub fn switch_board(&mut self) {
        let next = match self.panel.kind {
            EntityKind::Opportunity => EntityKind::Job,
            EntityKind::Job => EntityKind::Opportunity,
        };
        self.panel = SidebarConfig::for_kind(next);
        self.directory = DirectoryState::new(next);
        self.sidebar.close();
        self.sidebar.active_tab = self.panel.initial_tab;
    }

    pub fn select_next(&mut self) {
        if self.sidebar.is_open() {
            self.sidebar.select_next();
        } else {
            select_next_id(&self.directory.entities, &mut self.directory.selected);
        }
    }

    pub fn select_previous(&mut self) {
        if self.sidebar.is_open() {
            self.sidebar.select_previous();
        } else {
            select_prev_id(&self.directory.entities, &mut self.directory.selected);
        }
    }
}

#[derive(Debug, Clone)]
pub struct Modal {
    pub title: String,
    pub message: String,
}

/// State of the compose-update modal.
pub struct ComposeState {
    pub textarea: TextArea<'static>,
    pub kind: UpdateKind,
}

impl ComposeState {
    pub fn new() -> Self {
        let mut textarea = TextArea::default();
        textarea.set_placeholder_text("Write an update…");
        Self {
            textarea,
            kind: UpdateKind::Note,
        }
    }

    pub fn body(&self) -> String {
        self.textarea.lines().join("\n")
    }
}

impl Default for ComposeState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// DIRECTORY STATE
// ============================================================================

#[derive(Debug, Clone)]
pub struct DirectoryState {
    pub kind: EntityKind,
    pub entities: Vec<EntitySummary>,
    pub selected: Option<Uuid>,
    pub loading: bool,
    pub error: Option<String>,
}

impl DirectoryState {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            entities: Vec::new(),
            selected: None,
            loading: false,
            error: None,
        }
    }

    pub fn selected_entity(&self) -> Option<&EntitySummary> {
        let selected = self.selected?;
        self.entities.iter().find(|e| e.entity_id == selected)
    }

    pub fn apply_loaded(&mut self, kind: EntityKind, result: Result<Vec<EntitySummary>, String>) {
        if kind != self.kind {
            return;
        }
        self.loading = false;
        match result {
            Ok(entities) => {
                self.entities = entities;
                self.error = None;
                if let Some(selected) = self.selected {
                    if !self.entities.iter().any(|e| e.entity_id == selected) {
                        self.selected = None;
                    }
                }
            }
            Err(message) => self.error = Some(message),
        }
    }
}

// ============================================================================
// SIDEBAR STATE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEntity {
    pub id: EntityId,
    pub name: String,
}

/// Per-tab transient state. Owned exclusively by the panel instance;
/// discarded whenever the entity id changes.
#[derive(Debug, Clone)]
pub struct TabState<T> {
    pub records: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub selected: Option<Uuid>,
}

impl<T> TabState<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            loading: false,
            error: None,
            selected: None,
        }
    }

    pub fn reset(&mut self) {
        self.records.clear();
        self.loading = false;
        self.error = None;
        self.selected = None;
    }
}

impl<T> Default for TabState<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// State of one sidebar panel instance.
///
/// Invariants: at most one entity is active; switching entity discards both
/// tabs' state before any new data arrives; a fetch completion is applied
/// only when its generation matches the current one and its tab is still
/// active.
#[derive(Debug, Clone)]
pub struct SidebarState {
    pub entity: Option<ActiveEntity>,
    pub active_tab: SidebarTab,
    pub generation: u64,
    pub updates: TabState<UpdateRecord>,
    pub files: TabState<AttachmentRecord>,
}

impl SidebarState {
    pub fn new(initial_tab: SidebarTab) -> Self {
        Self {
            entity: None,
            active_tab: initial_tab,
            generation: 0,
            updates: TabState::new(),
            files: TabState::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.entity.is_some()
    }

    pub fn entity_id(&self) -> Option<EntityId> {
        self.entity.as_ref().map(|e| e.id)
    }

    /// Open the panel on an entity. Switching to a different entity resets
    /// both tabs so the previous entity's records are never shown under the
    /// new header. Returns whether the active tab needs a fetch.
    pub fn open(&mut self, id: EntityId, name: String, initial_tab: SidebarTab) -> bool {
        if self.entity_id() == Some(id) {
            return false;
        }
        self.entity = Some(ActiveEntity { id, name });
        self.active_tab = initial_tab;
        self.updates.reset();
        self.files.reset();
        self.generation += 1;
        true
    }

    /// Close the panel. Idempotent: repeated closes leave the same empty
    /// state.
    pub fn close(&mut self) {
        if self.entity.is_some() {
            self.generation += 1;
        }
        self.entity = None;
        self.updates.reset();
        self.files.reset();
    }

    /// Select a tab. Returns whether the selection changed (and a fetch may
    /// be needed).
    pub fn set_tab(&mut self, tab: SidebarTab) -> bool {
        if tab == self.active_tab {
            return false;
        }
        self.active_tab = tab;
        self.generation += 1;
        true
    }

    /// Invalidate interest in any in-flight fetch without changing the
    /// selection (used by explicit refresh).
    pub fn bump_generation(&mut self) {
        self.generation += 1;
    }

    pub fn begin_loading(&mut self, tab: SidebarTab) {
        match tab {
            SidebarTab::Updates => {
                self.updates.loading = true;
                self.updates.error = None;
            }
            SidebarTab::Files => {
                self.files.loading = true;
                self.files.error = None;
            }
        }
    }

    /// Apply a completed fetch. Returns whether the result was applied;
    /// stale completions (generation mismatch, different entity, or a tab
    /// that is no longer active) are discarded.
    pub fn apply_loaded(
        &mut self,
        generation: u64,
        tab: SidebarTab,
        entity_id: EntityId,
        result: Result<TabRecords, String>,
    ) -> bool {
        if generation != self.generation
            || self.entity_id() != Some(entity_id)
            || tab != self.active_tab
        {
            return false;
        }
        match (tab, result) {
            (SidebarTab::Updates, Ok(TabRecords::Updates(records))) => {
                self.updates.records = records;
                self.updates.loading = false;
                self.updates.error = None;
            }
            (SidebarTab::Files, Ok(TabRecords::Files(records))) => {
                self.files.records = records;
                self.files.loading = false;
                self.files.error = None;
            }
            (SidebarTab::Updates, Err(message)) => {
                self.updates.loading = false;
                self.updates.error = Some(message);
            }
            (SidebarTab::Files, Err(message)) => {
                self.files.loading = false;
                self.files.error = Some(message);
            }
            // Records of the wrong tab never pair with a matching tab value.
            _ => return false,
        }
        true
    }

    pub fn select_next(&mut self) {
        match self.active_tab {
            SidebarTab::Updates => {
                select_next_id(&self.updates.records, &mut self.updates.selected)
            }
            SidebarTab::Files => select_next_id(&self.files.records, &mut self.files.selected),
        }
    }

    pub fn select_previous(&mut self) {
        match self.active_tab {
            SidebarTab::Updates => {
                select_prev_id(&self.updates.records, &mut self.updates.selected)
            }
            SidebarTab::Files => select_prev_id(&self.files.records, &mut self.files.selected),
        }
    }

    pub fn selected_update(&self) -> Option<&UpdateRecord> {
        let selected = self.updates.selected?;
        self.updates
            .records
            .iter()
            .find(|u| u.update_id.as_uuid() == selected)
    }

    pub fn selected_attachment(&self) -> Option<&AttachmentRecord> {
        let selected = self.files.selected?;
        self.files
            .records
            .iter()
            .find(|a| a.attachment_id.as_uuid() == selected)
    }
}

// ============================================================================
// SELECTION HELPERS
// ============================================================================

fn select_next_id<T: HasRecordId>(items: &[T], selected: &mut Option<Uuid>) {
    if items.is_empty() {
        *selected = None;
        return;
    }
    let index = selected
        .and_then(|id| items.iter().position(|item| item.record_id() == id))
        .unwrap_or(usize::MAX);
    let next = if index == usize::MAX {
        0
    } else {
        (index + 1) % items.len()
    };
    *selected = Some(items[next].record_id());
}

fn select_prev_id<T: HasRecordId>(items: &[T], selected: &mut Option<Uuid>) {
    if items.is_empty() {
        *selected = None;
        return;
    }
    let index = selected
        .and_then(|id| items.iter().position(|item| item.record_id() == id))
        .unwrap_or(0);
    let prev = if index == 0 { items.len() - 1 } else { index - 1 };
    *selected = Some(items[prev].record_id());
}

trait HasRecordId {
    fn record_id(&self) -> Uuid;
}

impl HasRecordId for UpdateRecord {
    fn record_id(&self) -> Uuid {
        self.update_id.as_uuid()
    }
}

impl HasRecordId for AttachmentRecord {
    fn record_id(&self) -> Uuid {
        self.attachment_id.as_uuid()
    }
}

impl HasRecordId for EntitySummary {
    fn record_id(&self) -> Uuid {
        self.entity_id
    }
}

// ============================================================================
// TESTS
// ============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_update(entity_id: Uuid) -> impl Strategy<Value = UpdateRecord> {
        ("[a-zA-Z0-9 ]{1,40}", any::<[u8; 16]>()).prop_map(move |(body, id_bytes)| UpdateRecord {
            update_id: trellis_core::UpdateId::new(Uuid::from_bytes(id_bytes)),
            entity_id,
            kind: UpdateKind::Note,
            author: "test@test".to_string(),
            body,
            created_at: chrono::Utc::now(),
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Selection navigation never panics and always lands on a real id.
        #[test]
        fn prop_selection_navigation_never_panics(
            bodies in prop::collection::vec(arb_update(Uuid::nil()), 0..10),
            ops in prop::collection::vec(any::<bool>(), 0..20)
        ) {
            let mut selected = None;
            for op in ops {
                if op {
                    select_next_id(&bodies, &mut selected);
                } else {
                    select_prev_id(&bodies, &mut selected);
                }
            }
            if let Some(id) = selected {
                prop_assert!(bodies.iter().any(|u| u.update_id.as_uuid() == id));
            } else {
                prop_assert!(bodies.is_empty());
            }
        }

        /// Whatever interleaving of opens, closes, and tab switches happens,
        /// a completion from an older generation is never applied.
        #[test]
        fn prop_stale_generation_never_applies(switches in 1usize..6) {
            let mut sidebar = SidebarState::new(SidebarTab::Updates);
            let a = Uuid::now_v7();
            sidebar.open(a, "A".to_string(), SidebarTab::Updates);
            let stale = sidebar.generation;

            let mut tab = SidebarTab::Updates;
            for _ in 0..switches {
                tab = tab.next();
                sidebar.set_tab(tab);
            }

            let applied = sidebar.apply_loaded(
                stale,
                SidebarTab::Updates,
                a,
                Ok(TabRecords::Updates(Vec::new())),
            );
            prop_assert!(!applied);
        }

        /// Generation is strictly monotonic over state transitions.
        #[test]
        fn prop_generation_monotonic(ops in prop::collection::vec(0u8..4, 1..20)) {
            let mut sidebar = SidebarState::new(SidebarTab::Updates);
            let mut last = sidebar.generation;
            for op in ops {
                match op {
                    0 => { sidebar.open(Uuid::now_v7(), "X".to_string(), SidebarTab::Updates); }
                    1 => { sidebar.close(); }
                    2 => { sidebar.set_tab(sidebar.active_tab.next()); }
                    _ => { sidebar.bump_generation(); }
                }
                prop_assert!(sidebar.generation >= last);
                last = sidebar.generation;
            }
        }

        /// Opening entity b after a never leaves a's records visible.
        #[test]
        fn prop_entity_switch_clears_records(
            records in prop::collection::vec(arb_update(Uuid::nil()), 1..5)
        ) {
            let mut sidebar = SidebarState::new(SidebarTab::Updates);
            let a = Uuid::now_v7();
            let b = Uuid::now_v7();
            sidebar.open(a, "A".to_string(), SidebarTab::Updates);
            let generation = sidebar.generation;
            sidebar.apply_loaded(
                generation,
                SidebarTab::Updates,
                a,
                Ok(TabRecords::Updates(records)),
            );

            sidebar.open(b, "B".to_string(), SidebarTab::Updates);
            prop_assert!(sidebar.updates.records.is_empty());
            prop_assert!(sidebar.files.records.is_empty());
        }
    }
}
