//! Sidebar panel configuration and the per-kind bindings.
//!
//! A `SidebarConfig` is built once per entity kind and never mutated. The
//! kind-specific constructors are pure configuration: routes, invalidation
//! prefixes, and copy. They must not diverge in shape.

use trellis_client::{QueryKey, RouteSet};
use trellis_core::{EntityKind, SidebarTab};

#[derive(Debug, Clone)]
pub struct SidebarConfig {
    pub kind: EntityKind,
    pub routes: RouteSet,
    /// Cache-key prefixes invalidated after any create/delete, on top of
    /// the mutated entity's own list key. These name the board list views
    /// outside the panel.
    pub invalidation_keys: Vec<QueryKey>,
    pub initial_tab: SidebarTab,
    /// Prefix for deterministic element identifiers exposed to external
    /// verification tooling.
    pub test_id_prefix: &'static str,
    pub empty_updates_message: &'static str,
    pub empty_files_message: &'static str,
    /// Collection endpoint backing the directory pane.
    pub directory_path: &'static str,
    pub board_title: &'static str,
}

impl SidebarConfig {
    pub fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Opportunity => Self::opportunity(),
            EntityKind::Job => Self::job(),
        }
    }

    pub fn opportunity() -> Self {
        Self {
            kind: EntityKind::Opportunity,
            routes: RouteSet::for_kind(EntityKind::Opportunity),
            invalidation_keys: vec![QueryKey::new(["pipeline-board"])],
            initial_tab: SidebarTab::Updates,
            test_id_prefix: "opportunity-sidebar",
            empty_updates_message:
                "Write a note, drop an email, or share files to get things moving",
            empty_files_message: "Upload files or paste screenshots to attach them",
            directory_path: "/api/v1/opportunities",
            board_title: "Pipeline",
        }
    }

    pub fn job() -> Self {
        Self {
            kind: EntityKind::Job,
            routes: RouteSet::for_kind(EntityKind::Job),
            invalidation_keys: vec![QueryKey::new(["job-board"])],
            initial_tab: SidebarTab::Updates,
            test_id_prefix: "job-sidebar",
            empty_updates_message:
                "Write a note, drop an email, or share files to get things moving",
            empty_files_message: "Upload files or paste screenshots to attach them",
            directory_path: "/api/v1/jobs",
            board_title: "Jobs",
        }
    }

    /// Deterministic identifier for a rendered region: `{prefix}-{part}`.
    pub fn element_id(&self, part: &str) -> String {
        format!("{}-{}", self.test_id_prefix, part)
    }

    pub fn empty_message(&self, tab: SidebarTab) -> &'static str {
        match tab {
            SidebarTab::Updates => self.empty_updates_message,
            SidebarTab::Files => self.empty_files_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_ids_are_prefixed_and_deterministic() {
        let config = SidebarConfig::opportunity();
        assert_eq!(config.element_id("header"), "opportunity-sidebar-header");
        assert_eq!(
            config.element_id("empty-files"),
            "opportunity-sidebar-empty-files"
        );
        assert_eq!(config.element_id("header"), config.element_id("header"));
    }

    #[test]
    fn empty_messages_match_per_tab_copy() {
        let config = SidebarConfig::opportunity();
        assert_eq!(
            config.empty_message(SidebarTab::Updates),
            "Write a note, drop an email, or share files to get things moving"
        );
        assert_eq!(
            config.empty_message(SidebarTab::Files),
            "Upload files or paste screenshots to attach them"
        );
    }

    #[test]
    fn instances_differ_only_in_kind_derived_values() {
        let opp = SidebarConfig::opportunity();
        let job = SidebarConfig::job();

        assert_eq!(opp.initial_tab, job.initial_tab);
        assert_eq!(opp.invalidation_keys.len(), job.invalidation_keys.len());
        assert_ne!(opp.kind, job.kind);
        assert_ne!(opp.test_id_prefix, job.test_id_prefix);
        assert_ne!(opp.directory_path, job.directory_path);
        assert_ne!(opp.invalidation_keys, job.invalidation_keys);
    }

    #[test]
    fn for_kind_dispatches_to_the_matching_binding() {
        assert_eq!(
            SidebarConfig::for_kind(EntityKind::Job).test_id_prefix,
            SidebarConfig::job().test_id_prefix
        );
    }
}
