//! Enum types for Trellis entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entity kind discriminator. Selects which route set and copy a sidebar
/// instance binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Opportunity,
    Job,
}

impl EntityKind {
    /// Lowercase wire segment used in routes and cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Opportunity => "opportunity",
            EntityKind::Job => "job",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "opportunity" | "opportunities" => Ok(EntityKind::Opportunity),
            "job" | "jobs" => Ok(EntityKind::Job),
            _ => Err(format!("Invalid EntityKind: {}", s)),
        }
    }
}

/// A named sub-view within the sidebar showing one category of related data.
/// Exactly one tab is active per panel instance at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidebarTab {
    Updates,
    Files,
}

impl SidebarTab {
    pub fn title(&self) -> &'static str {
        match self {
            SidebarTab::Updates => "Updates",
            SidebarTab::Files => "Files",
        }
    }

    /// Lowercase token used in cache keys and element ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            SidebarTab::Updates => "updates",
            SidebarTab::Files => "files",
        }
    }

    pub fn all() -> &'static [SidebarTab] {
        &[SidebarTab::Updates, SidebarTab::Files]
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<SidebarTab> {
        Self::all().get(index).copied()
    }

    pub fn next(&self) -> SidebarTab {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn previous(&self) -> SidebarTab {
        let all = Self::all();
        let idx = self.index();
        all[if idx == 0 { all.len() - 1 } else { idx - 1 }]
    }
}

impl fmt::Display for SidebarTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

impl FromStr for SidebarTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "updates" => Ok(SidebarTab::Updates),
            "files" => Ok(SidebarTab::Files),
            _ => Err(format!("Invalid SidebarTab: {}", s)),
        }
    }
}

/// Kind of an update record attached to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    Note,
    Email,
    Activity,
    System,
}

impl fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            UpdateKind::Note => "Note",
            UpdateKind::Email => "Email",
            UpdateKind::Activity => "Activity",
            UpdateKind::System => "System",
        };
        write!(f, "{}", value)
    }
}

impl FromStr for UpdateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "note" => Ok(UpdateKind::Note),
            "email" => Ok(UpdateKind::Email),
            "activity" => Ok(UpdateKind::Activity),
            "system" => Ok(UpdateKind::System),
            _ => Err(format!("Invalid UpdateKind: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_kind_roundtrips_through_str() {
        for kind in [EntityKind::Opportunity, EntityKind::Job] {
            assert_eq!(kind.as_str().parse::<EntityKind>().unwrap(), kind);
        }
    }

    #[test]
    fn sidebar_tab_navigation_is_cyclic() {
        for tab in SidebarTab::all() {
            assert_eq!(tab.next().previous(), *tab);
            assert_eq!(tab.previous().next(), *tab);
        }
        let mut tab = SidebarTab::Updates;
        for _ in 0..SidebarTab::all().len() {
            tab = tab.next();
        }
        assert_eq!(tab, SidebarTab::Updates);
    }

    #[test]
    fn sidebar_tab_index_roundtrips() {
        for tab in SidebarTab::all() {
            assert_eq!(SidebarTab::from_index(tab.index()), Some(*tab));
        }
        assert_eq!(SidebarTab::from_index(99), None);
    }

    #[test]
    fn update_kind_parse_rejects_unknown() {
        assert!("webhook".parse::<UpdateKind>().is_err());
        assert_eq!("Email".parse::<UpdateKind>().unwrap(), UpdateKind::Email);
    }
}
