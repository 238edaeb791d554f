//! Harbor theme and color utilities.

use crate::notifications::NotificationLevel;
use ratatui::style::Color;
use trellis_core::UpdateKind;

#[derive(Debug, Clone)]
pub struct HarborTheme {
    pub bg: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub primary_dim: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl HarborTheme {
    pub fn harbor() -> Self {
        Self {
            bg: Color::Rgb(13, 17, 23),
            bg_highlight: Color::Rgb(33, 38, 45),
            primary: Color::Rgb(88, 166, 255),
            primary_dim: Color::Rgb(31, 111, 235),
            secondary: Color::Rgb(188, 140, 255),
            success: Color::Rgb(63, 185, 80),
            warning: Color::Rgb(210, 153, 34),
            error: Color::Rgb(248, 81, 73),
            info: Color::Rgb(88, 166, 255),
            text: Color::Rgb(230, 237, 243),
            text_dim: Color::Rgb(139, 148, 158),
            border: Color::Rgb(48, 54, 61),
            border_focus: Color::Rgb(88, 166, 255),
        }
    }
}

pub fn update_kind_color(kind: UpdateKind, theme: &HarborTheme) -> Color {
    match kind {
        UpdateKind::Note => theme.primary,
        UpdateKind::Email => theme.secondary,
        UpdateKind::Activity => theme.success,
        UpdateKind::System => theme.text_dim,
    }
}

pub fn notification_color(level: &NotificationLevel, theme: &HarborTheme) -> Color {
    match level {
        NotificationLevel::Info => theme.info,
        NotificationLevel::Warning => theme.warning,
        NotificationLevel::Error => theme.error,
        NotificationLevel::Success => theme.success,
    }
}
