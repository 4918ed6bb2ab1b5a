//! Theme state and palettes for the terminal shell.
//!
//! One shell, parameterized by theme: every screen takes its colors from
//! [`Theme`], so light and dark are palette swaps rather than duplicated
//! components.

use std::fmt;

use ratatui::style::Color;

use crate::store::Priority;

/// Which appearance is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeKind {
    /// Light appearance.
    Light,
    /// Dark appearance.
    Dark,
}

impl ThemeKind {
    /// The other appearance; used by the theme toggle.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Returns true if this is the dark appearance.
    pub fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }
}

impl fmt::Display for ThemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

/// Color palette for the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Which appearance this palette renders.
    pub kind: ThemeKind,
    /// Default background.
    pub bg: Color,
    /// Default foreground.
    pub fg: Color,
    /// De-emphasized text (completed tasks, hints, separators).
    pub dim: Color,
    /// Interactive highlights and the selected row.
    pub accent: Color,
    /// Error notices.
    pub error: Color,
    /// Success notices.
    pub success: Color,
    /// Low-priority badge.
    pub priority_low: Color,
    /// Medium-priority badge.
    pub priority_medium: Color,
    /// High-priority badge.
    pub priority_high: Color,
}

impl Theme {
    /// The palette for the given appearance.
    pub fn of(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Dark => Self::dark(),
            ThemeKind::Light => Self::light(),
        }
    }

    fn dark() -> Self {
        Self {
            kind: ThemeKind::Dark,
            bg: Color::Reset,
            fg: Color::White,
            dim: Color::DarkGray,
            accent: Color::Cyan,
            error: Color::Red,
            success: Color::Green,
            priority_low: Color::Green,
            priority_medium: Color::Yellow,
            priority_high: Color::Red,
        }
    }

    fn light() -> Self {
        Self {
            kind: ThemeKind::Light,
            bg: Color::White,
            fg: Color::Black,
            dim: Color::Gray,
            accent: Color::Blue,
            error: Color::LightRed,
            success: Color::LightGreen,
            priority_low: Color::LightGreen,
            priority_medium: Color::LightYellow,
            priority_high: Color::LightRed,
        }
    }

    /// Switch to the other appearance.
    pub fn toggled(self) -> Self {
        Self::of(self.kind.toggled())
    }

    /// Badge color for a task priority.
    pub fn priority_color(&self, priority: Priority) -> Color {
        match priority {
            Priority::Low => self.priority_low,
            Priority::Medium => self.priority_medium,
            Priority::High => self.priority_high,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_kind() {
        assert_eq!(ThemeKind::Light.toggled(), ThemeKind::Dark);
        assert_eq!(ThemeKind::Dark.toggled(), ThemeKind::Light);
        assert_eq!(Theme::of(ThemeKind::Dark).toggled().kind, ThemeKind::Light);
    }

    #[test]
    fn default_is_dark() {
        assert!(Theme::default().kind.is_dark());
    }

    #[test]
    fn kind_display() {
        assert_eq!(ThemeKind::Light.to_string(), "light");
        assert_eq!(ThemeKind::Dark.to_string(), "dark");
    }

    #[test]
    fn priority_badges_follow_severity() {
        for theme in [Theme::of(ThemeKind::Dark), Theme::of(ThemeKind::Light)] {
            assert_ne!(
                theme.priority_color(Priority::Low),
                theme.priority_color(Priority::High)
            );
            assert_ne!(
                theme.priority_color(Priority::Medium),
                theme.priority_color(Priority::High)
            );
        }
    }
}
