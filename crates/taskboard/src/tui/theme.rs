use ratatui::style::{Color, Modifier, Style};
use taskboard_core::{Priority, Theme};

/// Colours for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Palette {
    pub(super) fg: Color,
    pub(super) bg: Color,
    pub(super) muted: Color,
    pub(super) accent: Color,
    pub(super) error: Color,
    pub(super) warning: Color,
    pub(super) success: Color,
}

impl Palette {
    pub(super) const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                fg: Color::Black,
                bg: Color::White,
                muted: Color::DarkGray,
                accent: Color::Blue,
                error: Color::Red,
                warning: Color::Rgb(0xb0, 0x6a, 0x00),
                success: Color::Green,
            },
            Theme::Dark => Self {
                fg: Color::Gray,
                bg: Color::Black,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                error: Color::LightRed,
                warning: Color::Yellow,
                success: Color::LightGreen,
            },
        }
    }

    pub(super) fn base(self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub(super) fn muted(self) -> Style {
        Style::default().fg(self.muted)
    }

    pub(super) fn border(self) -> Style {
        Style::default().fg(self.accent)
    }

    pub(super) fn highlight(self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub(super) const fn priority(self, priority: Priority) -> Color {
        match priority {
            Priority::High => self.error,
            Priority::Medium => self.warning,
            Priority::Low => self.success,
        }
    }
}
