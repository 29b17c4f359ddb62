//! Color theme and styling for the kidsfun TUI

use ratatui::style::{Color, Modifier, Style};

use crate::canvas::PALETTE_SIZE;

/// Bright, high-contrast colors for young readers
#[derive(Debug, Clone)]
pub struct KidsTheme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,
    pub title: Color,

    // Story colors
    pub story_text: Color,
    pub choice: Color,
    pub ending: Color,
    pub generated: Color,

    // Menu and pickers
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub picked: Color,

    // Drawing studio
    pub palette: [Color; PALETTE_SIZE],
    pub canvas_bg: Color,

    // Math feedback
    pub correct: Color,
    pub wrong: Color,

    // Report colors
    pub bar: Color,
    pub suggestion: Color,
    pub system_text: Color,
}

impl Default for KidsTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Magenta,
            title: Color::LightMagenta,

            story_text: Color::White,
            choice: Color::LightCyan,
            ending: Color::LightYellow,
            generated: Color::LightGreen,

            highlight_fg: Color::Black,
            highlight_bg: Color::LightYellow,
            picked: Color::LightGreen,

            palette: [
                Color::LightRed,
                Color::LightYellow,
                Color::LightGreen,
                Color::LightCyan,
                Color::LightBlue,
                Color::LightMagenta,
            ],
            canvas_bg: Color::Black,

            correct: Color::LightGreen,
            wrong: Color::LightRed,

            bar: Color::LightBlue,
            suggestion: Color::LightYellow,
            system_text: Color::DarkGray,
        }
    }
}

impl KidsTheme {
    /// Style for a painted canvas cell
    pub fn paint_style(&self, colour: usize) -> Style {
        let fg = self.palette.get(colour).copied().unwrap_or(self.foreground);
        Style::default().fg(fg).bg(self.canvas_bg)
    }

    pub fn canvas_style(&self) -> Style {
        Style::default().bg(self.canvas_bg)
    }

    /// Style for math feedback
    pub fn feedback_style(&self, correct: bool) -> Style {
        let fg = if correct { self.correct } else { self.wrong };
        Style::default().fg(fg).add_modifier(Modifier::BOLD)
    }

    /// Get style for normal text
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    /// Get style for story narration
    pub fn story_style(&self) -> Style {
        Style::default().fg(self.story_text)
    }

    /// Get style for a numbered choice
    pub fn choice_style(&self) -> Style {
        Style::default().fg(self.choice)
    }

    /// Get style for "The End" and finished stories
    pub fn ending_style(&self) -> Style {
        Style::default()
            .fg(self.ending)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for storyteller output
    pub fn generated_style(&self) -> Style {
        Style::default()
            .fg(self.generated)
            .add_modifier(Modifier::ITALIC)
    }

    /// Get style for the selected menu entry
    pub fn highlight_style(&self) -> Style {
        Style::default()
            .fg(self.highlight_fg)
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for an option that is already picked
    pub fn picked_style(&self) -> Style {
        Style::default()
            .fg(self.picked)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for report bars
    pub fn bar_style(&self) -> Style {
        Style::default().fg(self.bar)
    }

    /// Get style for report suggestions
    pub fn suggestion_style(&self) -> Style {
        Style::default().fg(self.suggestion)
    }

    /// Get style for system messages
    pub fn system_style(&self) -> Style {
        Style::default()
            .fg(self.system_text)
            .add_modifier(Modifier::DIM)
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    /// Get title bar style
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.title)
            .add_modifier(Modifier::BOLD)
    }
}
