use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Paragraph, Widget},
};

use crate::config::Theme;
use crate::Focus;

/// Key hint bar along the bottom of the screen
pub struct Controls {
    pub row_count: Option<usize>,
    pub focus: Focus,
    pub dimmed: bool,
    bg: Color,
    key_fg: Color,
    text_fg: Color,
}

impl Controls {
    pub fn new(focus: Focus, theme: &Theme) -> Self {
        Self {
            row_count: None,
            focus,
            dimmed: false,
            bg: theme.get("controls_bg"),
            key_fg: theme.get("text_primary"),
            text_fg: theme.get("text_secondary"),
        }
    }

    pub fn with_row_count(mut self, row_count: usize) -> Self {
        self.row_count = Some(row_count);
        self
    }

    pub fn with_dimmed(mut self, dimmed: bool) -> Self {
        self.dimmed = dimmed;
        self
    }

    /// Hints for the focused pane, followed by the global ones
    pub fn hints(&self) -> Vec<(&'static str, &'static str)> {
        let mut hints = vec![("Tab", "Focus")];
        match self.focus {
            Focus::MinInput | Focus::MaxInput => hints.push(("Esc", "Leave")),
            Focus::Chart => {
                hints.push(("←→", "Point"));
                hints.push(("Enter", "Select"));
            }
            Focus::Table => {
                hints.push(("↑↓", "Row"));
                hints.push(("1-3", "Sort"));
            }
        }
        hints.push(("R", "Reset"));
        hints.push(("?", "Help"));
        if !self.focus.is_input() {
            hints.push(("q", "Quit"));
        }
        hints
    }
}

impl Widget for &Controls {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let hints = self.hints();

        let mut constraints = hints.iter().fold(vec![], |mut acc, (key, action)| {
            acc.push(Constraint::Length(key.chars().count() as u16 + 2));
            acc.push(Constraint::Length(action.chars().count() as u16 + 1));
            acc
        });

        if self.row_count.is_some() {
            constraints.push(Constraint::Length(15)); // "Rows: 12345"
        }
        constraints.push(Constraint::Fill(1));

        let layout = Layout::new(Direction::Horizontal, constraints).split(area);

        let base_style = if self.dimmed {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(self.key_fg)
        };

        for (i, (key, action)) in hints.iter().enumerate() {
            let j = i * 2;
            Paragraph::new(*key)
                .style(base_style.add_modifier(Modifier::BOLD))
                .centered()
                .render(layout[j], buf);
            Paragraph::new(*action)
                .style(base_style.bg(self.bg).fg(self.text_fg))
                .render(layout[j + 1], buf);
        }

        let mut fill_start_idx = hints.len() * 2;
        if let Some(count) = self.row_count {
            Paragraph::new(format!("Rows: {}", count))
                .style(base_style.bg(self.bg))
                .right_aligned()
                .render(layout[fill_start_idx], buf);
            fill_start_idx += 1;
        }

        Paragraph::new("")
            .style(base_style.bg(self.bg))
            .render(layout[fill_start_idx], buf);
    }
}
