use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::config::Theme;

/// Centered rect with fixed width and height, clamped to fit inside `r`.
pub fn centered_rect_fixed(r: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(r.width);
    let h = height.min(r.height);
    Rect {
        x: r.x + r.width.saturating_sub(w) / 2,
        y: r.y + r.height.saturating_sub(h) / 2,
        width: w,
        height: h,
    }
}

/// Modal help text: the global section followed by the focused pane's section.
pub struct HelpOverlay<'a> {
    pub title: &'a str,
    pub sections: [&'a str; 2],
    pub scroll: u16,
    theme: &'a Theme,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(title: &'a str, sections: [&'a str; 2], theme: &'a Theme) -> Self {
        Self {
            title,
            sections,
            scroll: 0,
            theme,
        }
    }

    pub fn scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn text(&self) -> String {
        self.sections.join("\n")
    }
}

impl Widget for &HelpOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = self.text();
        let height = text.lines().count() as u16 + 2;
        let popup_area = centered_rect_fixed(area, 76, height);
        Clear.render(popup_area, buf);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.get("modal_border_active")));
        let inner = block.inner(popup_area);
        block.render(popup_area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Fill(1)])
            .horizontal_margin(1)
            .split(inner);

        Paragraph::new(text)
            .style(Style::default().fg(self.theme.get("text_primary")))
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(layout[0], buf);
    }
}
