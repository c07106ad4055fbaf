use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Widget,
};
use tui_textarea::{Input, Key, TextArea};

use crate::config::Theme;

/// Event emitted by TextInput widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInputEvent {
    None,
    Changed, // value changed
    Submit,  // Enter pressed
    Cancel,  // Esc pressed
}

/// Single-line text input widget wrapping tui-textarea
pub struct TextInput {
    textarea: TextArea<'static>,
    value: String,
    placeholder: String,
    text_color: Option<Color>,
    placeholder_color: Option<Color>,
    focused: bool,
}

impl TextInput {
    pub fn new() -> Self {
        let mut widget = Self {
            textarea: TextArea::default(),
            value: String::new(),
            placeholder: String::new(),
            text_color: None,
            placeholder_color: None,
            focused: false,
        };
        widget.apply_styles();
        widget
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Text and placeholder colors from theme
    pub fn with_theme(mut self, theme: &Theme) -> Self {
        self.text_color = Some(theme.get("text_primary"));
        self.placeholder_color = Some(theme.get("text_secondary"));
        self.apply_styles();
        self
    }

    fn apply_styles(&mut self) {
        let mut style = Style::default();
        if let Some(text_color) = self.text_color {
            style = style.fg(text_color);
        }
        self.textarea.set_style(style);
        // Disable cursor line underline
        self.textarea.set_cursor_line_style(Style::default());
        // Same style as the text hides the cursor
        let cursor_style = if self.focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            style
        };
        self.textarea.set_cursor_style(cursor_style);
    }

    pub fn set_focused(&mut self, focused: bool) {
        if self.focused != focused {
            self.focused = focused;
            self.apply_styles();
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: &str) {
        let single_line = value.replace(['\n', '\r'], " ");
        self.textarea = TextArea::new(vec![single_line.clone()]);
        self.textarea.move_cursor(tui_textarea::CursorMove::End);
        self.value = single_line;
        self.apply_styles();
    }

    pub fn clear(&mut self) {
        self.set_value("");
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn handle_key(&mut self, event: &KeyEvent) -> TextInputEvent {
        match event.code {
            KeyCode::Enter => TextInputEvent::Submit,
            KeyCode::Esc => TextInputEvent::Cancel,
            _ => {
                let input = key_event_to_input(event);
                if matches!(input.key, Key::Char('\n') | Key::Char('\r') | Key::Null) {
                    return TextInputEvent::None;
                }
                self.textarea.input(input);
                let value = self.textarea.lines().first().cloned().unwrap_or_default();
                if value != self.value {
                    self.value = value;
                    TextInputEvent::Changed
                } else {
                    TextInputEvent::None
                }
            }
        }
    }
}

/// Convert crossterm KeyEvent to tui_textarea::Input
fn key_event_to_input(event: &KeyEvent) -> Input {
    let key = match event.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        // Single line: vertical movement, tabs and the rest are ignored
        _ => Key::Null,
    };

    Input {
        key,
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
        alt: event.modifiers.contains(KeyModifiers::ALT),
        shift: event.modifiers.contains(KeyModifiers::SHIFT),
    }
}

impl Default for TextInput {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &TextInput {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        if self.is_empty() && !self.focused && !self.placeholder.is_empty() {
            let style = self
                .placeholder_color
                .map(|c| Style::default().fg(c))
                .unwrap_or_default();
            Span::styled(self.placeholder.as_str(), style).render(area, buf);
            return;
        }

        self.textarea.render(area, buf);

        // Remove underline modifier from all cells
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                let cell = &mut buf[(x, y)];
                let style = cell.style().remove_modifier(Modifier::UNDERLINED);
                cell.set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_text_input_new() {
        let input = TextInput::new();
        assert_eq!(input.value(), "");
        assert!(input.is_empty());
    }

    #[test]
    fn test_typing_reports_changes() {
        let mut input = TextInput::new();
        assert_eq!(input.handle_key(&key(KeyCode::Char('5'))), TextInputEvent::Changed);
        assert_eq!(input.handle_key(&key(KeyCode::Char('0'))), TextInputEvent::Changed);
        assert_eq!(input.value(), "50");
        assert_eq!(input.handle_key(&key(KeyCode::Backspace)), TextInputEvent::Changed);
        assert_eq!(input.value(), "5");
    }

    #[test]
    fn test_non_editing_keys() {
        let mut input = TextInput::new();
        assert_eq!(input.handle_key(&key(KeyCode::Up)), TextInputEvent::None);
        assert_eq!(input.handle_key(&key(KeyCode::Enter)), TextInputEvent::Submit);
        assert_eq!(input.handle_key(&key(KeyCode::Esc)), TextInputEvent::Cancel);
        // backspace on empty input changes nothing
        assert_eq!(input.handle_key(&key(KeyCode::Backspace)), TextInputEvent::None);
    }

    #[test]
    fn test_set_value_and_clear() {
        let mut input = TextInput::new();
        input.set_value("12\n3");
        assert_eq!(input.value(), "12 3");
        input.handle_key(&key(KeyCode::Char('4')));
        assert_eq!(input.value(), "12 34");
        input.clear();
        assert!(input.is_empty());
    }

    #[test]
    fn test_placeholder_rendered_when_empty() {
        let input = TextInput::new().with_placeholder("Min Revenue");
        let area = Rect::new(0, 0, 12, 1);
        let mut buf = ratatui::buffer::Buffer::empty(area);
        (&input).render(area, &mut buf);
        let text: String = (0..11).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert_eq!(text, "Min Revenue");
    }
}
