use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Paragraph, Widget},
};

#[derive(Default)]
pub struct DebugState {
    pub num_events: usize,
    pub num_frames: usize,
    pub num_key_events: usize,
    pub num_mouse_events: usize,
    pub last_key_event_name: String,
    /// Last dashboard action, as described by `Action::describe`.
    pub last_action: String,
    /// Last rejected action, if any.
    pub last_error: Option<String>,
    pub revision: u64,
    pub enabled: bool,
}

impl DebugState {
    pub fn on_key(&mut self, event: &crossterm::event::KeyEvent) {
        self.num_key_events += 1;
        self.last_key_event_name = format!("{:?}", event.code);
    }

    pub fn on_mouse(&mut self) {
        self.num_mouse_events += 1;
    }
}

impl Widget for &DebugState {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let error = self.last_error.as_deref().unwrap_or("-");
        Paragraph::new(format!(
            "events={} keys={} mouse={} last_key={} last_action={} rev={} error={} frames={}",
            self.num_events,
            self.num_key_events,
            self.num_mouse_events,
            self.last_key_event_name,
            self.last_action,
            self.revision,
            error,
            self.num_frames,
        ))
        .render(area, buf);
    }
}
