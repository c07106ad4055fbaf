#![allow(dead_code)]

use bubbledash::{App, AppEvent, Dataset, Record};
use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

/// Dataset from `(id, name, revenue, population)` tuples.
pub fn dataset(records: &[(u64, &str, f64, f64)]) -> Dataset {
    Dataset::new(
        records
            .iter()
            .map(|&(id, name, revenue, population)| Record::new(id, name, revenue, population))
            .collect(),
    )
    .unwrap()
}

/// The two-record dataset used by the end-to-end scenario.
pub fn two_items() -> Dataset {
    dataset(&[(1, "Item 1", 5000.0, 300.0), (2, "Item 2", 7000.0, 500.0)])
}

pub fn key(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

pub fn ctrl(c: char) -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

pub fn mouse(kind: MouseEventKind, column: u16, row: u16) -> AppEvent {
    AppEvent::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

pub fn click(column: u16, row: u16) -> AppEvent {
    mouse(MouseEventKind::Down(MouseButton::Left), column, row)
}

/// Feed an event and every follow-up event it produces, the way the main
/// loop does. Returns the last event that was not consumed (e.g. `Exit`).
pub fn drive(app: &mut App, event: AppEvent) -> Option<AppEvent> {
    let mut next = app.event(&event);
    while let Some(event) = next.take() {
        if matches!(event, AppEvent::Exit | AppEvent::Crash(_)) {
            return Some(event);
        }
        next = app.event(&event);
    }
    None
}

pub fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        drive(app, key(KeyCode::Char(c)));
    }
}

pub fn render(app: &mut App, width: u16, height: u16) -> Buffer {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    app.render(area, &mut buf);
    buf
}

pub fn buffer_text(buf: &Buffer) -> String {
    let area = buf.area;
    (area.y..area.bottom())
        .map(|y| {
            (area.x..area.right())
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
