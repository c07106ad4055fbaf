use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Constraint, Direction, Layout, Position};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, StatefulWidget};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

pub mod cache;
pub mod capability;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod geometry;
mod help_strings;
pub mod logging;
pub mod selection;
pub mod table;
pub mod widgets;

pub use cache::CacheManager;
pub use capability::{BubbleChartCapability, SelectionEvent, SortableTableCapability};
pub use cli::Args;
pub use config::{AppConfig, ConfigManager, Theme};
pub use dashboard::{Action, Dashboard};
pub use dataset::{Dataset, Record};
pub use error::DashError;
pub use filter::{BoundField, FilterState};
pub use table::SortState;

use widgets::bubble_chart::{BubbleChart, BubbleChartState};
use widgets::controls::Controls;
use widgets::datatable::{DataTable, DataTableState};
use widgets::debug::DebugState;
use widgets::help::HelpOverlay;
use widgets::text_input::{TextInput, TextInputEvent};

/// Application name used for cache directory and other app-specific paths
pub const APP_NAME: &str = "bubbledash";

const INPUT_WIDTH: u16 = 22;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Full text of a bound input after an edit
    BoundChanged(BoundField, String),
    PointSelected(SelectionEvent),
    Reset,
    Exit,
    Crash(String),
    Resize(u16, u16), // resized (width, height)
}

/// Pane receiving keyboard input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    MinInput,
    MaxInput,
    #[default]
    Chart,
    Table,
}

impl Focus {
    const ORDER: [Focus; 4] = [Focus::MinInput, Focus::MaxInput, Focus::Chart, Focus::Table];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn is_input(self) -> bool {
        self.field().is_some()
    }

    pub fn field(self) -> Option<BoundField> {
        match self {
            Focus::MinInput => Some(BoundField::MinRevenue),
            Focus::MaxInput => Some(BoundField::MaxRevenue),
            _ => None,
        }
    }
}

/// Screen regions from the last frame, for mouse routing.
#[derive(Debug, Default, Clone, Copy)]
struct FrameAreas {
    min_input: Rect,
    max_input: Rect,
    chart: Rect,
    table: Rect,
}

pub struct App {
    dashboard: Dashboard,
    chart: BubbleChartState,
    table: DataTableState,
    min_input: TextInput,
    max_input: TextInput,
    focus: Focus,
    show_help: bool,
    help_scroll: u16,
    areas: FrameAreas,
    pub debug: DebugState,
    theme: Theme,
    config: AppConfig,
}

impl App {
    pub fn new(dataset: Dataset) -> App {
        Self::new_with_config(dataset, Theme::default(), AppConfig::default())
    }

    pub fn new_with_config(dataset: Dataset, theme: Theme, app_config: AppConfig) -> App {
        let min_input = TextInput::new()
            .with_placeholder(BoundField::MinRevenue.placeholder())
            .with_theme(&theme);
        let max_input = TextInput::new()
            .with_placeholder(BoundField::MaxRevenue.placeholder())
            .with_theme(&theme);

        let mut app = App {
            dashboard: Dashboard::new(dataset),
            chart: BubbleChartState::new(app_config.chart.hit_tolerance),
            table: DataTableState::default(),
            min_input,
            max_input,
            focus: Focus::default(),
            show_help: false,
            help_scroll: 0,
            areas: FrameAreas::default(),
            debug: DebugState {
                enabled: app_config.debug.enabled,
                ..DebugState::default()
            },
            theme,
            config: app_config,
        };
        app.sync_views();
        app
    }

    pub fn enable_debug(&mut self) {
        self.debug.enabled = true;
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn chart_state(&self) -> &BubbleChartState {
        &self.chart
    }

    pub fn table_state(&self) -> &DataTableState {
        &self.table
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn input(&self, field: BoundField) -> &TextInput {
        match field {
            BoundField::MinRevenue => &self.min_input,
            BoundField::MaxRevenue => &self.max_input,
        }
    }

    fn input_mut(&mut self, field: BoundField) -> &mut TextInput {
        match field {
            BoundField::MinRevenue => &mut self.min_input,
            BoundField::MaxRevenue => &mut self.max_input,
        }
    }

    pub fn is_help_visible(&self) -> bool {
        self.show_help
    }

    /// Why the last action was rejected, cleared by the next accepted one.
    /// Only shown in the debug line.
    pub fn status(&self) -> Option<&str> {
        self.debug.last_error.as_deref()
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.min_input.set_focused(focus == Focus::MinInput);
        self.max_input.set_focused(focus == Focus::MaxInput);
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.table.set_sort(sort);
    }

    /// Put `raw` into a bound input as if typed, and return the resulting change.
    pub fn set_bound_text(&mut self, field: BoundField, raw: &str) -> AppEvent {
        self.input_mut(field).set_value(raw);
        AppEvent::BoundChanged(field, raw.to_string())
    }

    pub fn event(&mut self, event: &AppEvent) -> Option<AppEvent> {
        self.debug.num_events += 1;
        match event {
            AppEvent::Key(key) => self.key(key),
            AppEvent::Mouse(mouse) => self.mouse(mouse),
            AppEvent::BoundChanged(field, raw) => {
                self.apply(Action::BoundChanged {
                    field: *field,
                    raw: raw.clone(),
                });
                None
            }
            AppEvent::PointSelected(selection) => {
                self.apply(Action::PointSelected(*selection));
                None
            }
            AppEvent::Reset => {
                self.min_input.clear();
                self.max_input.clear();
                self.apply(Action::Reset);
                None
            }
            AppEvent::Resize(_cols, _rows) => None,
            AppEvent::Exit | AppEvent::Crash(_) => None,
        }
    }

    /// Run an action through the dashboard and push the new views into both
    /// widgets. Rejected actions leave everything as it was.
    fn apply(&mut self, action: Action) {
        self.debug.last_action = action.describe();
        match self.dashboard.dispatch(&action) {
            Ok(changed) => {
                self.debug.last_error = None;
                if changed {
                    self.sync_views();
                }
            }
            Err(e) => {
                tracing::warn!(action = %action.describe(), error = %e, "action ignored");
                self.debug.last_error = Some(e.to_string());
            }
        }
    }

    fn sync_views(&mut self) {
        let views = self.dashboard.views();
        self.chart.load(views.chart.clone(), views.revision);
        self.table.load(views.table.clone());
        self.debug.revision = views.revision;
    }

    fn key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        if event.kind != KeyEventKind::Press {
            return None;
        }
        self.debug.on_key(event);

        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && event.code == KeyCode::Char('c') {
            return Some(AppEvent::Exit);
        }

        if self.show_help {
            match event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => self.show_help = false,
                KeyCode::Char('h') if ctrl => self.show_help = false,
                KeyCode::Down | KeyCode::Char('j') => {
                    self.help_scroll = self.help_scroll.saturating_add(1)
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.help_scroll = self.help_scroll.saturating_sub(1)
                }
                _ => {}
            }
            return None;
        }

        match event.code {
            KeyCode::Tab => {
                self.set_focus(self.focus.next());
                return None;
            }
            KeyCode::BackTab => {
                self.set_focus(self.focus.prev());
                return None;
            }
            KeyCode::Char('h') if ctrl => {
                self.open_help();
                return None;
            }
            _ => {}
        }

        if let Some(field) = self.focus.field() {
            return match self.input_mut(field).handle_key(event) {
                TextInputEvent::Changed => Some(AppEvent::BoundChanged(
                    field,
                    self.input(field).value().to_string(),
                )),
                TextInputEvent::Submit | TextInputEvent::Cancel => {
                    self.set_focus(Focus::Chart);
                    None
                }
                TextInputEvent::None => None,
            };
        }

        match event.code {
            KeyCode::Char('q') => return Some(AppEvent::Exit),
            KeyCode::Char('R') => return Some(AppEvent::Reset),
            KeyCode::Char('?') => {
                self.open_help();
                return None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Chart => match event.code {
                KeyCode::Left | KeyCode::Char('h') => self.chart.highlight_prev(),
                KeyCode::Right | KeyCode::Char('l') => self.chart.highlight_next(),
                KeyCode::Enter | KeyCode::Char(' ') => {
                    return self.chart.highlighted.map(|index| {
                        AppEvent::PointSelected(SelectionEvent {
                            index,
                            revision: self.chart.revision(),
                        })
                    });
                }
                _ => {}
            },
            Focus::Table => match event.code {
                KeyCode::Down | KeyCode::Char('j') => self.table.select_next(),
                KeyCode::Up | KeyCode::Char('k') => self.table.select_previous(),
                KeyCode::Char(c @ '1'..='3') => {
                    let column = c as usize - '1' as usize;
                    self.table.toggle_sort(column);
                    self.debug.last_action = format!("sort {}", column);
                }
                _ => {}
            },
            Focus::MinInput | Focus::MaxInput => {}
        }
        None
    }

    fn open_help(&mut self) {
        self.show_help = true;
        self.help_scroll = 0;
    }

    fn mouse(&mut self, event: &MouseEvent) -> Option<AppEvent> {
        self.debug.on_mouse();
        if self.show_help {
            return None;
        }
        let pointer = (event.column, event.row);
        let position = Position::new(event.column, event.row);

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.areas.min_input.contains(position) {
                    self.set_focus(Focus::MinInput);
                } else if self.areas.max_input.contains(position) {
                    self.set_focus(Focus::MaxInput);
                } else if self.areas.chart.contains(position) {
                    self.set_focus(Focus::Chart);
                    if let Some(selection) = self.chart.select_at(pointer) {
                        return Some(AppEvent::PointSelected(selection));
                    }
                } else if self.areas.table.contains(position) {
                    self.set_focus(Focus::Table);
                    if let Some(column) = self.table.column_at(pointer) {
                        self.table.toggle_sort(column);
                        self.debug.last_action = format!("sort {}", column);
                    }
                }
            }
            MouseEventKind::Moved => {
                if self.areas.chart.contains(position) {
                    self.chart.highlighted = self.chart.element_at(pointer);
                }
            }
            MouseEventKind::ScrollDown if self.areas.table.contains(position) => {
                self.table.select_next()
            }
            MouseEventKind::ScrollUp if self.areas.table.contains(position) => {
                self.table.select_previous()
            }
            _ => {}
        }
        None
    }

    fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.theme.get("modal_border_active"))
        } else {
            Style::default().fg(self.theme.get("modal_border"))
        }
    }

    fn pane_block(&self, title: &str, focused: bool) -> Block<'static> {
        Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.border_style(focused))
    }

    fn render_filter_panel(&mut self, area: Rect, buf: &mut Buffer) {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(INPUT_WIDTH),
                Constraint::Length(INPUT_WIDTH),
                Constraint::Fill(1),
            ])
            .split(area);

        for (field, rect) in [
            (BoundField::MinRevenue, layout[0]),
            (BoundField::MaxRevenue, layout[1]),
        ] {
            let focused = self.focus.field() == Some(field);
            let block = self.pane_block(field.placeholder(), focused);
            let inner = block.inner(rect);
            block.render(rect, buf);
            self.input(field).render(inner, buf);
        }
        self.areas.min_input = layout[0];
        self.areas.max_input = layout[1];

        let filter = self.dashboard.filter();
        let shown = self.dashboard.views().view.len();
        let total = self.dashboard.dataset().len();
        let mut spans = vec![
            Span::styled("Range ", Style::default().fg(self.theme.get("text_secondary"))),
            Span::styled(
                filter.to_string(),
                Style::default()
                    .fg(self.theme.get("primary"))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {} of {} records", shown, total),
                Style::default().fg(self.theme.get("text_secondary")),
            ),
        ];
        if filter.min > filter.max {
            spans.push(Span::styled(
                "  (min > max)",
                Style::default().fg(self.theme.get("secondary")),
            ));
        }
        Paragraph::new(vec![Line::from(""), Line::from(spans)]).render(
            Rect {
                x: layout[2].x + 1,
                width: layout[2].width.saturating_sub(1),
                ..layout[2]
            },
            buf,
        );
    }

    fn help_text(&self) -> (&'static str, &'static str) {
        match self.focus {
            Focus::MinInput | Focus::MaxInput => ("Revenue Input Help", help_strings::filter_input()),
            Focus::Chart => ("Chart Help", help_strings::chart()),
            Focus::Table => ("Table Help", help_strings::table()),
        }
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.debug.num_frames += 1;

        let mut constraints = vec![
            Constraint::Length(1), // title
            Constraint::Length(3), // inputs
            Constraint::Fill(3),   // chart
            Constraint::Fill(2),   // table
            Constraint::Length(1), // controls
        ];
        if self.debug.enabled {
            constraints.push(Constraint::Length(1));
        }
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        Paragraph::new(Line::from(vec![
            Span::styled(
                " Revenue Dashboard ",
                Style::default()
                    .fg(self.theme.get("table_header"))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                geometry::SERIES_LABEL,
                Style::default().fg(self.theme.get("text_secondary")),
            ),
        ]))
        .style(Style::default().bg(self.theme.get("controls_bg")))
        .render(layout[0], buf);

        self.render_filter_panel(layout[1], buf);

        let chart = BubbleChart::new(&self.theme)
            .block(self.pane_block(geometry::SERIES_LABEL, self.focus == Focus::Chart))
            .show_tooltip(self.config.display.show_tooltip)
            .show_axis_labels(self.config.chart.show_axis_labels);
        chart.render(layout[2], buf, &mut self.chart);
        self.areas.chart = layout[2];

        let alternate_row_bg = self
            .config
            .display
            .alternate_row_shading
            .then(|| self.theme.get("alternate_row_bg"));
        let table = DataTable::new(&self.theme)
            .with_cell_padding(self.config.display.table_cell_padding)
            .with_alternate_row_bg(alternate_row_bg)
            .focused(self.focus == Focus::Table)
            .block(self.pane_block("Records", self.focus == Focus::Table));
        table.render(layout[3], buf, &mut self.table);
        self.areas.table = layout[3];

        let mut controls = Controls::new(self.focus, &self.theme).with_dimmed(self.show_help);
        if self.config.display.show_row_count {
            controls = controls.with_row_count(self.table.len());
        }
        controls.render(layout[4], buf);

        if self.debug.enabled {
            self.debug.render(layout[5], buf);
        }

        if self.show_help {
            let (title, section) = self.help_text();
            HelpOverlay::new(title, [help_strings::main_view(), section], &self.theme)
                .scroll(self.help_scroll)
                .render(area, buf);
        }
    }
}
