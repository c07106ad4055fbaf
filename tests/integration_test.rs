use bubbledash::capability::SelectionEvent;
use bubbledash::geometry::GeometryPoint;
use bubbledash::widgets::text_input::TextInput;
use bubbledash::{
    App, AppEvent, BoundField, BubbleChartCapability, Dataset, FilterState,
    SortableTableCapability,
};
use crossterm::event::{KeyCode, MouseEventKind};

mod common;
use common::{buffer_text, click, ctrl, drive, key, mouse, render, type_text, two_items};

fn table_ids(app: &App) -> Vec<u64> {
    app.table_state().rows_in_order().map(|r| r.id).collect()
}

fn chart_x(app: &App) -> Vec<f64> {
    app.chart_state().data().points().iter().map(|p| p.x).collect()
}

fn input_text(app: &App, field: BoundField) -> String {
    let input: &TextInput = app.input(field);
    input.value().to_string()
}

#[test]
fn test_app_creation() {
    let app = App::new(Dataset::sample());
    assert_eq!(app.focus(), bubbledash::Focus::Chart);
    assert_eq!(app.dashboard().filter(), FilterState::default());
    assert_eq!(table_ids(&app), vec![1, 2, 3, 4, 5]);
    assert_eq!(app.chart_state().len(), 5);
    assert_eq!(app.chart_state().revision(), 0);
}

#[test]
fn test_typing_max_revenue_filters_both_views() {
    let mut app = App::new(Dataset::sample());
    drive(&mut app, key(KeyCode::BackTab));
    assert_eq!(app.focus(), bubbledash::Focus::MaxInput);

    type_text(&mut app, "3000");
    assert_eq!(input_text(&app, BoundField::MaxRevenue), "3000");
    assert_eq!(app.dashboard().filter(), FilterState::new(0.0, 3000.0));
    assert_eq!(chart_x(&app), vec![2000.0, 2500.0]);
    assert_eq!(table_ids(&app), vec![3, 4]);
    assert_eq!(app.chart_state().revision(), app.dashboard().revision());
}

#[test]
fn test_non_numeric_min_counts_as_zero() {
    let mut app = App::new(Dataset::sample());
    drive(&mut app, key(KeyCode::BackTab));
    drive(&mut app, key(KeyCode::BackTab));
    assert_eq!(app.focus(), bubbledash::Focus::MinInput);

    type_text(&mut app, "abc");
    assert_eq!(input_text(&app, BoundField::MinRevenue), "abc");
    assert_eq!(app.dashboard().filter(), FilterState::default());
    assert_eq!(app.dashboard().revision(), 0);
    assert_eq!(app.status(), None);

    // 'q' inside an input is text, not quit
    assert_eq!(drive(&mut app, key(KeyCode::Char('q'))), None);
    assert_eq!(input_text(&app, BoundField::MinRevenue), "abcq");
}

#[test]
fn test_keyboard_selection_narrows_to_record() {
    let mut app = App::new(Dataset::sample());
    drive(&mut app, key(KeyCode::Right));
    assert_eq!(app.chart_state().highlighted, Some(2));
    drive(&mut app, key(KeyCode::Enter));

    assert_eq!(app.dashboard().filter(), FilterState::exact(2000.0));
    assert_eq!(table_ids(&app), vec![3]);
    assert_eq!(chart_x(&app), vec![2000.0]);
    // inputs keep what the user typed
    assert_eq!(input_text(&app, BoundField::MinRevenue), "");
    assert_eq!(input_text(&app, BoundField::MaxRevenue), "");
    // highlight belonged to the old geometry
    assert_eq!(app.chart_state().highlighted, None);
}

#[test]
fn test_reset_restores_full_range_and_clears_inputs() {
    let mut app = App::new(Dataset::sample());
    drive(&mut app, key(KeyCode::BackTab));
    type_text(&mut app, "2600");
    drive(&mut app, key(KeyCode::Esc));
    assert_eq!(app.focus(), bubbledash::Focus::Chart);
    assert_eq!(table_ids(&app), vec![3, 4]);

    drive(&mut app, key(KeyCode::Char('R')));
    assert_eq!(app.dashboard().filter(), FilterState::default());
    assert_eq!(table_ids(&app), vec![1, 2, 3, 4, 5]);
    assert_eq!(input_text(&app, BoundField::MaxRevenue), "");
}

#[test]
fn test_stale_selection_is_ignored() {
    let mut app = App::new(Dataset::sample());
    let stale = SelectionEvent {
        index: 0,
        revision: app.chart_state().revision(),
    };
    let changed = app.set_bound_text(BoundField::MinRevenue, "3000");
    drive(&mut app, changed);
    let before = app.dashboard().filter();

    drive(&mut app, AppEvent::PointSelected(stale));
    assert_eq!(app.dashboard().filter(), before);
    assert!(app.status().is_some());
}

#[test]
fn test_out_of_range_selection_is_ignored() {
    let mut app = App::new(Dataset::sample());
    drive(
        &mut app,
        AppEvent::PointSelected(SelectionEvent {
            index: 5,
            revision: 0,
        }),
    );
    assert_eq!(app.dashboard().filter(), FilterState::default());
    assert_eq!(app.dashboard().revision(), 0);
    assert!(app.status().unwrap().contains("outside"));

    // next accepted action clears the message, even a no-op one
    drive(&mut app, key(KeyCode::Char('R')));
    assert_eq!(app.status(), None);
    assert_eq!(app.dashboard().revision(), 0);
}

#[test]
fn test_mouse_click_on_bubble_selects_it() {
    let mut app = App::new(Dataset::sample());
    render(&mut app, 100, 40);
    let (column, row) = app.chart_state().point_cell(0).unwrap();

    drive(&mut app, click(column, row));
    assert_eq!(app.dashboard().filter(), FilterState::exact(5000.0));
    assert_eq!(table_ids(&app), vec![1]);
}

#[test]
fn test_mouse_hover_shows_tooltip() {
    let mut app = App::new(Dataset::sample());
    render(&mut app, 100, 40);
    let (column, row) = app.chart_state().point_cell(1).unwrap();

    drive(&mut app, mouse(MouseEventKind::Moved, column, row));
    assert_eq!(app.chart_state().highlighted, Some(1));
    let text = buffer_text(&render(&mut app, 100, 40));
    assert!(text.contains("Revenue: 7000, Population: 500"));
    // hovering changes nothing
    assert_eq!(app.dashboard().revision(), 0);
}

#[test]
fn test_header_click_cycles_sort() {
    let mut app = App::new(Dataset::sample());
    let buf = render(&mut app, 100, 40);
    let text = buffer_text(&buf);
    let (row, line) = text
        .lines()
        .enumerate()
        .find(|(_, l)| l.contains("Name") && l.contains("Population"))
        .unwrap();
    let byte = line.find("Revenue").unwrap();
    let column = line[..byte].chars().count() as u16;

    drive(&mut app, click(column, row as u16));
    assert_eq!(app.focus(), bubbledash::Focus::Table);
    assert_eq!(table_ids(&app), vec![3, 4, 5, 1, 2]);

    render(&mut app, 100, 40);
    drive(&mut app, click(column, row as u16));
    assert_eq!(table_ids(&app), vec![2, 1, 5, 4, 3]);
}

#[test]
fn test_table_sort_keys() {
    let mut app = App::new(Dataset::sample());
    drive(&mut app, key(KeyCode::Tab));
    assert_eq!(app.focus(), bubbledash::Focus::Table);
    drive(&mut app, key(KeyCode::Char('3')));
    assert_eq!(table_ids(&app), vec![3, 4, 5, 1, 2]);
    drive(&mut app, key(KeyCode::Char('3')));
    drive(&mut app, key(KeyCode::Char('3')));
    assert_eq!(table_ids(&app), vec![1, 2, 3, 4, 5]);

    drive(&mut app, key(KeyCode::Down));
    drive(&mut app, key(KeyCode::Down));
    assert_eq!(app.table_state().selected_row().map(|r| r.id), Some(2));
}

#[test]
fn test_sort_survives_filter_changes() {
    let mut app = App::new(Dataset::sample());
    app.set_sort(bubbledash::SortState::descending(1));
    let changed = app.set_bound_text(BoundField::MinRevenue, "2500");
    drive(&mut app, changed);
    assert_eq!(table_ids(&app), vec![2, 1, 5, 4]);
    assert_eq!(
        app.table_state().sort_state(),
        bubbledash::SortState::descending(1)
    );
}

#[test]
fn test_inverted_range_renders_empty_state() {
    let mut app = App::new(Dataset::sample());
    let min = app.set_bound_text(BoundField::MinRevenue, "6000");
    drive(&mut app, min);
    let max = app.set_bound_text(BoundField::MaxRevenue, "1000");
    drive(&mut app, max);

    assert!(app.chart_state().is_empty());
    assert!(app.table_state().is_empty());
    let text = buffer_text(&render(&mut app, 100, 40));
    assert!(text.matches("No records in range").count() >= 2);
    assert!(text.contains("(min > max)"));
    assert!(text.contains("Population"));
}

#[test]
fn test_quit_keys() {
    let mut app = App::new(Dataset::sample());
    assert_eq!(drive(&mut app, key(KeyCode::Char('q'))), Some(AppEvent::Exit));
    drive(&mut app, key(KeyCode::BackTab));
    assert_eq!(drive(&mut app, ctrl('c')), Some(AppEvent::Exit));
}

#[test]
fn test_help_overlay_toggles() {
    let mut app = App::new(Dataset::sample());
    drive(&mut app, key(KeyCode::Char('?')));
    assert!(app.is_help_visible());
    let text = buffer_text(&render(&mut app, 100, 40));
    assert!(text.contains("Chart Help"));

    // keys go to the overlay while it is open
    drive(&mut app, key(KeyCode::Right));
    assert_eq!(app.chart_state().highlighted, None);

    drive(&mut app, key(KeyCode::Esc));
    assert!(!app.is_help_visible());
}

#[test]
fn test_two_record_scenario() {
    let mut app = App::new(two_items());
    let changed = app.set_bound_text(BoundField::MaxRevenue, "6000");
    drive(&mut app, changed);

    let names: Vec<String> = app
        .dashboard()
        .views()
        .view
        .iter()
        .map(|r| r.name.clone())
        .collect();
    assert_eq!(names, vec!["Item 1"]);
    assert_eq!(
        app.chart_state().point(0),
        Some(GeometryPoint {
            x: 5000.0,
            y: 300.0,
            r: 5.0,
            source_index: 0
        })
    );
    assert_eq!(app.chart_state().len(), 1);

    drive(&mut app, key(KeyCode::Tab));
    drive(&mut app, key(KeyCode::Char('2')));
    drive(&mut app, key(KeyCode::Char('2')));
    assert_eq!(
        app.table_state().sort_state(),
        bubbledash::SortState::descending(1)
    );
    assert_eq!(table_ids(&app), vec![1]);
}

#[test]
fn test_click_on_input_focuses_it() {
    let mut app = App::new(Dataset::sample());
    render(&mut app, 100, 40);
    drive(&mut app, click(3, 2));
    assert_eq!(app.focus(), bubbledash::Focus::MinInput);
    drive(&mut app, click(25, 2));
    assert_eq!(app.focus(), bubbledash::Focus::MaxInput);
}
