use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget},
};

use crate::capability::SortableTableCapability;
use crate::config::Theme;
use crate::table::{sort_rows, SortState, TableProjection, TableRow};

const EMPTY_MESSAGE: &str = "No records in range";

/// Header cell span from the last render, for mouse hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeaderRegion {
    area: Rect,
    column: usize,
}

#[derive(Default)]
pub struct DataTableState {
    projection: TableProjection,
    sort: SortState,
    order: Vec<usize>,
    pub table_state: TableState,
    header: Vec<HeaderRegion>,
}

impl DataTableState {
    pub fn new(sort: SortState) -> Self {
        Self {
            sort,
            ..Self::default()
        }
    }

    pub fn projection(&self) -> &TableProjection {
        &self.projection
    }

    pub fn len(&self) -> usize {
        self.projection.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projection.is_empty()
    }

    /// Rows as displayed: loaded projection in the current sort order.
    pub fn rows_in_order(&self) -> impl Iterator<Item = &TableRow> {
        self.order.iter().map(|&i| &self.projection.rows[i])
    }

    pub fn selected_row(&self) -> Option<&TableRow> {
        self.table_state
            .selected()
            .and_then(|i| self.order.get(i))
            .map(|&i| &self.projection.rows[i])
    }

    pub fn select_next(&mut self) {
        if self.is_empty() {
            return;
        }
        let next = match self.table_state.selected() {
            Some(i) => (i + 1).min(self.len() - 1),
            None => 0,
        };
        self.table_state.select(Some(next));
    }

    pub fn select_previous(&mut self) {
        if self.is_empty() {
            return;
        }
        let prev = match self.table_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.table_state.select(Some(prev));
    }

    /// Column whose header contains the cell `(column, row)`, as of the last render.
    pub fn column_at(&self, (column, row): (u16, u16)) -> Option<usize> {
        self.header
            .iter()
            .find(|h| h.area.contains(Position::new(column, row)))
            .map(|h| h.column)
    }

    fn reorder(&mut self) {
        self.order = sort_rows(&self.projection, self.sort);
    }
}

impl SortableTableCapability for DataTableState {
    fn load(&mut self, projection: TableProjection) {
        self.projection = projection;
        self.reorder();
        match self.table_state.selected() {
            _ if self.is_empty() => self.table_state.select(None),
            Some(i) if i >= self.len() => self.table_state.select(Some(self.len() - 1)),
            _ => {}
        }
    }

    fn sort_state(&self) -> SortState {
        self.sort
    }

    fn set_sort(&mut self, sort: SortState) {
        if sort != self.sort {
            tracing::debug!(?sort, "table sort changed");
        }
        self.sort = sort;
        self.reorder();
    }

    fn rendered_order(&self) -> Vec<usize> {
        self.order.clone()
    }
}

pub struct DataTable<'a> {
    pub header_bg: Color,
    pub header_fg: Color,
    pub dimmed_fg: Color,
    pub table_cell_padding: u16,
    pub alternate_row_bg: Option<Color>,
    pub focused: bool,
    block: Option<Block<'a>>,
}

impl<'a> DataTable<'a> {
    pub fn new(theme: &Theme) -> Self {
        Self {
            header_bg: theme.get("table_header_bg"),
            header_fg: theme.get("table_header"),
            dimmed_fg: theme.get("dimmed"),
            table_cell_padding: 1,
            alternate_row_bg: None,
            focused: false,
            block: None,
        }
    }

    pub fn with_cell_padding(mut self, padding: u16) -> Self {
        self.table_cell_padding = padding;
        self
    }

    pub fn with_alternate_row_bg(mut self, color: Option<Color>) -> Self {
        self.alternate_row_bg = color;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl StatefulWidget for DataTable<'_> {
    type State = DataTableState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };

        let headers: Vec<String> = state
            .projection
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{}{}", c.header, state.sort_indicator(i).symbol()))
            .collect();

        // make each column as wide as its widest cell or header
        let mut widths: Vec<u16> = headers.iter().map(|h| h.chars().count() as u16).collect();
        let rows: Vec<Row> = state
            .rows_in_order()
            .enumerate()
            .map(|(row_idx, row)| {
                let cells: Vec<Cell> = row
                    .cells
                    .iter()
                    .enumerate()
                    .map(|(col_idx, value)| {
                        let text = value.display();
                        if let Some(w) = widths.get_mut(col_idx) {
                            *w = (*w).max(text.chars().count() as u16);
                        }
                        Cell::from(Line::from(text))
                    })
                    .collect();
                let row_style = self
                    .alternate_row_bg
                    .filter(|_| row_idx % 2 == 1)
                    .map(|c| Style::default().bg(c))
                    .unwrap_or_default();
                Row::new(cells).style(row_style)
            })
            .collect();

        // same split the table uses, so shrunk columns stay clickable
        state.header.clear();
        if inner.height > 0 {
            let header_line = Rect { height: 1, ..inner };
            let cells = Layout::horizontal(widths.iter().map(|&w| Constraint::Length(w)))
                .flex(Flex::Start)
                .spacing(self.table_cell_padding)
                .split(header_line);
            state.header.extend(
                cells
                    .iter()
                    .enumerate()
                    .filter(|(_, area)| area.width > 0)
                    .map(|(column, &area)| HeaderRegion { area, column }),
            );
        }

        let header_row_style = if self.header_bg == Color::Reset {
            Style::default().fg(self.header_fg)
        } else {
            Style::default().bg(self.header_bg).fg(self.header_fg)
        };
        let header: Vec<Span> = headers
            .into_iter()
            .map(|h| Span::styled(h, Style::default().add_modifier(Modifier::BOLD)))
            .collect();

        let highlight = if self.focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };

        let is_empty = rows.is_empty();
        StatefulWidget::render(
            Table::new(rows, widths)
                .column_spacing(self.table_cell_padding)
                .flex(Flex::Start)
                .header(Row::new(header).style(header_row_style))
                .row_highlight_style(highlight),
            inner,
            buf,
            &mut state.table_state,
        );

        if is_empty && inner.height > 1 {
            Paragraph::new(EMPTY_MESSAGE)
                .style(Style::default().fg(self.dimmed_fg))
                .render(Rect::new(inner.x, inner.y + 1, inner.width, 1), buf);
        }
    }
}
