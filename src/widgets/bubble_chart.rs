//! Bubble chart widget: one braille-canvas bubble per geometry point, with
//! pointer hit-testing for selection and hover tooltips.

use std::f64::consts::TAU;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Position, Rect},
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{
        canvas::{Canvas, Painter, Shape},
        Block, Paragraph, StatefulWidget, Widget,
    },
};

use crate::capability::BubbleChartCapability;
use crate::config::Theme;
use crate::geometry::{ChartData, GeometryPoint};

/// Braille dots per terminal cell
const DOTS_X: f64 = 2.0;
const DOTS_Y: f64 = 4.0;

const EMPTY_MESSAGE: &str = "No records in range";

/// Where the last frame drew the plot, in cells, and the data window it showed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotLayout {
    pub area: Rect,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl PlotLayout {
    fn x_span(&self) -> f64 {
        self.x_bounds[1] - self.x_bounds[0]
    }

    fn y_span(&self) -> f64 {
        self.y_bounds[1] - self.y_bounds[0]
    }

    /// Data position to dot position, origin at the top-left of the plot.
    fn to_dots(&self, x: f64, y: f64) -> (f64, f64) {
        let dx = (x - self.x_bounds[0]) / self.x_span() * f64::from(self.area.width) * DOTS_X;
        let dy = (self.y_bounds[1] - y) / self.y_span() * f64::from(self.area.height) * DOTS_Y;
        (dx, dy)
    }

    /// Center of a cell in dot space.
    fn cell_center(&self, column: u16, row: u16) -> (f64, f64) {
        (
            f64::from(column - self.area.x) * DOTS_X + DOTS_X / 2.0,
            f64::from(row - self.area.y) * DOTS_Y + DOTS_Y / 2.0,
        )
    }
}

/// Bubble radius in dots; degenerate sizes collapse to a single dot.
fn radius_dots(r: f64) -> f64 {
    if r.is_finite() && r > 0.0 {
        r
    } else {
        0.0
    }
}

/// Axis window around `values` with 10% padding on both sides.
fn axis_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return [0.0, 1.0];
    }
    let span = hi - lo;
    let pad = if span > 0.0 {
        span * 0.1
    } else {
        lo.abs().max(1.0) * 0.1
    };
    [lo - pad, hi + pad]
}

fn format_axis_label(v: f64) -> String {
    if v.abs() >= 1e6 || (v.abs() < 1e-2 && v != 0.0) {
        format!("{:.2e}", v)
    } else {
        format!("{:.0}", v)
    }
}

fn is_drawable(p: &GeometryPoint) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

pub struct BubbleChartState {
    data: ChartData,
    revision: u64,
    /// Point under the pointer or the keyboard cursor; drives the tooltip.
    pub highlighted: Option<usize>,
    hit_tolerance: u16,
    layout: Option<PlotLayout>,
}

impl BubbleChartState {
    pub fn new(hit_tolerance: u16) -> Self {
        Self {
            data: ChartData::default(),
            revision: 0,
            highlighted: None,
            hit_tolerance,
            layout: None,
        }
    }

    pub fn data(&self) -> &ChartData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.points().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Plot placement from the last render, `None` before the first frame or
    /// while the chart is empty.
    pub fn layout(&self) -> Option<PlotLayout> {
        self.layout
    }

    /// Cell containing the center of point `index`, as of the last render.
    pub fn point_cell(&self, index: usize) -> Option<(u16, u16)> {
        let layout = self.layout?;
        let p = self.point(index).filter(is_drawable)?;
        let (dx, dy) = layout.to_dots(p.x, p.y);
        let column = (dx / DOTS_X).floor().clamp(0.0, f64::from(layout.area.width - 1));
        let row = (dy / DOTS_Y).floor().clamp(0.0, f64::from(layout.area.height - 1));
        Some((layout.area.x + column as u16, layout.area.y + row as u16))
    }

    /// Point indices left to right, ties in view order.
    fn order_by_x(&self) -> Vec<usize> {
        let points = self.data.points();
        let mut order: Vec<usize> = (0..points.len()).collect();
        order.sort_by(|&a, &b| points[a].x.total_cmp(&points[b].x));
        order
    }

    pub fn highlight_next(&mut self) {
        self.step_highlight(1);
    }

    pub fn highlight_prev(&mut self) {
        self.step_highlight(-1);
    }

    fn step_highlight(&mut self, step: isize) {
        let order = self.order_by_x();
        if order.is_empty() {
            self.highlighted = None;
            return;
        }
        let len = order.len() as isize;
        let next = match self.highlighted.and_then(|h| order.iter().position(|&i| i == h)) {
            Some(pos) => (pos as isize + step).rem_euclid(len),
            None if step > 0 => 0,
            None => len - 1,
        };
        self.highlighted = Some(order[next as usize]);
    }
}

impl BubbleChartCapability for BubbleChartState {
    /// Terminal cell `(column, row)`
    type Pointer = (u16, u16);

    fn load(&mut self, data: ChartData, revision: u64) {
        if revision != self.revision {
            self.highlighted = None;
        }
        self.data = data;
        self.revision = revision;
        if self.highlighted.is_some_and(|h| h >= self.len()) {
            self.highlighted = None;
        }
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn point(&self, index: usize) -> Option<GeometryPoint> {
        self.data.points().get(index).copied()
    }

    fn element_at(&self, (column, row): (u16, u16)) -> Option<usize> {
        let layout = self.layout?;
        if !layout.area.contains(Position::new(column, row)) {
            return None;
        }
        let (px, py) = layout.cell_center(column, row);
        let tolerance = f64::from(self.hit_tolerance) * DOTS_X;

        self.data
            .points()
            .iter()
            .enumerate()
            .filter(|(_, p)| is_drawable(p))
            .filter_map(|(i, p)| {
                let (dx, dy) = layout.to_dots(p.x, p.y);
                let distance = (px - dx).hypot(py - dy);
                (distance <= radius_dots(p.r) + tolerance).then_some((i, distance))
            })
            // first of equally close points wins
            .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((i, d)),
            })
            .map(|(i, _)| i)
    }
}

/// A single bubble: ellipse in data units that is circular in dot space.
struct Bubble {
    x: f64,
    y: f64,
    rx: f64,
    ry: f64,
    radius_dots: f64,
    filled: bool,
    color: Color,
}

impl Shape for Bubble {
    fn draw(&self, painter: &mut Painter) {
        let rings = if self.filled {
            self.radius_dots.ceil().max(1.0) as usize
        } else {
            1
        };
        for ring in 1..=rings {
            let frac = ring as f64 / rings as f64;
            let steps = ((self.radius_dots * frac * TAU).ceil() as usize).clamp(8, 720);
            for step in 0..steps {
                let t = step as f64 / steps as f64 * TAU;
                let x = self.x + self.rx * frac * t.cos();
                let y = self.y + self.ry * frac * t.sin();
                if let Some((px, py)) = painter.get_point(x, y) {
                    painter.paint(px, py, self.color);
                }
            }
        }
        if let Some((px, py)) = painter.get_point(self.x, self.y) {
            painter.paint(px, py, self.color);
        }
    }
}

pub struct BubbleChart<'a> {
    block: Option<Block<'a>>,
    theme: &'a Theme,
    show_tooltip: bool,
    show_axis_labels: bool,
}

impl<'a> BubbleChart<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            block: None,
            theme,
            show_tooltip: true,
            show_axis_labels: true,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn show_tooltip(mut self, show: bool) -> Self {
        self.show_tooltip = show;
        self
    }

    pub fn show_axis_labels(mut self, show: bool) -> Self {
        self.show_axis_labels = show;
        self
    }
}

impl StatefulWidget for BubbleChart<'_> {
    type State = BubbleChartState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };

        let points = state.data.points();
        if !points.iter().any(is_drawable) || inner.width < 4 || inner.height < 3 {
            state.layout = None;
            let middle = Rect::new(
                inner.x,
                inner.y + inner.height / 2,
                inner.width,
                inner.height.min(1),
            );
            Paragraph::new(EMPTY_MESSAGE)
                .style(Style::default().fg(self.theme.get("dimmed")))
                .alignment(Alignment::Center)
                .render(middle, buf);
            return;
        }

        let x_bounds = axis_bounds(points.iter().filter(|p| is_drawable(p)).map(|p| p.x));
        let y_bounds = axis_bounds(points.iter().filter(|p| is_drawable(p)).map(|p| p.y));

        let plot = if self.show_axis_labels {
            let y_labels = [format_axis_label(y_bounds[1]), format_axis_label(y_bounds[0])];
            let label_width = y_labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16 + 1;
            let label_style = Style::default().fg(self.theme.get("text_secondary"));
            let plot = Rect::new(
                inner.x + label_width,
                inner.y,
                inner.width.saturating_sub(label_width),
                inner.height.saturating_sub(1),
            );
            buf.set_stringn(inner.x, plot.y, &y_labels[0], label_width as usize, label_style);
            buf.set_stringn(inner.x, plot.bottom() - 1, &y_labels[1], label_width as usize, label_style);

            let x_row = Rect::new(plot.x, plot.bottom(), plot.width, 1);
            Paragraph::new(format_axis_label(x_bounds[0]))
                .style(label_style)
                .render(x_row, buf);
            Paragraph::new(format_axis_label((x_bounds[0] + x_bounds[1]) / 2.0))
                .style(label_style)
                .alignment(Alignment::Center)
                .render(x_row, buf);
            Paragraph::new(format_axis_label(x_bounds[1]))
                .style(label_style)
                .alignment(Alignment::Right)
                .render(x_row, buf);
            plot
        } else {
            inner
        };

        if plot.width == 0 || plot.height == 0 {
            state.layout = None;
            return;
        }

        let layout = PlotLayout {
            area: plot,
            x_bounds,
            y_bounds,
        };
        state.layout = Some(layout);

        let x_per_dot = layout.x_span() / (f64::from(plot.width) * DOTS_X);
        let y_per_dot = layout.y_span() / (f64::from(plot.height) * DOTS_Y);
        let base = self.theme.get("bubble");
        let hover = self.theme.get("bubble_hover");
        let highlighted = state.highlighted;

        Canvas::default()
            .marker(symbols::Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                for (i, p) in points.iter().enumerate().filter(|(_, p)| is_drawable(p)) {
                    let r = radius_dots(p.r);
                    let is_highlighted = highlighted == Some(i);
                    ctx.draw(&Bubble {
                        x: p.x,
                        y: p.y,
                        rx: r * x_per_dot,
                        ry: r * y_per_dot,
                        radius_dots: r,
                        filled: is_highlighted,
                        color: if is_highlighted { hover } else { base },
                    });
                }
            })
            .render(plot, buf);

        if self.show_tooltip {
            if let Some(label) = highlighted.and_then(|i| state.tooltip(i)) {
                let text = format!(" {} ", label);
                let width = (text.chars().count() as u16).min(plot.width);
                let tooltip = Rect::new(plot.right() - width, plot.y, width, 1);
                Span::styled(
                    text,
                    Style::default()
                        .fg(self.theme.get("text_primary"))
                        .bg(self.theme.get("controls_bg")),
                )
                .render(tooltip, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::filter::{filter, FilterState};
    use crate::geometry::chart_data;

    fn loaded(revision: u64) -> BubbleChartState {
        let mut state = BubbleChartState::new(1);
        let view = filter(&Dataset::sample(), &FilterState::default());
        state.load(chart_data(&view), revision);
        state
    }

    fn render(state: &mut BubbleChartState, area: Rect) -> Buffer {
        let theme = Theme::default();
        let mut buf = Buffer::empty(area);
        BubbleChart::new(&theme).render(area, &mut buf, state);
        buf
    }

    fn buffer_text(buf: &Buffer) -> String {
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

    #[test]
    fn test_axis_bounds_padding() {
        assert_eq!(axis_bounds([0.0, 10.0].into_iter()), [-1.0, 11.0]);
        assert_eq!(axis_bounds([5.0].into_iter()), [4.5, 5.5]);
        assert_eq!(axis_bounds(std::iter::empty()), [0.0, 1.0]);
        assert_eq!(axis_bounds([f64::NAN, 2.0, 4.0].into_iter()), [1.8, 4.2]);
    }

    #[test]
    fn test_no_hits_before_first_render() {
        let state = loaded(0);
        assert_eq!(state.element_at((10, 10)), None);
    }

    #[test]
    fn test_click_on_point_hits_it() {
        let mut state = loaded(3);
        render(&mut state, Rect::new(0, 0, 80, 24));
        for i in 0..state.len() {
            let cell = state.point_cell(i).unwrap();
            assert_eq!(state.element_at(cell), Some(i), "point {i}");
            assert_eq!(
                state.select_at(cell),
                Some(crate::capability::SelectionEvent { index: i, revision: 3 })
            );
        }
    }

    #[test]
    fn test_zero_tolerance_only_hits_inside_bubble() {
        let view = filter(&Dataset::sample(), &FilterState::exact(5000.0));
        let area = Rect::new(0, 0, 80, 24);
        let mut strict = BubbleChartState::new(0);
        strict.load(chart_data(&view), 0);
        render(&mut strict, area);
        let mut loose = BubbleChartState::new(1);
        loose.load(chart_data(&view), 0);
        render(&mut loose, area);

        let center = strict.point_cell(0).unwrap();
        assert_eq!(strict.element_at(center), Some(0));

        let layout = strict.layout().unwrap();
        let p = strict.point(0).unwrap();
        let (dx, dy) = layout.to_dots(p.x, p.y);
        let ring: Vec<(u16, u16)> = (layout.area.top()..layout.area.bottom())
            .flat_map(|row| (layout.area.left()..layout.area.right()).map(move |col| (col, row)))
            .filter(|&(col, row)| {
                let (px, py) = layout.cell_center(col, row);
                (px - dx).hypot(py - dy) > radius_dots(p.r)
            })
            .filter(|&cell| loose.element_at(cell).is_some())
            .collect();
        assert!(!ring.is_empty());
        for cell in ring {
            assert_eq!(strict.element_at(cell), None, "{cell:?}");
        }
    }

    #[test]
    fn test_click_on_empty_space_misses() {
        let mut state = loaded(0);
        render(&mut state, Rect::new(0, 0, 80, 24));
        let layout = state.layout().unwrap();
        // Item 2 is the rightmost bubble and sits high; bottom-right corner is empty
        let corner = (layout.area.right() - 1, layout.area.bottom() - 1);
        assert_eq!(state.element_at(corner), None);
        // outside the plot entirely
        assert_eq!(state.element_at((0, 23)), None);
    }

    #[test]
    fn test_new_revision_clears_highlight() {
        let mut state = loaded(0);
        state.highlight_next();
        assert_eq!(state.highlighted, Some(2)); // lowest revenue first
        let data = state.data().clone();
        state.load(data.clone(), 0);
        assert_eq!(state.highlighted, Some(2));
        state.load(data, 1);
        assert_eq!(state.highlighted, None);
    }

    #[test]
    fn test_highlight_walks_left_to_right() {
        let mut state = loaded(0);
        let mut seen = vec![];
        for _ in 0..5 {
            state.highlight_next();
            seen.push(state.highlighted.unwrap());
        }
        assert_eq!(seen, vec![2, 3, 4, 0, 1]);
        state.highlight_next();
        assert_eq!(state.highlighted, Some(2));
        state.highlight_prev();
        assert_eq!(state.highlighted, Some(1));
    }

    #[test]
    fn test_tooltip_rendered_for_highlight() {
        let mut state = loaded(0);
        state.highlighted = Some(0);
        let buf = render(&mut state, Rect::new(0, 0, 80, 24));
        assert!(buffer_text(&buf).contains("Revenue: 5000, Population: 300"));
    }

    #[test]
    fn test_empty_state() {
        let mut state = BubbleChartState::new(1);
        state.load(ChartData::default(), 1);
        let buf = render(&mut state, Rect::new(0, 0, 40, 10));
        assert!(buffer_text(&buf).contains(EMPTY_MESSAGE));
        assert!(state.layout().is_none());
        assert_eq!(state.element_at((20, 5)), None);
    }

    #[test]
    fn test_degenerate_radius_still_drawn() {
        let mut state = BubbleChartState::new(1);
        let view = filter(
            &[crate::dataset::Record::new(1, "zero", 0.0, 10.0)],
            &FilterState::default(),
        );
        state.load(chart_data(&view), 0);
        render(&mut state, Rect::new(0, 0, 40, 10));
        let cell = state.point_cell(0).unwrap();
        assert_eq!(state.element_at(cell), Some(0));
    }
}
