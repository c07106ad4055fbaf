//! Contracts for the two rendering capabilities the dashboard drives.
//!
//! The dashboard core only produces chart geometry and table projections and
//! consumes point selections; anything that draws them (the ratatui widgets
//! in [`crate::widgets`], or a test double) implements these traits.

use crate::geometry::{tooltip_label, ChartData, GeometryPoint};
use crate::table::{SortDirection, SortState, TableProjection};

/// A request to narrow the filter to point `index` of the geometry loaded at
/// `revision`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionEvent {
    pub index: usize,
    pub revision: u64,
}

/// Bubble chart: accepts geometry, resolves pointer interactions to point indices.
pub trait BubbleChartCapability {
    /// Toolkit-specific pointer position.
    type Pointer;

    fn load(&mut self, data: ChartData, revision: u64);

    /// Revision of the currently loaded geometry.
    fn revision(&self) -> u64;

    fn point(&self, index: usize) -> Option<GeometryPoint>;

    /// Index of the point nearest to `pointer`, if one is close enough to count as hit.
    fn element_at(&self, pointer: Self::Pointer) -> Option<usize>;

    fn select_at(&self, pointer: Self::Pointer) -> Option<SelectionEvent> {
        self.element_at(pointer).map(|index| SelectionEvent {
            index,
            revision: self.revision(),
        })
    }

    fn tooltip(&self, index: usize) -> Option<String> {
        self.point(index).map(|p| tooltip_label(p.x, p.y))
    }
}

/// Per-column sort marker shown in a table header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortIndicator {
    #[default]
    None,
    Ascending,
    Descending,
}

impl SortIndicator {
    pub fn symbol(&self) -> &'static str {
        match self {
            SortIndicator::None => "",
            SortIndicator::Ascending => " ▲",
            SortIndicator::Descending => " ▼",
        }
    }
}

impl From<Option<SortDirection>> for SortIndicator {
    fn from(direction: Option<SortDirection>) -> Self {
        match direction {
            None => SortIndicator::None,
            Some(SortDirection::Ascending) => SortIndicator::Ascending,
            Some(SortDirection::Descending) => SortIndicator::Descending,
        }
    }
}

/// Sortable table: owns the sort state and applies it to whatever rows it is given.
pub trait SortableTableCapability {
    fn load(&mut self, projection: TableProjection);

    fn sort_state(&self) -> SortState;

    fn set_sort(&mut self, sort: SortState);

    fn toggle_sort(&mut self, column: usize) {
        let next = self.sort_state().toggle(column);
        self.set_sort(next);
    }

    /// Indices into the loaded projection's rows, in display order.
    fn rendered_order(&self) -> Vec<usize>;

    fn sort_indicator(&self, column: usize) -> SortIndicator {
        self.sort_state().direction_of(column).into()
    }
}
