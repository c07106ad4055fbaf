//! The dashboard store: owns the dataset and the single filter state, applies
//! actions through a pure reducer, and re-derives both views from one
//! filtered list after every change.

use serde::Serialize;

use crate::capability::SelectionEvent;
use crate::dataset::Dataset;
use crate::error::DashError;
use crate::filter::{filter, on_bound_change, BoundField, FilterState, FilteredView};
use crate::geometry::{chart_data, ChartData};
use crate::selection::on_point_selected;
use crate::table::{columns, project, sort_rows, SortState, TableProjection, TableRow};

/// The only ways filter state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A bound input changed; `raw` is the full text of the input.
    BoundChanged { field: BoundField, raw: String },
    /// A chart point was selected.
    PointSelected(SelectionEvent),
    /// Back to the unbounded default range.
    Reset,
}

impl Action {
    pub fn describe(&self) -> String {
        match self {
            Action::BoundChanged { field, raw } => format!("{}={:?}", field.name(), raw),
            Action::PointSelected(ev) => format!("select {}@{}", ev.index, ev.revision),
            Action::Reset => "reset".to_string(),
        }
    }
}

/// Pure reducer: the next filter state for `action`, given the current state
/// and the view the action was produced against.
pub fn reduce(
    state: &FilterState,
    view: &FilteredView,
    action: &Action,
) -> Result<FilterState, DashError> {
    match action {
        Action::BoundChanged { field, raw } => Ok(on_bound_change(*field, raw, *state)),
        Action::PointSelected(ev) => on_point_selected(view, ev.index),
        Action::Reset => Ok(FilterState::default()),
    }
}

/// Everything rendered for one filter state. Chart and table are always
/// built from the same `view`.
#[derive(Debug, Clone)]
pub struct DerivedViews {
    pub revision: u64,
    pub filter: FilterState,
    pub view: FilteredView,
    pub chart: ChartData,
    pub table: TableProjection,
}

/// Run the filter engine once and feed its output to both projections.
pub fn derive(dataset: &Dataset, state: FilterState, revision: u64) -> DerivedViews {
    let view = filter(dataset, &state);
    let chart = chart_data(&view);
    let table = project(&view, &columns());
    DerivedViews {
        revision,
        filter: state,
        view,
        chart,
        table,
    }
}

pub struct Dashboard {
    dataset: Dataset,
    filter: FilterState,
    derived: DerivedViews,
}

impl Dashboard {
    pub fn new(dataset: Dataset) -> Self {
        Self::with_filter(dataset, FilterState::default())
    }

    pub fn with_filter(dataset: Dataset, filter: FilterState) -> Self {
        let derived = derive(&dataset, filter, 0);
        Self {
            dataset,
            filter,
            derived,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn filter(&self) -> FilterState {
        self.filter
    }

    pub fn views(&self) -> &DerivedViews {
        &self.derived
    }

    pub fn revision(&self) -> u64 {
        self.derived.revision
    }

    /// Apply an action. On error nothing changes.
    ///
    /// Returns whether the filter state changed (and the views were re-derived).
    pub fn dispatch(&mut self, action: &Action) -> Result<bool, DashError> {
        if let Action::PointSelected(ev) = action {
            if ev.revision != self.derived.revision {
                return Err(DashError::StaleSelection {
                    event: ev.revision,
                    current: self.derived.revision,
                });
            }
        }
        let next = reduce(&self.filter, &self.derived.view, action)?;
        if next == self.filter {
            tracing::trace!(action = %action.describe(), "filter unchanged");
            return Ok(false);
        }
        self.replace_filter(next);
        Ok(true)
    }

    fn replace_filter(&mut self, next: FilterState) {
        self.filter = next;
        self.derived = derive(&self.dataset, next, self.derived.revision + 1);
        tracing::debug!(
            min = next.min,
            max = next.max,
            rows = self.derived.view.len(),
            revision = self.derived.revision,
            "filter replaced"
        );
    }

    /// Serializable picture of the current views, with the table in `sort` order.
    pub fn snapshot(&self, sort: SortState) -> Snapshot<'_> {
        let order = sort_rows(&self.derived.table, sort);
        Snapshot {
            filter: self.filter,
            chart: &self.derived.chart,
            table: TableSnapshot {
                columns: &self.derived.table.columns,
                sort,
                rows: order.iter().map(|&i| &self.derived.table.rows[i]).collect(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub filter: FilterState,
    pub chart: &'a ChartData,
    pub table: TableSnapshot<'a>,
}

#[derive(Debug, Serialize)]
pub struct TableSnapshot<'a> {
    pub columns: &'a [crate::table::ColumnDef],
    pub sort: SortState,
    pub rows: Vec<&'a TableRow>,
}
