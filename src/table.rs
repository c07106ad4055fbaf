//! Table projection of a filtered view and the comparator semantics used to
//! sort it. Which column is sorted, and in which direction, is owned by the
//! table widget; this module only says how rows compare.

use std::cmp::Ordering;

use serde::Serialize;

use crate::filter::FilteredView;

/// Which record field a column reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Accessor {
    Name,
    Revenue,
    Population,
}

/// Comparator used when sorting by a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    /// Plain numeric comparison.
    Basic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDef {
    pub header: &'static str,
    pub accessor: Accessor,
    #[serde(rename = "sortType", skip_serializing_if = "Option::is_none")]
    pub sort_type: Option<SortType>,
}

/// The dashboard's fixed columns: Name, Revenue, Population.
pub fn columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef {
            header: "Name",
            accessor: Accessor::Name,
            sort_type: None,
        },
        ColumnDef {
            header: "Revenue",
            accessor: Accessor::Revenue,
            sort_type: Some(SortType::Basic),
        },
        ColumnDef {
            header: "Population",
            accessor: Accessor::Population,
            sort_type: Some(SortType::Basic),
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn display(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    /// Position of the record in the filtered view.
    pub index: usize,
    pub id: u64,
    pub cells: Vec<CellValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableProjection {
    pub columns: Vec<ColumnDef>,
    pub rows: Vec<TableRow>,
}

impl TableProjection {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One row per record of the view, cells in column order.
pub fn project(view: &FilteredView, columns: &[ColumnDef]) -> TableProjection {
    let rows = view
        .iter()
        .enumerate()
        .map(|(index, record)| TableRow {
            index,
            id: record.id,
            cells: columns
                .iter()
                .map(|c| match c.accessor {
                    Accessor::Name => CellValue::Text(record.name.clone()),
                    Accessor::Revenue => CellValue::Number(record.revenue),
                    Accessor::Population => CellValue::Number(record.population),
                })
                .collect(),
        })
        .collect();
    TableProjection {
        columns: columns.to_vec(),
        rows,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortBy {
    pub column: usize,
    pub direction: SortDirection,
}

/// Current table sort; `None` means dataset order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SortState(pub Option<SortBy>);

impl SortState {
    pub fn ascending(column: usize) -> Self {
        Self(Some(SortBy {
            column,
            direction: SortDirection::Ascending,
        }))
    }

    pub fn descending(column: usize) -> Self {
        Self(Some(SortBy {
            column,
            direction: SortDirection::Descending,
        }))
    }

    /// Header click: none -> ascending -> descending -> none. A different
    /// column always starts at ascending.
    pub fn toggle(self, column: usize) -> Self {
        match self.0 {
            Some(SortBy {
                column: c,
                direction: SortDirection::Ascending,
            }) if c == column => Self::descending(column),
            Some(SortBy {
                column: c,
                direction: SortDirection::Descending,
            }) if c == column => Self(None),
            _ => Self::ascending(column),
        }
    }

    pub fn direction_of(&self, column: usize) -> Option<SortDirection> {
        self.0.filter(|s| s.column == column).map(|s| s.direction)
    }
}

/// Numeric comparison that is a total order: `-0 == 0`, NaN sorts after
/// everything else.
fn compare_basic(a: f64, b: f64) -> Ordering {
    if a == b {
        Ordering::Equal
    } else {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => a.total_cmp(&b),
        }
    }
}

impl CellValue {
    fn as_number(&self) -> f64 {
        match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
        }
    }
}

/// Columns without a sort type compare lexicographically.
fn compare_cells(a: &CellValue, b: &CellValue, sort_type: Option<SortType>) -> Ordering {
    match sort_type {
        Some(SortType::Basic) => compare_basic(a.as_number(), b.as_number()),
        None => match (a, b) {
            (CellValue::Text(x), CellValue::Text(y)) => x.cmp(y),
            _ => a.display().cmp(&b.display()),
        },
    }
}

/// Row order (indices into `projection.rows`) for a sort state.
///
/// The sort is stable and a descending sort only flips the comparator, so
/// equal keys keep their filtered-view order in either direction.
pub fn sort_rows(projection: &TableProjection, sort: SortState) -> Vec<usize> {
    let mut order: Vec<usize> = (0..projection.rows.len()).collect();
    let Some(SortBy { column, direction }) = sort.0 else {
        return order;
    };
    let Some(def) = projection.columns.get(column) else {
        return order;
    };
    order.sort_by(|&a, &b| {
        let (Some(x), Some(y)) = (
            projection.rows[a].cells.get(column),
            projection.rows[b].cells.get(column),
        ) else {
            return Ordering::Equal;
        };
        let ord = compare_cells(x, y, def.sort_type);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    order
}
