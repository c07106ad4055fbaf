use crate::error::DashError;
use crate::filter::{FilterState, FilteredView};

/// Narrow the filter to the exact revenue of the selected point.
///
/// `point_index` is a position in `view` (the chart's point index). An
/// out-of-range index yields `OutOfRangeSelection`; no state is produced, so
/// the caller's current state stays as it was.
pub fn on_point_selected(view: &FilteredView, point_index: usize) -> Result<FilterState, DashError> {
    let record = view
        .get(point_index)
        .ok_or(DashError::OutOfRangeSelection {
            index: point_index,
            len: view.len(),
        })?;
    Ok(FilterState::exact(record.revenue))
}
