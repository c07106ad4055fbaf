//! Maps a filtered view to chart-ready bubble geometry.

use serde::Serialize;

use crate::filter::FilteredView;

/// Revenue units per unit of bubble radius.
pub const RADIUS_SCALE: f64 = 1000.0;

/// Label of the single chart series.
pub const SERIES_LABEL: &str = "Revenue vs Population";

/// Bubble radius for a revenue value. Not clamped: zero and negative values
/// pass through and are the renderer's problem.
pub fn derived_size(revenue: f64) -> f64 {
    revenue / RADIUS_SCALE
}

/// One bubble. `source_index` is the position of the record in the filtered
/// view this point was built from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeometryPoint {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    #[serde(skip)]
    pub source_index: usize,
}

/// Chart input shape: `{ "datasets": [{ "label": ..., "data": [{x, y, r}, ...] }] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    pub datasets: Vec<ChartSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub label: String,
    pub data: Vec<GeometryPoint>,
}

impl ChartData {
    /// Points of the (single) series, or an empty slice.
    pub fn points(&self) -> &[GeometryPoint] {
        self.datasets
            .first()
            .map(|s| s.data.as_slice())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.points().is_empty()
    }
}

/// One point per record, same order as the view: point `k` is record `k`.
pub fn to_geometry(view: &FilteredView) -> Vec<GeometryPoint> {
    view.iter()
        .enumerate()
        .map(|(source_index, record)| GeometryPoint {
            x: record.revenue,
            y: record.population,
            r: derived_size(record.revenue),
            source_index,
        })
        .collect()
}

/// Wrap [`to_geometry`] in the chart's single-series input shape.
pub fn chart_data(view: &FilteredView) -> ChartData {
    ChartData {
        datasets: vec![ChartSeries {
            label: SERIES_LABEL.to_string(),
            data: to_geometry(view),
        }],
    }
}

/// Tooltip text for a hovered point.
pub fn tooltip_label(x: f64, y: f64) -> String {
    format!("Revenue: {}, Population: {}", x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, Record};
    use crate::filter::{filter, FilterState};

    #[test]
    fn test_geometry_follows_view_order() {
        let ds = Dataset::sample();
        let view = filter(&ds, &FilterState::new(2000.0, 3500.0));
        let points = to_geometry(&view);
        assert_eq!(points.len(), 3);
        for (k, (point, record)) in points.iter().zip(view.iter()).enumerate() {
            assert_eq!(point.source_index, k);
            assert_eq!((point.x, point.y), (record.revenue, record.population));
        }
        assert_eq!(points[0].r, 2.0);
        assert_eq!(points[1].r, 2.5);
    }

    #[test]
    fn test_radius_not_clamped() {
        let records = vec![
            Record::new(1, "zero", 0.0, 1.0),
            Record::new(2, "neg", -500.0, 1.0),
        ];
        let view = filter(&records, &FilterState::new(f64::NEG_INFINITY, f64::INFINITY));
        let points = to_geometry(&view);
        assert_eq!(points[0].r, 0.0);
        assert_eq!(points[1].r, -0.5);
    }

    #[test]
    fn test_empty_view_gives_empty_series() {
        let data = chart_data(&FilteredView::default());
        assert_eq!(data.datasets.len(), 1);
        assert!(data.is_empty());
        assert!(ChartData::default().points().is_empty());
    }

    #[test]
    fn test_chart_data_wire_shape() {
        let ds = Dataset::sample();
        let view = filter(&ds, &FilterState::new(0.0, 2000.0));
        let json = serde_json::to_value(chart_data(&view)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "datasets": [{
                    "label": "Revenue vs Population",
                    "data": [{ "x": 2000.0, "y": 150.0, "r": 2.0 }]
                }]
            })
        );
    }

    #[test]
    fn test_tooltip_label() {
        assert_eq!(tooltip_label(5000.0, 300.0), "Revenue: 5000, Population: 300");
        assert_eq!(tooltip_label(2.5, 0.0), "Revenue: 2.5, Population: 0");
    }
}
