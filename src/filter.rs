//! Revenue range filter: the filter state, the filter engine and the input
//! handler that turns raw bound text into a new state.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use serde::Serialize;

use crate::dataset::Record;
use crate::error::DashError;

/// Inclusive revenue range. `min <= max` is not enforced; an inverted range
/// simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterState {
    pub min: f64,
    pub max: f64,
}

impl FilterState {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range matching exactly one revenue value.
    pub fn exact(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn contains(&self, revenue: f64) -> bool {
        revenue >= self.min && revenue <= self.max
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.contains(record.revenue)
    }

    /// Copy of this state with one bound replaced.
    pub fn with_bound(self, field: BoundField, value: f64) -> Self {
        match field {
            BoundField::MinRevenue => Self { min: value, ..self },
            BoundField::MaxRevenue => Self { max: value, ..self },
        }
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: f64::INFINITY,
        }
    }
}

impl fmt::Display for FilterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", format_bound(self.min), format_bound(self.max))
    }
}

fn format_bound(v: f64) -> String {
    if v == f64::INFINITY {
        "∞".to_string()
    } else if v == f64::NEG_INFINITY {
        "-∞".to_string()
    } else {
        v.to_string()
    }
}

/// Records of a dataset that satisfy a [`FilterState`], in dataset order.
///
/// Never stored on its own; always the output of [`filter`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredView {
    records: Vec<Record>,
}

impl FilteredView {
    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

impl Deref for FilteredView {
    type Target = [Record];

    fn deref(&self) -> &[Record] {
        &self.records
    }
}

/// Keep the records whose revenue lies in `[state.min, state.max]`.
///
/// Order preserving and side-effect free. Accepts a `Dataset` or a previous
/// `FilteredView` (both deref to `[Record]`).
pub fn filter(records: &[Record], state: &FilterState) -> FilteredView {
    FilteredView {
        records: records
            .iter()
            .filter(|r| state.matches(r))
            .cloned()
            .collect(),
    }
}

/// The two editable bounds of the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundField {
    MinRevenue,
    MaxRevenue,
}

impl BoundField {
    pub fn name(&self) -> &'static str {
        match self {
            BoundField::MinRevenue => "minRevenue",
            BoundField::MaxRevenue => "maxRevenue",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            BoundField::MinRevenue => "Min Revenue",
            BoundField::MaxRevenue => "Max Revenue",
        }
    }
}

impl FromStr for BoundField {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minRevenue" => Ok(BoundField::MinRevenue),
            "maxRevenue" => Ok(BoundField::MaxRevenue),
            other => Err(DashError::UnknownField(other.to_string())),
        }
    }
}

/// Parse user text as a bound value.
///
/// Accepts decimal and scientific notation plus `Infinity`/`-Infinity`.
/// Empty text, anything else non-numeric, and NaN are rejected.
pub fn parse_bound(raw: &str) -> Result<f64, DashError> {
    let invalid = || DashError::InvalidNumericInput {
        raw: raw.to_string(),
    };
    let trimmed = raw.trim();
    let value = match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // plain numerals only; f64::from_str would also take inf/nan
        _ if trimmed.is_empty()
            || !trimmed
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')) =>
        {
            return Err(invalid());
        }
        _ => trimmed.parse::<f64>().map_err(|_| invalid())?,
    };
    if value.is_nan() {
        return Err(invalid());
    }
    // -0 collapses to 0
    Ok(if value == 0.0 { 0.0 } else { value })
}

/// Parse a bound, substituting 0 for anything that is not a number.
pub fn coerce_bound(raw: &str) -> f64 {
    match parse_bound(raw) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(error = %e, "bound input coerced to 0");
            0.0
        }
    }
}

/// Input handler: replace the named bound with the coerced value of `raw`,
/// carrying the other bound over unchanged.
pub fn on_bound_change(field: BoundField, raw: &str, current: FilterState) -> FilterState {
    current.with_bound(field, coerce_bound(raw))
}
