use thiserror::Error;

/// Domain errors raised by the filter/selection core.
///
/// None of these are fatal: the dashboard recovers from each one locally
/// (coerce to 0, ignore the event) and keeps rendering a consistent state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashError {
    #[error("'{raw}' is not a number")]
    InvalidNumericInput { raw: String },

    #[error("point {index} is outside the filtered view ({len} records)")]
    OutOfRangeSelection { index: usize, len: usize },

    #[error("selection was made against view revision {event}, current revision is {current}")]
    StaleSelection { event: u64, current: u64 },

    #[error("duplicate record id {0}")]
    DuplicateRecordId(u64),

    #[error("unknown filter field '{0}', expected minRevenue or maxRevenue")]
    UnknownField(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = DashError::OutOfRangeSelection { index: 3, len: 2 };
        assert_eq!(
            e.to_string(),
            "point 3 is outside the filtered view (2 records)"
        );
        let e = DashError::InvalidNumericInput { raw: "abc".into() };
        assert_eq!(e.to_string(), "'abc' is not a number");
    }
}
