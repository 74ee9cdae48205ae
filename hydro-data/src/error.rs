use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpolationError {
    #[error("interpolation needs at least {required} points, got {found}")]
    TooFewPoints { required: usize, found: usize },

    #[error("x must be strictly increasing")]
    NonIncreasing,

    #[error("x and y must have the same length")]
    LengthMismatch,

    #[error("control points must be finite")]
    NonFinite,

    #[error("spline system is singular")]
    SingularSystem,
}

#[derive(Debug, Error)]
pub enum DisaggregationError {
    #[error("daily series is empty")]
    EmptySeries,

    #[error("daily values out of order: {next} does not follow {previous}")]
    UnorderedDates { previous: NaiveDate, next: NaiveDate },

    #[error(transparent)]
    Interpolation(#[from] InterpolationError),
}
