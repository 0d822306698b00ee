use derive_more::Display;

///
/// AggregateFunction
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum AggregateFunction {
    #[display("COUNT")]
    Count,
    #[display("SUM")]
    Sum,
    #[display("AVG")]
    Avg,
    #[display("MIN")]
    Min,
    #[display("MAX")]
    Max,
}

///
/// Aggregate
///
/// One SQL-shaped aggregate request. `field` is `"*"` for `COUNT(*)`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Aggregate {
    pub function: AggregateFunction,
    pub field: String,
}

impl Aggregate {
    #[must_use]
    pub fn new(function: AggregateFunction, field: impl Into<String>) -> Self {
        Self {
            function,
            field: field.into(),
        }
    }

    #[must_use]
    pub fn count(field: impl Into<String>) -> Self {
        Self::new(AggregateFunction::Count, field)
    }
}
