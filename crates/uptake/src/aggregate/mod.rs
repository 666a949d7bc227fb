//! Rate aggregation, cross-tabulation and categorical ordering.

mod crosstab;
mod order;
mod rates;

pub use crosstab::{crosstab, CrossTab, CrossTabCell};
pub use order::{CategoryOrder, AGE_ORDER, TIME_OF_DAY_ORDER, VISIT_FREQUENCY_ORDER};
pub use rates::{
    aggregate, AggregationResult, RateRow, ACCEPTANCE_RATE, ACCEPTED, DECLINED, TOTAL,
};

pub(crate) use rates::{read_target, round_rate};
