//! Row filters and segment comparison.

mod compare;
mod filter;

pub use compare::{compare, ComparisonResult, Segment, SegmentStats, RATE_DIFFERENCE, SEGMENT};
pub use filter::{Condition, Filter};
