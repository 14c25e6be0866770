//! Client-side aggregation over fetched collections.
//!
//! Everything here is synchronous and side-effect free apart from logging.
//! Views recompute these from scratch whenever their inputs change.

pub mod directory;
pub mod rollup;
pub mod weekly;

pub use directory::{build_directory, person_key, PersonSummary};
pub use rollup::{daily_rollup, top_n_by_frequency, weekly_rollup, DailyRollup, DayBar, Ranked, WeeklyRollup};
pub use weekly::{group_by_week, week_label, WeekBucket, WeekLabel, WeeklyGrouping};
