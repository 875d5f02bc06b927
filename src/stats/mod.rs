//! Stats module - descriptive statistics and density estimates

mod calculator;

pub use calculator::{BoxSummary, GaussianKde, HistogramBin, StatsCalculator, ValueCount};
