//! Charts module - chart computation and drawing

mod builder;
mod plotter;

pub use builder::{Chart, ChartKind, ChartSet};
pub use plotter::ChartPlotter;
