//! Charts module - Chart rendering

mod pie;
mod plotter;
mod renderer;

pub use plotter::ChartPlotter;
pub use renderer::{StaticChartRenderer, EXPORT_SIZE};
