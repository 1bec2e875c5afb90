pub mod layout;
pub mod value_objects;

pub use layout::{ChartModel, LegendEntry, PlotArea, assign_ma_colors, build_chart_model};
pub use value_objects::{CANDLE_DOWN, CANDLE_UP, Color, MA_PALETTE};
