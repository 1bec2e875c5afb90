pub mod entities;
pub mod value_objects;

pub use entities::{KlineBar, KlineSeries, MaPoint, StockSummary};
pub use value_objects::{BarInterval, Market, StockCode};
