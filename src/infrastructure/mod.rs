pub mod http;
pub mod rendering;
pub mod services;

pub use http::{ScreenerApi, ScreenerHttpClient};
pub use rendering::{CanvasChart, ChartAdapter};
