pub mod canvas_chart;

pub use canvas_chart::CanvasChart;

use crate::domain::market_data::KlineSeries;

/// Seam between the controller wiring and the concrete chart backend; one
/// implementation per widget technology.
pub trait ChartAdapter {
    /// Create exactly one widget instance inside the container; a prior
    /// instance is torn down first.
    fn bind(&mut self, container_id: &str) -> Result<(), String>;

    /// Replace all displayed series from the caller's point of view; an
    /// empty series leaves the previous frame visible.
    fn render(&mut self, series: &KlineSeries);

    /// Empty all series but keep the widget instance alive.
    fn clear(&mut self);

    /// Adopt the container's current dimensions.
    fn resize(&mut self);
}
