use super::value_objects::{CANDLE_DOWN, CANDLE_UP, Color, MA_PALETTE};
use crate::domain::market_data::KlineSeries;
use serde::Serialize;
use std::collections::HashMap;

/// Pixel area the chart draws into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Vertical price scale over the padded series extent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceScale {
    min: f64,
    max: f64,
    height: f64,
}

impl PriceScale {
    /// 5% head/foot room so extremes do not touch the frame
    pub fn fit(min: f64, max: f64, height: f64) -> Self {
        let padding = (max - min).abs() * 0.05;
        Self { min: min - padding, max: max + padding, height }
    }

    pub fn y(&self, price: f64) -> f64 {
        let range = self.max - self.min;
        if range == 0.0 {
            return self.height / 2.0;
        }
        let normalized = (price - self.min) / range;
        self.height * (1.0 - normalized)
    }
}

/// Precomputed geometry for one candlestick
#[derive(Debug, Clone, PartialEq)]
pub struct CandleGeom {
    pub x: f64,
    pub body_width: f64,
    pub open_y: f64,
    pub close_y: f64,
    pub high_y: f64,
    pub low_y: f64,
    pub color: Color,
}

/// One MA overlay ready to stroke: points already filtered to present values
#[derive(Debug, Clone, PartialEq)]
pub struct MaPolyline {
    pub label: String,
    pub color: Color,
    pub points: Vec<(f64, f64)>,
}

/// Legend model: one entry per drawn MA line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

/// Everything the canvas needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub candles: Vec<CandleGeom>,
    pub ma_polylines: Vec<MaPolyline>,
    pub legend: Vec<LegendEntry>,
}

/// Numeric period encoded in an MA label ("ma20" -> 20); labels that do not
/// follow the convention sort first.
pub fn ma_label_period(label: &str) -> u32 {
    label.strip_prefix("ma").and_then(|digits| digits.parse().ok()).unwrap_or(0)
}

/// Deterministic color assignment: sort labels by encoded period, hand out
/// palette colors by rank, wrap past the palette end.
pub fn assign_ma_colors(labels: &[&str]) -> Vec<(String, Color)> {
    let mut sorted: Vec<&str> = labels.to_vec();
    sorted.sort_by_key(|label| ma_label_period(label));

    sorted
        .into_iter()
        .enumerate()
        .map(|(rank, label)| (label.to_string(), MA_PALETTE[rank % MA_PALETTE.len()]))
        .collect()
}

/// Build the full frame model from a series. Empty series yields an empty
/// model; the adapter treats that as a no-op render.
pub fn build_chart_model(series: &KlineSeries, area: PlotArea) -> ChartModel {
    let Some((min, max)) = series.price_range() else {
        return ChartModel { candles: Vec::new(), ma_polylines: Vec::new(), legend: Vec::new() };
    };

    let scale = PriceScale::fit(min, max, area.height);
    let slot = area.width / series.bars.len() as f64;
    let body_width = (slot * 0.7).max(1.0);

    let candles = series
        .bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let x = slot * i as f64 + slot / 2.0;
            CandleGeom {
                x,
                body_width,
                open_y: scale.y(bar.open),
                close_y: scale.y(bar.close),
                high_y: scale.y(bar.high),
                low_y: scale.y(bar.low),
                color: if bar.close >= bar.open { CANDLE_UP } else { CANDLE_DOWN },
            }
        })
        .collect();

    // Bar time -> x slot; MA points at unknown times are dropped
    let time_to_x: HashMap<&str, f64> = series
        .bars
        .iter()
        .enumerate()
        .map(|(i, bar)| (bar.time.as_str(), slot * i as f64 + slot / 2.0))
        .collect();

    let colors = assign_ma_colors(&series.drawable_labels());

    let mut ma_polylines = Vec::with_capacity(colors.len());
    let mut legend = Vec::with_capacity(colors.len());
    for (label, color) in colors {
        let Some(ma_points) = series.ma_lines.get(&label) else { continue };

        // Absent values are skipped, never zero-filled or interpolated
        let points: Vec<(f64, f64)> = ma_points
            .iter()
            .filter_map(|point| {
                let value = point.value?;
                let x = *time_to_x.get(point.time.as_str())?;
                Some((x, scale.y(value)))
            })
            .collect();

        if points.is_empty() {
            continue;
        }

        legend.push(LegendEntry { label: label.clone(), color: color.to_css() });
        ma_polylines.push(MaPolyline { label, color, points });
    }

    ChartModel { candles, ma_polylines, legend }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_period_parsing() {
        assert_eq!(ma_label_period("ma5"), 5);
        assert_eq!(ma_label_period("ma240"), 240);
        assert_eq!(ma_label_period("vwap"), 0);
    }

    #[test]
    fn colors_follow_period_rank_not_input_order() {
        let colors = assign_ma_colors(&["ma60", "ma5", "ma20"]);
        assert_eq!(colors[0], ("ma5".to_string(), MA_PALETTE[0]));
        assert_eq!(colors[1], ("ma20".to_string(), MA_PALETTE[1]));
        assert_eq!(colors[2], ("ma60".to_string(), MA_PALETTE[2]));
    }

    #[test]
    fn palette_wraps_after_eight_lines() {
        let labels: Vec<String> = (1..=9).map(|i| format!("ma{}", i * 10)).collect();
        let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        let colors = assign_ma_colors(&refs);
        assert_eq!(colors[8].1, MA_PALETTE[0]);
    }

    #[test]
    fn price_scale_inverts_y() {
        let scale = PriceScale::fit(0.0, 100.0, 100.0);
        assert!(scale.y(100.0) < scale.y(0.0));
    }
}
