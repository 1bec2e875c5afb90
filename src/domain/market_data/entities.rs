pub use super::value_objects::{BarInterval, Market, StockCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Domain entity - one row of a list/screen response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSummary {
    pub code: StockCode,
    pub name: String,
    pub market: Market,
    /// Absent when the backend has no quote for the code yet
    #[serde(default)]
    pub close: Option<f64>,
    /// Populated by the screen endpoint, absent on the plain list endpoint
    #[serde(default)]
    pub convergence_pct: Option<f64>,
}

impl StockSummary {
    pub fn close_display(&self) -> String {
        match self.close {
            Some(v) => format!("{v}"),
            None => "-".to_string(),
        }
    }

    pub fn convergence_display(&self) -> String {
        match self.convergence_pct {
            Some(v) => format!("{v}%"),
            None => "-".to_string(),
        }
    }
}

/// Domain entity - one OHLC bar as served by the kline endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KlineBar {
    pub time: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
}

impl KlineBar {
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// Domain entity - one point of an MA overlay line.
/// `value` is `None` where the trailing window has insufficient history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaPoint {
    pub time: String,
    pub value: Option<f64>,
}

/// Domain entity - candle series plus named MA overlays for one stock.
/// Replaced wholesale on every selection/window/interval change.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KlineSeries {
    /// Wire name on the kline endpoint is `ohlc`
    #[serde(rename = "ohlc")]
    pub bars: Vec<KlineBar>,
    /// Keyed by MA label, e.g. "ma5". BTreeMap keeps label iteration stable.
    #[serde(default)]
    pub ma_lines: BTreeMap<String, Vec<MaPoint>>,
}

impl KlineSeries {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    /// Labels that have at least one plottable point, in map order
    pub fn drawable_labels(&self) -> Vec<&str> {
        self.ma_lines
            .iter()
            .filter(|(_, points)| points.iter().any(|p| p.value.is_some()))
            .map(|(label, _)| label.as_str())
            .collect()
    }

    /// Price extent across bars and present MA values, padded is up to the caller
    pub fn price_range(&self) -> Option<(f64, f64)> {
        if self.bars.is_empty() {
            return None;
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for bar in &self.bars {
            min = min.min(bar.low);
            max = max.max(bar.high);
        }
        for points in self.ma_lines.values() {
            for point in points {
                if let Some(v) = point.value {
                    min = min.min(v);
                    max = max.max(v);
                }
            }
        }

        Some((min, max))
    }
}
