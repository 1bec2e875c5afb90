use crate::domain::errors::ValidationError;
use crate::domain::market_data::{BarInterval, Market};
use serde::{Deserialize, Serialize};

/// Smallest MA window the backend accepts
pub const MIN_MA_PERIOD: u32 = 2;
/// Largest MA window the backend accepts
pub const MAX_MA_PERIOD: u32 = 500;

/// Filter parameters for one screen request.
/// Serialization matches the POST /api/screen body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenParams {
    pub ma_periods: Vec<u32>,
    pub convergence_pct: f64,
    pub convergence_days: u32,
    pub market: Market,
    pub interval: BarInterval,
}

impl ScreenParams {
    /// Check the invariants the controller must enforce before any request
    /// goes out: at least two distinct MA periods, each inside the accepted
    /// window, and positive threshold values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for &period in &self.ma_periods {
            if !(MIN_MA_PERIOD..=MAX_MA_PERIOD).contains(&period) {
                return Err(ValidationError::PeriodOutOfRange(period));
            }
        }

        let mut distinct = self.ma_periods.clone();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() < 2 {
            return Err(ValidationError::TooFewPeriods);
        }

        if self.convergence_pct <= 0.0 {
            return Err(ValidationError::NonPositiveConvergencePct);
        }
        if self.convergence_days == 0 {
            return Err(ValidationError::NonPositiveConvergenceDays);
        }

        Ok(())
    }
}

impl Default for ScreenParams {
    fn default() -> Self {
        Self {
            ma_periods: vec![5, 10, 20, 60],
            convergence_pct: 3.0,
            convergence_days: 5,
            market: Market::All,
            interval: BarInterval::OneDay,
        }
    }
}
