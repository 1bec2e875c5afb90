use crate::domain::errors::{TransportError, ValidationError};
use crate::domain::logging::{LogComponent, get_logger};
use crate::log_debug;
use crate::domain::market_data::{BarInterval, KlineSeries, StockCode, StockSummary};
use crate::domain::screener::ScreenParams;

/// The single piece of application state. Owned by one controller instance;
/// every mutation funnels through controller methods.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub stock_list: Vec<StockSummary>,
    pub selected: Option<StockCode>,
    pub window_days: u32,
    pub interval: BarInterval,
    pub is_loading: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            stock_list: Vec::new(),
            selected: None,
            window_days: 120,
            interval: BarInterval::OneDay,
            is_loading: false,
        }
    }
}

/// A candle fetch the caller must issue; `token` identifies the newest
/// request for the chart target.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub token: u64,
    pub code: StockCode,
    pub days: u32,
    pub interval: BarInterval,
}

/// What happened to a screen response once it came back
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenOutcome {
    Applied { count: usize, selection_cleared: bool },
    Failed { message: String },
    /// A newer screen request was issued since; response discarded
    Stale,
}

/// What happened to a candle response once it came back
#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    Render(Box<KlineSeries>),
    /// Zero bars: previous chart stays visible, caller surfaces a warning
    Empty,
    Failed { message: String },
    Stale,
}

/// Sole authority over `UiState`; sequences overlapping async completions
/// with per-target tokens so only the newest response may update state.
#[derive(Debug, Default)]
pub struct ScreenerController {
    state: UiState,
    screen_seq: u64,
    chart_seq: u64,
}

impl ScreenerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn selected_summary(&self) -> Option<&StockSummary> {
        let code = self.state.selected.as_ref()?;
        self.state.stock_list.iter().find(|stock| &stock.code == code)
    }

    /// Validate filters and open a screen request. On success the loading
    /// flag is raised and the returned token must accompany the response.
    /// On validation failure nothing is mutated and no request goes out.
    pub fn begin_screen(&mut self, params: &ScreenParams) -> Result<u64, ValidationError> {
        params.validate()?;

        self.state.is_loading = true;
        self.screen_seq += 1;
        get_logger().info(
            LogComponent::Application("Controller"),
            &format!("📋 Screen request #{} ({:?})", self.screen_seq, params.ma_periods),
        );
        Ok(self.screen_seq)
    }

    /// Apply a screen completion. A stale token leaves everything untouched,
    /// including the loading flag, which the newest request owns.
    pub fn apply_screen_result(
        &mut self,
        token: u64,
        result: Result<Vec<StockSummary>, TransportError>,
    ) -> ScreenOutcome {
        if token != self.screen_seq {
            log_debug!(LogComponent::Application("Controller"), "Discarding stale screen response #{token}");
            return ScreenOutcome::Stale;
        }

        self.state.is_loading = false;

        match result {
            Ok(stocks) => {
                let count = stocks.len();
                self.state.stock_list = stocks;

                // Re-resolve the selection by code; a vanished code clears it
                let selection_cleared = match &self.state.selected {
                    Some(code) => {
                        let still_listed =
                            self.state.stock_list.iter().any(|stock| &stock.code == code);
                        if !still_listed {
                            self.state.selected = None;
                        }
                        !still_listed
                    }
                    None => false,
                };

                get_logger().info(
                    LogComponent::Application("Controller"),
                    &format!("✅ Screen #{token} applied: {count} stocks"),
                );
                ScreenOutcome::Applied { count, selection_cleared }
            }
            Err(error) => {
                get_logger().error(
                    LogComponent::Application("Controller"),
                    &format!("❌ Screen #{token} failed: {error}"),
                );
                ScreenOutcome::Failed { message: error.message().to_string() }
            }
        }
    }

    /// Select a stock from the current list. Unknown codes are a no-op and
    /// return no fetch; known codes become the selection and open a candle
    /// request for the current window/interval.
    pub fn select_stock(&mut self, code: &str) -> Option<ChartRequest> {
        let code = self
            .state
            .stock_list
            .iter()
            .find(|stock| stock.code.value() == code)
            .map(|stock| stock.code.clone())?;
        self.state.selected = Some(code.clone());
        Some(self.next_chart_request(code))
    }

    pub fn set_window_days(&mut self, days: u32) -> Option<ChartRequest> {
        self.state.window_days = days;
        let code = self.state.selected.clone()?;
        Some(self.next_chart_request(code))
    }

    pub fn set_interval(&mut self, interval: BarInterval) -> Option<ChartRequest> {
        self.state.interval = interval;
        let code = self.state.selected.clone()?;
        Some(self.next_chart_request(code))
    }

    /// Re-fetch candles for the current selection; no-op when nothing is
    /// selected.
    pub fn refresh(&mut self) -> Option<ChartRequest> {
        let code = self.state.selected.clone()?;
        Some(self.next_chart_request(code))
    }

    /// Apply a candle completion under the same staleness rule as screening.
    pub fn apply_chart_result(
        &mut self,
        token: u64,
        result: Result<KlineSeries, TransportError>,
    ) -> ChartOutcome {
        if token != self.chart_seq {
            log_debug!(LogComponent::Application("Controller"), "Discarding stale candle response #{token}");
            return ChartOutcome::Stale;
        }

        match result {
            Ok(series) if series.is_empty() => ChartOutcome::Empty,
            Ok(series) => ChartOutcome::Render(Box::new(series)),
            Err(error) => ChartOutcome::Failed { message: error.message().to_string() },
        }
    }

    fn next_chart_request(&mut self, code: StockCode) -> ChartRequest {
        self.chart_seq += 1;
        ChartRequest {
            token: self.chart_seq,
            code,
            days: self.state.window_days,
            interval: self.state.interval,
        }
    }
}

/// Result-count label next to the stock list, e.g. "3 檔"
pub fn result_count_label(count: usize) -> String {
    format!("{count} 檔")
}

/// Success toast after a screen run
pub fn screen_success_message(count: usize) -> String {
    format!("找到 {count} 檔符合條件的股票")
}
