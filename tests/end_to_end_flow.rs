use futures::executor::block_on;
use ma_screener_wasm::application::{ChartOutcome, ScreenerController, result_count_label};
use ma_screener_wasm::domain::chart::{PlotArea, build_chart_model};
use ma_screener_wasm::domain::errors::TransportError;
use ma_screener_wasm::domain::market_data::{
    BarInterval, KlineBar, KlineSeries, MaPoint, Market, StockCode, StockSummary,
};
use ma_screener_wasm::domain::screener::ScreenParams;
use ma_screener_wasm::infrastructure::http::{HealthStatus, ScreenerApi};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// In-memory backend standing in for the HTTP client; records every call
struct FakeBackend {
    calls: RefCell<Vec<String>>,
}

impl FakeBackend {
    fn new() -> Self {
        Self { calls: RefCell::new(Vec::new()) }
    }

    fn screen_result() -> Vec<StockSummary> {
        ["1101", "2330", "2603"]
            .into_iter()
            .map(|code| StockSummary {
                code: StockCode::from(code),
                name: format!("股票{code}"),
                market: Market::Listed,
                close: Some(42.0),
                convergence_pct: Some(2.2),
            })
            .collect()
    }

    fn kline_result(ma_periods: &[u32]) -> KlineSeries {
        let bars: Vec<KlineBar> = (0..30)
            .map(|i| KlineBar {
                time: format!("2024-03-{:02}", i + 1),
                open: 100.0 + i as f64,
                high: 102.0 + i as f64,
                low: 99.0 + i as f64,
                close: 101.0 + i as f64,
                volume: Some(5_000),
            })
            .collect();

        let mut ma_lines = BTreeMap::new();
        for &period in ma_periods {
            let points = bars
                .iter()
                .enumerate()
                .map(|(i, bar)| MaPoint {
                    time: bar.time.clone(),
                    value: (i + 1 >= period as usize).then(|| 100.5 + i as f64),
                })
                .collect();
            ma_lines.insert(format!("ma{period}"), points);
        }
        KlineSeries { bars, ma_lines }
    }
}

impl ScreenerApi for FakeBackend {
    async fn list_stocks(
        &self,
        market: Market,
        limit: u32,
    ) -> Result<Vec<StockSummary>, TransportError> {
        self.calls.borrow_mut().push(format!("list:{}:{limit}", market.as_query_str()));
        Ok(Self::screen_result())
    }

    async fn screen_stocks(
        &self,
        params: &ScreenParams,
    ) -> Result<Vec<StockSummary>, TransportError> {
        self.calls.borrow_mut().push(format!("screen:{:?}", params.ma_periods));
        Ok(Self::screen_result())
    }

    async fn stock_kline(
        &self,
        code: &StockCode,
        days: u32,
        ma_periods: &[u32],
        interval: BarInterval,
    ) -> Result<KlineSeries, TransportError> {
        self.calls.borrow_mut().push(format!(
            "kline:{}:{days}:{:?}:{}",
            code.value(),
            ma_periods,
            interval.as_query_str()
        ));
        Ok(Self::kline_result(ma_periods))
    }

    async fn health_check(&self) -> Result<HealthStatus, TransportError> {
        self.calls.borrow_mut().push("health".to_string());
        Ok(HealthStatus { status: "ok".to_string() })
    }
}

#[test]
fn screen_then_select_populates_list_and_chart() {
    let backend = FakeBackend::new();
    let mut ctl = ScreenerController::new();

    let params = ScreenParams {
        ma_periods: vec![5, 10, 20, 60],
        convergence_pct: 3.0,
        convergence_days: 5,
        market: Market::All,
        interval: BarInterval::OneDay,
    };

    // Screen: three matches, counter shows "3 檔"
    let token = ctl.begin_screen(&params).unwrap();
    let result = block_on(backend.screen_stocks(&params));
    ctl.apply_screen_result(token, result);

    assert_eq!(ctl.state().stock_list.len(), 3);
    assert_eq!(result_count_label(ctl.state().stock_list.len()), "3 檔");
    assert!(!ctl.state().is_loading);

    // Click the first list item
    let first_code = ctl.state().stock_list[0].code.clone();
    let request = ctl.select_stock(first_code.value()).unwrap();
    assert_eq!(ctl.state().selected, Some(first_code.clone()));

    let result = block_on(backend.stock_kline(
        &request.code,
        request.days,
        &params.ma_periods,
        request.interval,
    ));
    let outcome = ctl.apply_chart_result(request.token, result);

    // A non-empty candlestick series reaches the chart adapter
    let ChartOutcome::Render(series) = outcome else {
        panic!("expected a renderable series");
    };
    let model = build_chart_model(&series, PlotArea::new(800.0, 400.0));
    assert_eq!(model.candles.len(), 30);
    assert_eq!(model.legend.len(), 4);

    // Exactly one transport call per user action
    let calls = backend.calls.borrow();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].starts_with("screen:"));
    assert_eq!(calls[1], "kline:1101:120:[5, 10, 20, 60]:1d");
}

#[test]
fn health_and_listing_round_trip_through_the_api_seam() {
    let backend = FakeBackend::new();

    let health = block_on(backend.health_check()).unwrap();
    assert_eq!(health.status, "ok");

    let stocks = block_on(backend.list_stocks(Market::Otc, 50)).unwrap();
    assert_eq!(stocks.len(), 3);
    assert_eq!(*backend.calls.borrow(), vec!["health".to_string(), "list:TWO:50".to_string()]);
}
