use ma_screener_wasm::application::{ChartOutcome, ScreenOutcome, ScreenerController};
use ma_screener_wasm::domain::errors::TransportError;
use ma_screener_wasm::domain::market_data::{KlineBar, KlineSeries, Market, StockCode, StockSummary};
use ma_screener_wasm::domain::screener::ScreenParams;

fn summary(code: &str) -> StockSummary {
    StockSummary {
        code: StockCode::from(code),
        name: format!("股票{code}"),
        market: Market::Listed,
        close: Some(100.0),
        convergence_pct: Some(2.0),
    }
}

fn series(times: &[&str]) -> KlineSeries {
    KlineSeries {
        bars: times
            .iter()
            .map(|&time| KlineBar {
                time: time.to_string(),
                open: 10.0,
                high: 11.0,
                low: 9.0,
                close: 10.5,
                volume: None,
            })
            .collect(),
        ma_lines: Default::default(),
    }
}

#[test]
fn late_response_of_superseded_screen_is_discarded() {
    let mut ctl = ScreenerController::new();
    let first = ctl.begin_screen(&ScreenParams::default()).unwrap();
    let second = ctl.begin_screen(&ScreenParams::default()).unwrap();

    // Newer request resolves first
    let outcome = ctl.apply_screen_result(second, Ok(vec![summary("2317")]));
    assert!(matches!(outcome, ScreenOutcome::Applied { .. }));

    // Older response arrives afterwards and must not revert the list
    let outcome = ctl.apply_screen_result(first, Ok(vec![summary("2330")]));
    assert_eq!(outcome, ScreenOutcome::Stale);
    assert_eq!(ctl.state().stock_list, vec![summary("2317")]);
}

#[test]
fn stale_response_does_not_touch_loading_flag() {
    let mut ctl = ScreenerController::new();
    let first = ctl.begin_screen(&ScreenParams::default()).unwrap();
    let second = ctl.begin_screen(&ScreenParams::default()).unwrap();

    // While the newest request is outstanding, a stale completion must leave
    // the indicator up; the newest request owns it.
    assert_eq!(ctl.apply_screen_result(first, Ok(Vec::new())), ScreenOutcome::Stale);
    assert!(ctl.state().is_loading);

    ctl.apply_screen_result(second, Ok(Vec::new()));
    assert!(!ctl.state().is_loading);
}

#[test]
fn stale_failure_is_discarded_too() {
    let mut ctl = ScreenerController::new();
    let first = ctl.begin_screen(&ScreenParams::default()).unwrap();
    let second = ctl.begin_screen(&ScreenParams::default()).unwrap();

    ctl.apply_screen_result(second, Ok(vec![summary("2330")]));
    let outcome = ctl.apply_screen_result(first, Err(TransportError::unreachable()));

    assert_eq!(outcome, ScreenOutcome::Stale);
    assert_eq!(ctl.state().stock_list, vec![summary("2330")]);
}

#[test]
fn superseded_candle_response_is_discarded() {
    let mut ctl = ScreenerController::new();
    let token = ctl.begin_screen(&ScreenParams::default()).unwrap();
    ctl.apply_screen_result(token, Ok(vec![summary("2330"), summary("2317")]));

    let first = ctl.select_stock("2330").unwrap();
    let second = ctl.select_stock("2317").unwrap();

    let late = ctl.apply_chart_result(first.token, Ok(series(&["2024-01-02"])));
    assert_eq!(late, ChartOutcome::Stale);

    let fresh = ctl.apply_chart_result(second.token, Ok(series(&["2024-01-03"])));
    assert!(matches!(fresh, ChartOutcome::Render(_)));
}

#[test]
fn window_change_supersedes_pending_selection_fetch() {
    let mut ctl = ScreenerController::new();
    let token = ctl.begin_screen(&ScreenParams::default()).unwrap();
    ctl.apply_screen_result(token, Ok(vec![summary("2330")]));

    let select_request = ctl.select_stock("2330").unwrap();
    let window_request = ctl.set_window_days(30).unwrap();

    assert_eq!(ctl.apply_chart_result(select_request.token, Ok(series(&["a"]))), ChartOutcome::Stale);
    assert!(matches!(ctl.apply_chart_result(window_request.token, Ok(series(&["a"]))), ChartOutcome::Render(_)));
}
