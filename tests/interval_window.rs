use ma_screener_wasm::application::{ChartOutcome, ScreenerController};
use ma_screener_wasm::domain::market_data::{
    BarInterval, KlineBar, KlineSeries, Market, StockCode, StockSummary,
};
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

fn selected_controller() -> ScreenerController {
    let mut ctl = ScreenerController::new();
    let token = ctl.begin_screen(&ScreenParams::default()).unwrap();
    ctl.apply_screen_result(token, Ok(vec![summary("2330")]));
    ctl.select_stock("2330").unwrap();
    ctl
}

#[test]
fn window_change_with_selection_triggers_one_fetch() {
    let mut ctl = selected_controller();

    let request = ctl.set_window_days(30).expect("fetch expected");

    assert_eq!(request.days, 30);
    assert_eq!(request.code.value(), "2330");
    assert_eq!(ctl.state().window_days, 30);

    // Exactly one: the returned request is the newest token, so the
    // previous selection fetch is now stale and only this one may render.
    assert!(matches!(
        ctl.apply_chart_result(request.token, Ok(one_bar_series())),
        ChartOutcome::Render(_)
    ));
}

#[test]
fn interval_change_with_selection_triggers_one_fetch() {
    let mut ctl = selected_controller();

    let request = ctl.set_interval(BarInterval::OneWeek).expect("fetch expected");

    assert_eq!(request.interval, BarInterval::OneWeek);
    assert_eq!(ctl.state().interval, BarInterval::OneWeek);
}

#[test]
fn window_change_without_selection_updates_state_only() {
    let mut ctl = ScreenerController::new();

    assert!(ctl.set_window_days(60).is_none());
    assert!(ctl.set_interval(BarInterval::OneMonth).is_none());
    assert_eq!(ctl.state().window_days, 60);
    assert_eq!(ctl.state().interval, BarInterval::OneMonth);
}

#[test]
fn refresh_refetches_current_selection_only() {
    let mut ctl = selected_controller();

    let request = ctl.refresh().expect("fetch expected");
    assert_eq!(request.code.value(), "2330");
    assert_eq!(request.days, 120);
    assert_eq!(request.interval, BarInterval::OneDay);
}

#[test]
fn refresh_without_selection_is_a_noop() {
    let mut ctl = ScreenerController::new();
    assert!(ctl.refresh().is_none());
}

fn one_bar_series() -> KlineSeries {
    KlineSeries {
        bars: vec![KlineBar {
            time: "2024-01-02".to_string(),
            open: 10.0,
            high: 11.0,
            low: 9.0,
            close: 10.5,
            volume: Some(1000),
        }],
        ma_lines: Default::default(),
    }
}
