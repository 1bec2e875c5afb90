use ma_screener_wasm::application::ScreenerController;
use ma_screener_wasm::domain::errors::ValidationError;
use ma_screener_wasm::domain::screener::ScreenParams;
use quickcheck_macros::quickcheck;

#[test]
fn fewer_than_two_periods_issues_no_request() {
    let mut ctl = ScreenerController::new();
    let params = ScreenParams { ma_periods: vec![5], ..Default::default() };

    let result = ctl.begin_screen(&params);

    assert_eq!(result, Err(ValidationError::TooFewPeriods));
    assert!(!ctl.state().is_loading);
    assert!(ctl.state().stock_list.is_empty());
}

#[test]
fn warning_text_matches_ui_copy() {
    assert_eq!(ValidationError::TooFewPeriods.to_string(), "請至少選擇兩條均線");
}

#[test]
fn valid_params_raise_loading_and_return_token() {
    let mut ctl = ScreenerController::new();

    let token = ctl.begin_screen(&ScreenParams::default()).unwrap();

    assert_eq!(token, 1);
    assert!(ctl.state().is_loading);
}

#[test]
fn tokens_increase_per_request() {
    let mut ctl = ScreenerController::new();
    let first = ctl.begin_screen(&ScreenParams::default()).unwrap();
    let second = ctl.begin_screen(&ScreenParams::default()).unwrap();
    assert!(second > first);
}

/// Validation accepts exactly the parameter sets with at least two distinct
/// in-range periods.
#[quickcheck]
fn validation_accepts_iff_two_distinct_periods_in_range(raw_periods: Vec<u16>) -> bool {
    let params = ScreenParams {
        ma_periods: raw_periods.iter().map(|&p| p as u32).collect(),
        ..Default::default()
    };

    let all_in_range = params.ma_periods.iter().all(|&p| (2..=500).contains(&p));
    let mut distinct = params.ma_periods.clone();
    distinct.sort_unstable();
    distinct.dedup();

    let should_pass = all_in_range && distinct.len() >= 2;
    params.validate().is_ok() == should_pass
}
