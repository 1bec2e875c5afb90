use leptos::html::Div;
use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;

use crate::application::{
    ChartOutcome, ChartRequest, ScreenOutcome, ScreenerController, result_count_label,
    screen_success_message,
};
use crate::domain::{
    logging::{LogComponent, get_logger},
    market_data::{BarInterval, Market},
    screener::ScreenParams,
};
use crate::global_state::{
    MaRow, ToastKind, backend_status_signal, globals, is_loading_signal, selected_signal,
    stock_list_signal, toasts_signal,
};
use crate::infrastructure::{CanvasChart, ChartAdapter, ScreenerApi, ScreenerHttpClient};
use gloo::events::EventListener;
use gloo_timers::future::TimeoutFuture;

const CHART_CONTAINER_ID: &str = "chart-container";
const TOAST_DISMISS_MS: u32 = 3_000;

/// Everything the event handlers need; built once in `App`, passed down by
/// context so tests can build their own instead of reaching for ambient
/// state.
#[derive(Clone)]
struct AppServices {
    controller: Rc<RefCell<ScreenerController>>,
    api: Rc<ScreenerHttpClient>,
    chart: Rc<RefCell<CanvasChart>>,
}

/// Push a toast and schedule its dismissal after the fixed delay
fn notify(kind: ToastKind, message: impl Into<String>) {
    let id = globals().push_toast(message, kind);
    spawn_local(async move {
        TimeoutFuture::new(TOAST_DISMISS_MS).await;
        globals().dismiss_toast(id);
    });
}

/// 台股均線糾結篩選器 root component
#[component]
pub fn App() -> impl IntoView {
    let services = AppServices {
        controller: Rc::new(RefCell::new(ScreenerController::new())),
        api: Rc::new(ScreenerHttpClient::new()),
        chart: Rc::new(RefCell::new(CanvasChart::new())),
    };
    provide_context(services.clone());

    // Startup health probe; purely informational
    spawn_local({
        let api = services.api.clone();
        async move {
            match api.health_check().await {
                Ok(health) => {
                    globals().backend_ok.set(Some(true));
                    get_logger().info(
                        LogComponent::Presentation("App"),
                        &format!("✅ Backend healthy: {}", health.status),
                    );
                }
                Err(error) => {
                    globals().backend_ok.set(Some(false));
                    get_logger().warn(
                        LogComponent::Presentation("App"),
                        &format!("❌ Backend health check failed: {error}"),
                    );
                }
            }
        }
    });

    view! {
        <style>{include_str!("app.css")}</style>
        <div class="screener-app">
            <Header />
            <div class="layout">
                <aside class="sidebar">
                    <FilterPanel />
                    <StockListPanel />
                </aside>
                <main class="content">
                    <ChartPanel />
                </main>
            </div>
            <ToastHost />
        </div>
    }
}

/// Title bar with backend status dot
#[component]
fn Header() -> impl IntoView {
    let backend_ok = backend_status_signal();

    view! {
        <header class="header">
            <h1>"台股均線糾結篩選器"</h1>
            <span class="backend-status">
                {move || match backend_ok.get() {
                    None => "⏳ 連線中",
                    Some(true) => "🟢 已連線",
                    Some(false) => "🔴 離線",
                }}
            </span>
        </header>
    }
}

/// Screening filters: MA rows, convergence sliders, market, screen button
#[component]
fn FilterPanel() -> impl IntoView {
    let services = expect_context::<AppServices>();
    let is_loading = is_loading_signal();
    let convergence_pct = globals().convergence_pct;
    let convergence_days = globals().convergence_days;
    let market = globals().market;

    let on_screen = move |_| {
        let params = ScreenParams {
            ma_periods: globals().selected_ma_periods(),
            convergence_pct: convergence_pct.get_untracked(),
            convergence_days: convergence_days.get_untracked(),
            market: market.get_untracked(),
            interval: globals().interval.get_untracked(),
        };
        run_screen(&services, params);
    };

    view! {
        <section class="panel filter-panel">
            <h2>"篩選條件"</h2>

            <div class="field">
                <label>"均線選擇"</label>
                <div class="ma-rows">
                    {globals().ma_rows.iter().copied().map(ma_row_view).collect_view()}
                </div>
            </div>

            <div class="field">
                <label>"糾結幅度 (%)"</label>
                <div class="slider-row">
                    <input
                        type="range"
                        id="convergencePct"
                        min="0.5"
                        max="10"
                        step="0.5"
                        prop:value=move || convergence_pct.get().to_string()
                        on:input=move |ev| {
                            if let Ok(v) = event_target_value(&ev).parse::<f64>() {
                                convergence_pct.set(v);
                            }
                        }
                    />
                    <input
                        type="number"
                        id="convergencePctInput"
                        min="0.5"
                        max="10"
                        step="0.5"
                        prop:value=move || convergence_pct.get().to_string()
                        on:input=move |ev| {
                            if let Ok(v) = event_target_value(&ev).parse::<f64>() {
                                convergence_pct.set(v);
                            }
                        }
                    />
                </div>
            </div>

            <div class="field">
                <label>"連續糾結天數"</label>
                <div class="slider-row">
                    <input
                        type="range"
                        id="convergenceDays"
                        min="1"
                        max="30"
                        prop:value=move || convergence_days.get().to_string()
                        on:input=move |ev| {
                            if let Ok(v) = event_target_value(&ev).parse::<u32>() {
                                convergence_days.set(v);
                            }
                        }
                    />
                    <span id="convergenceDaysValue">
                        {move || format!("{} 天", convergence_days.get())}
                    </span>
                </div>
            </div>

            <div class="field">
                <label>"市場"</label>
                <div class="market-options">
                    {[Market::All, Market::Listed, Market::Otc]
                        .into_iter()
                        .map(|m| market_option_view(m, market))
                        .collect_view()}
                </div>
            </div>

            <button
                class="screen-btn"
                id="screenBtn"
                disabled=move || is_loading.get()
                on:click=on_screen
            >
                <span class="btn-text" style:display=move || if is_loading.get() { "none" } else { "inline" }>
                    "開始篩選"
                </span>
                <span class="btn-loader" style:display=move || if is_loading.get() { "inline-flex" } else { "none" }>
                    "篩選中..."
                </span>
            </button>
        </section>
    }
}

fn ma_row_view(row: MaRow) -> impl IntoView {
    view! {
        <div class="ma-input-item">
            <input
                type="checkbox"
                class="ma-checkbox"
                id=move || format!("ma{}", row.period.get())
                prop:checked=move || row.checked.get()
                on:change=move |ev| row.checked.set(event_target_checked(&ev))
            />
            <input
                type="number"
                class="ma-period-input"
                min="2"
                max="500"
                prop:value=move || row.period.get().to_string()
                on:input=move |ev| {
                    row.period.set(event_target_value(&ev).parse().unwrap_or(0));
                }
            />
            <span>"日"</span>
        </div>
    }
}

fn market_option_view(option: Market, market: RwSignal<Market>) -> impl IntoView {
    view! {
        <label class="market-option">
            <input
                type="radio"
                name="market"
                prop:checked=move || market.get() == option
                on:change=move |_| market.set(option)
            />
            {option.display_zh()}
        </label>
    }
}

/// Screening result list with the "<n> 檔" counter
#[component]
fn StockListPanel() -> impl IntoView {
    let services = expect_context::<AppServices>();
    let stocks = stock_list_signal();
    let selected = selected_signal();
    let has_screened = globals().has_screened;

    let on_select = move |code: String| {
        select_stock(&services, &code);
    };

    view! {
        <section class="panel stock-list-panel">
            <div class="list-header">
                <h2>"篩選結果"</h2>
                <span class="result-count" id="resultCount">
                    {move || result_count_label(stocks.get().len())}
                </span>
            </div>
            <div class="stock-list" id="stockList">
                <Show when=move || stocks.with(|s| s.is_empty())>
                    <div class="empty-state">
                        <p>
                            {move || if has_screened.get() {
                                "沒有符合條件的股票"
                            } else {
                                "點擊「開始篩選」搜尋均線糾結的股票"
                            }}
                        </p>
                    </div>
                </Show>
                <For
                    each=move || stocks.get()
                    key=|stock| stock.code.clone()
                    children=move |stock| {
                        let code = stock.code.value().to_string();
                        let active_code = stock.code.clone();
                        let on_select = on_select.clone();
                        view! {
                            <div
                                class="stock-item"
                                class:active=move || {
                                    selected.with(|s| {
                                        s.as_ref().map(|sel| sel.code == active_code).unwrap_or(false)
                                    })
                                }
                                on:click=move |_| on_select(code.clone())
                            >
                                <div class="stock-info">
                                    <span class="stock-code">{stock.code.value().to_string()}</span>
                                    <span class="stock-name">{stock.name.clone()}</span>
                                </div>
                                <div class="stock-meta">
                                    <div class="stock-price">{stock.close_display()}</div>
                                    <div class="stock-convergence">{stock.convergence_display()}</div>
                                </div>
                            </div>
                        }
                    }
                />
            </div>
        </section>
    }
}

/// Chart surface, window/interval switches, refresh, info cards
#[component]
fn ChartPanel() -> impl IntoView {
    let services = expect_context::<AppServices>();
    let selected = selected_signal();
    let window_days = globals().window_days;
    let interval = globals().interval;

    // Bind the canvas chart once the container exists, then follow window
    // resizes for the container's current dimensions.
    let container_ref = create_node_ref::<Div>();
    let bound = store_value(false);
    let bind_services = services.clone();
    create_effect(move |_| {
        if container_ref.get().is_some() && !bound.get_value() {
            bound.set_value(true);
            if let Err(error) = bind_services.chart.borrow_mut().bind(CHART_CONTAINER_ID) {
                get_logger().error(
                    LogComponent::Presentation("ChartPanel"),
                    &format!("❌ Chart bind failed: {error}"),
                );
                return;
            }
            if let Some(window) = web_sys::window() {
                let chart = bind_services.chart.clone();
                EventListener::new(&window, "resize", move |_| {
                    chart.borrow_mut().resize();
                })
                .forget();
            }
        }
    });

    let window_services = services.clone();
    let on_window = move |days: u32| {
        globals().window_days.set(days);
        let request = window_services.controller.borrow_mut().set_window_days(days);
        maybe_fetch_chart(&window_services, request);
    };

    let interval_services = services.clone();
    let on_interval = move |value: BarInterval| {
        globals().interval.set(value);
        let request = interval_services.controller.borrow_mut().set_interval(value);
        maybe_fetch_chart(&interval_services, request);
    };

    let refresh_services = services.clone();
    let on_refresh = move |_| {
        let request = refresh_services.controller.borrow_mut().refresh();
        maybe_fetch_chart(&refresh_services, request);
    };

    let on_window = Rc::new(on_window);
    let on_interval = Rc::new(on_interval);

    view! {
        <section class="panel chart-panel">
            <div class="chart-header">
                <div class="chart-title">
                    <span id="chartStockName">
                        {move || {
                            selected.with(|s| {
                                s.as_ref()
                                    .map(|stock| stock.name.clone())
                                    .unwrap_or_else(|| "選擇股票查看 K 線圖".to_string())
                            })
                        }}
                    </span>
                    <span id="chartStockCode">
                        {move || {
                            selected.with(|s| {
                                s.as_ref().map(|stock| stock.code.value().to_string()).unwrap_or_default()
                            })
                        }}
                    </span>
                </div>
                <div class="chart-controls">
                    <div class="period-btns">
                        {[30_u32, 60, 120, 240]
                            .into_iter()
                            .map(|days| {
                                let on_window = on_window.clone();
                                view! {
                                    <button
                                        class="period-btn"
                                        class:active=move || window_days.get() == days
                                        on:click=move |_| on_window(days)
                                    >
                                        {format!("{days}日")}
                                    </button>
                                }
                            })
                            .collect_view()}
                    </div>
                    <div class="interval-btns">
                        {[
                            (BarInterval::OneDay, "日K"),
                            (BarInterval::OneWeek, "週K"),
                            (BarInterval::OneMonth, "月K"),
                        ]
                            .into_iter()
                            .map(|(value, label)| {
                                let on_interval = on_interval.clone();
                                view! {
                                    <button
                                        class="interval-btn"
                                        class:active=move || interval.get() == value
                                        on:click=move |_| on_interval(value)
                                    >
                                        {label}
                                    </button>
                                }
                            })
                            .collect_view()}
                    </div>
                    <button class="refresh-btn" id="refreshBtn" on:click=on_refresh>
                        "🔄 重新整理"
                    </button>
                </div>
            </div>

            <div class="chart-container" id=CHART_CONTAINER_ID node_ref=container_ref></div>

            <Show when=move || selected.with(Option::is_some)>
                <div class="info-cards" id="infoCards">
                    <div class="info-card">
                        <div class="info-label">"收盤價"</div>
                        <div class="info-value" id="infoClose">
                            {move || selected.with(|s| s.as_ref().map(|x| x.close_display()).unwrap_or_default())}
                        </div>
                    </div>
                    <div class="info-card">
                        <div class="info-label">"糾結幅度"</div>
                        <div class="info-value" id="infoConvergence">
                            {move || selected.with(|s| s.as_ref().map(|x| x.convergence_display()).unwrap_or_default())}
                        </div>
                    </div>
                    <div class="info-card">
                        <div class="info-label">"市場"</div>
                        <div class="info-value" id="infoMarket">
                            {move || selected.with(|s| s.as_ref().map(|x| x.market.display_zh()).unwrap_or_default())}
                        </div>
                    </div>
                </div>
            </Show>
        </section>
    }
}

/// Transient notifications; each dismisses itself after the fixed delay
#[component]
fn ToastHost() -> impl IntoView {
    let toasts = toasts_signal();

    view! {
        <div class="toast-container" id="toastContainer">
            <For
                each=move || toasts.get()
                key=|toast| toast.id
                children=|toast| {
                    view! {
                        <div class=format!("toast {}", toast.kind.css_class())>
                            <span class="toast-message">{toast.message}</span>
                        </div>
                    }
                }
            />
        </div>
    }
}

/// Validate, issue, and apply one screen request end to end
fn run_screen(services: &AppServices, params: ScreenParams) {
    let token = match services.controller.borrow_mut().begin_screen(&params) {
        Ok(token) => token,
        Err(error) => {
            notify(ToastKind::Warning, error.to_string());
            return;
        }
    };
    globals().is_loading.set(true);

    let services = services.clone();
    spawn_local(async move {
        let result = services.api.screen_stocks(&params).await;
        let outcome = services.controller.borrow_mut().apply_screen_result(token, result);
        match outcome {
            ScreenOutcome::Applied { count, selection_cleared } => {
                globals().is_loading.set(false);
                globals().has_screened.set(true);
                globals()
                    .stock_list
                    .set(services.controller.borrow().state().stock_list.clone());
                // Re-resolved against the new list; None when the code vanished
                globals().selected.set(services.controller.borrow().selected_summary().cloned());
                if selection_cleared {
                    services.chart.borrow_mut().clear();
                }
                notify(ToastKind::Success, screen_success_message(count));
            }
            ScreenOutcome::Failed { message } => {
                globals().is_loading.set(false);
                notify(ToastKind::Error, message);
            }
            ScreenOutcome::Stale => {}
        }
    });
}

/// Select a stock from the list and load its candles; unknown codes no-op
fn select_stock(services: &AppServices, code: &str) {
    let request = services.controller.borrow_mut().select_stock(code);
    if request.is_some() {
        globals().selected.set(services.controller.borrow().selected_summary().cloned());
    }
    maybe_fetch_chart(services, request);
}

/// Issue the candle fetch a controller transition asked for, if any
fn maybe_fetch_chart(services: &AppServices, request: Option<ChartRequest>) {
    let Some(request) = request else { return };
    let ma_periods = globals().selected_ma_periods();

    let services = services.clone();
    spawn_local(async move {
        let result = services
            .api
            .stock_kline(&request.code, request.days, &ma_periods, request.interval)
            .await;
        let outcome = services.controller.borrow_mut().apply_chart_result(request.token, result);
        match outcome {
            ChartOutcome::Render(series) => {
                services.chart.borrow_mut().render(&series);
            }
            ChartOutcome::Empty => {
                notify(ToastKind::Warning, "沒有可顯示的 K 線資料");
            }
            ChartOutcome::Failed { message } => {
                notify(ToastKind::Error, format!("載入圖表失敗: {message}"));
            }
            ChartOutcome::Stale => {}
        }
    });
}
