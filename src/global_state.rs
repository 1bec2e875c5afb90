use crate::domain::market_data::{BarInterval, Market, StockSummary};
use leptos::*;
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicU64, Ordering};

/// Severity of a transient notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            ToastKind::Info => "info",
            ToastKind::Success => "success",
            ToastKind::Warning => "warning",
            ToastKind::Error => "error",
        }
    }
}

/// One transient notification; carries no application state
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
}

/// One MA filter row: a checkbox plus an editable period
#[derive(Debug, Clone, Copy)]
pub struct MaRow {
    pub checked: RwSignal<bool>,
    pub period: RwSignal<u32>,
}

/// Presentation mirrors of the controller-owned state plus raw filter
/// inputs. The controller stays the single authority; these signals only
/// drive rendering.
pub struct Globals {
    pub stock_list: RwSignal<Vec<StockSummary>>,
    pub selected: RwSignal<Option<StockSummary>>,
    pub is_loading: RwSignal<bool>,
    pub has_screened: RwSignal<bool>,
    pub window_days: RwSignal<u32>,
    pub interval: RwSignal<BarInterval>,
    pub market: RwSignal<Market>,
    pub convergence_pct: RwSignal<f64>,
    pub convergence_days: RwSignal<u32>,
    pub ma_rows: Vec<MaRow>,
    pub toasts: RwSignal<Vec<Toast>>,
    pub backend_ok: RwSignal<Option<bool>>,
    next_toast_id: AtomicU64,
}

static GLOBALS: OnceCell<Globals> = OnceCell::new();

/// Default filter rows: 5/10/20/60 checked, 120/240 present but off
fn default_ma_rows() -> Vec<MaRow> {
    [(5, true), (10, true), (20, true), (60, true), (120, false), (240, false)]
        .into_iter()
        .map(|(period, checked)| MaRow {
            checked: create_rw_signal(checked),
            period: create_rw_signal(period),
        })
        .collect()
}

pub fn globals() -> &'static Globals {
    GLOBALS.get_or_init(|| Globals {
        stock_list: create_rw_signal(Vec::new()),
        selected: create_rw_signal(None),
        is_loading: create_rw_signal(false),
        has_screened: create_rw_signal(false),
        window_days: create_rw_signal(120),
        interval: create_rw_signal(BarInterval::OneDay),
        market: create_rw_signal(Market::All),
        convergence_pct: create_rw_signal(3.0),
        convergence_days: create_rw_signal(5),
        ma_rows: default_ma_rows(),
        toasts: create_rw_signal(Vec::new()),
        backend_ok: create_rw_signal(None),
        next_toast_id: AtomicU64::new(1),
    })
}

impl Globals {
    /// Periods of every checked row with a usable value, read at request time
    pub fn selected_ma_periods(&self) -> Vec<u32> {
        self.ma_rows
            .iter()
            .filter(|row| row.checked.get_untracked())
            .map(|row| row.period.get_untracked())
            .filter(|&period| period > 0 && period <= 500)
            .collect()
    }

    pub fn push_toast(&self, message: impl Into<String>, kind: ToastKind) -> u64 {
        let id = self.next_toast_id.fetch_add(1, Ordering::SeqCst);
        self.toasts.update(|toasts| {
            toasts.push(Toast { id, message: message.into(), kind });
        });
        id
    }

    pub fn dismiss_toast(&self, id: u64) {
        self.toasts.update(|toasts| toasts.retain(|toast| toast.id != id));
    }
}

// Accessors for the signals the components read most
crate::global_signals! {
    pub stock_list_signal => stock_list: Vec<StockSummary>,
    pub selected_signal => selected: Option<StockSummary>,
    pub is_loading_signal => is_loading: bool,
    pub toasts_signal => toasts: Vec<Toast>,
    pub backend_status_signal => backend_ok: Option<bool>,
}
