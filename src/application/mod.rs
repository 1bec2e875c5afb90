pub mod controller;

pub use controller::{
    ChartOutcome, ChartRequest, ScreenOutcome, ScreenerController, UiState, result_count_label,
    screen_success_message,
};
