/// Failures produced by the transport client. The unreachable/rejected
/// distinction is kept because the UI shows different guidance for each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The server answered with a non-2xx status; message is the server's
    /// `detail` field when present, otherwise "HTTP <status>".
    Rejected(String),
    /// DNS/connection-level failure or timeout; the server never answered.
    Unreachable(String),
}

impl TransportError {
    pub fn message(&self) -> &str {
        match self {
            TransportError::Rejected(msg) | TransportError::Unreachable(msg) => msg,
        }
    }

    pub fn unreachable() -> Self {
        TransportError::Unreachable("無法連接到伺服器，請確認後端服務是否啟動".to_string())
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for TransportError {}

/// Local parameter validation failures, detected before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    TooFewPeriods,
    PeriodOutOfRange(u32),
    NonPositiveConvergencePct,
    NonPositiveConvergenceDays,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::TooFewPeriods => write!(f, "請至少選擇兩條均線"),
            ValidationError::PeriodOutOfRange(period) => {
                write!(f, "均線週期 {period} 超出範圍 (2-500)")
            }
            ValidationError::NonPositiveConvergencePct => write!(f, "糾結幅度必須大於 0"),
            ValidationError::NonPositiveConvergenceDays => write!(f, "糾結天數必須大於 0"),
        }
    }
}

impl std::error::Error for ValidationError {}
