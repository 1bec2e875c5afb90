use derive_more::{Deref, DerefMut, Display};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

/// Value Object - TWSE/TPEx stock code (e.g. "2330")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, DerefMut, Display, Serialize, Deserialize)]
#[display(fmt = "StockCode({})", _0)]
pub struct StockCode(String);

impl StockCode {
    pub fn new(code: String) -> Result<Self, String> {
        if code.is_empty() {
            return Err("Stock code cannot be empty".to_string());
        }
        Ok(Self(code))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StockCode {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Value Object - which exchange a stock trades on
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    StrumDisplay,
    EnumIter,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
pub enum Market {
    #[default]
    #[strum(serialize = "all")]
    #[serde(rename = "all")]
    All,

    /// 上市 (TWSE listed)
    #[strum(serialize = "TW")]
    #[serde(rename = "TW")]
    Listed,

    /// 上櫃 (TPEx over-the-counter)
    #[strum(serialize = "TWO")]
    #[serde(rename = "TWO")]
    Otc,
}

impl Market {
    pub fn as_query_str(&self) -> &str {
        self.as_ref()
    }

    /// Display name used by the info cards
    pub fn display_zh(&self) -> &'static str {
        match self {
            Market::Listed => "上市",
            Market::Otc => "上櫃",
            Market::All => "全部",
        }
    }
}

/// Value Object - bar granularity accepted by the kline endpoint
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    StrumDisplay,
    EnumIter,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
pub enum BarInterval {
    #[strum(serialize = "1m")]
    #[serde(rename = "1m")]
    OneMinute,

    #[strum(serialize = "5m")]
    #[serde(rename = "5m")]
    FiveMinutes,

    #[strum(serialize = "15m")]
    #[serde(rename = "15m")]
    FifteenMinutes,

    #[strum(serialize = "30m")]
    #[serde(rename = "30m")]
    ThirtyMinutes,

    #[strum(serialize = "1h")]
    #[serde(rename = "1h")]
    OneHour,

    #[strum(serialize = "4h")]
    #[serde(rename = "4h")]
    FourHours,

    #[strum(serialize = "1d")]
    #[serde(rename = "1d")]
    OneDay,

    #[strum(serialize = "1wk")]
    #[serde(rename = "1wk")]
    OneWeek,

    #[strum(serialize = "1mo")]
    #[serde(rename = "1mo")]
    OneMonth,
}

impl BarInterval {
    pub fn as_query_str(&self) -> &str {
        self.as_ref()
    }
}

impl Default for BarInterval {
    fn default() -> Self {
        Self::OneDay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn market_query_strings() {
        assert_eq!(Market::All.as_query_str(), "all");
        assert_eq!(Market::Listed.as_query_str(), "TW");
        assert_eq!(Market::Otc.as_query_str(), "TWO");
        assert_eq!(Market::from_str("TWO").unwrap(), Market::Otc);
    }

    #[test]
    fn interval_query_strings() {
        assert_eq!(BarInterval::OneDay.as_query_str(), "1d");
        assert_eq!(BarInterval::OneWeek.as_query_str(), "1wk");
        assert_eq!(BarInterval::OneMonth.as_query_str(), "1mo");
        assert_eq!(BarInterval::from_str("15m").unwrap(), BarInterval::FifteenMinutes);
    }

    #[test]
    fn stock_code_rejects_empty() {
        assert!(StockCode::new(String::new()).is_err());
        assert_eq!(StockCode::from("2330").value(), "2330");
    }
}
