use crate::domain::{
    errors::TransportError,
    logging::{LogComponent, get_logger},
    market_data::{BarInterval, KlineSeries, Market, StockCode, StockSummary},
    screener::ScreenParams,
};
use futures::future::{Either, select};
use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;
use serde::Deserialize;
use std::cell::RefCell;
use std::future::Future;
use std::pin::pin;

/// Port the frontend dev server runs on; anything else means the backend
/// serves the assets itself and shares the origin.
const DEV_FRONTEND_PORT: &str = "3000";
const DEV_BACKEND_PORT: u16 = 8000;

/// Bound on a single request; a hung connection must not leave the loading
/// indicator up forever.
const REQUEST_TIMEOUT_MS: u32 = 30_000;

/// Health endpoint payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Error-body convention: non-2xx responses optionally carry a detail field
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

/// Backend capabilities the controller wiring depends on; implemented over
/// HTTP in production and by in-memory fakes under test.
#[allow(async_fn_in_trait)]
pub trait ScreenerApi {
    async fn list_stocks(
        &self,
        market: Market,
        limit: u32,
    ) -> Result<Vec<StockSummary>, TransportError>;

    async fn screen_stocks(
        &self,
        params: &ScreenParams,
    ) -> Result<Vec<StockSummary>, TransportError>;

    async fn stock_kline(
        &self,
        code: &StockCode,
        days: u32,
        ma_periods: &[u32],
        interval: BarInterval,
    ) -> Result<KlineSeries, TransportError>;

    async fn health_check(&self) -> Result<HealthStatus, TransportError>;
}

/// Base URL policy, decided once at startup: a page served from the dev
/// port targets the local backend port, anything else targets its own
/// origin.
pub fn base_url_for(port: &str, hostname: &str, origin: &str) -> String {
    if port == DEV_FRONTEND_PORT {
        format!("http://{hostname}:{DEV_BACKEND_PORT}")
    } else {
        origin.trim_end_matches('/').to_string()
    }
}

fn resolve_base_url() -> String {
    let Some(window) = web_sys::window() else {
        return format!("http://localhost:{DEV_BACKEND_PORT}");
    };
    let location = window.location();
    let port = location.port().unwrap_or_default();
    let hostname = location.hostname().unwrap_or_else(|_| "localhost".to_string());
    let origin = location.origin().unwrap_or_default();
    base_url_for(&port, &hostname, &origin)
}

/// HTTP transport over gloo fetch. One in-flight attempt per call, no retry,
/// no caching; every failure is normalized into `TransportError`.
pub struct ScreenerHttpClient {
    base_url: RefCell<String>,
}

impl ScreenerHttpClient {
    pub fn new() -> Self {
        Self { base_url: RefCell::new(resolve_base_url()) }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: RefCell::new(base_url.into()) }
    }

    /// Runtime override of the §6 startup policy
    pub fn set_base_url(&self, base_url: impl Into<String>) {
        *self.base_url.borrow_mut() = base_url.into();
    }

    pub fn base_url(&self) -> String {
        self.base_url.borrow().clone()
    }

    pub fn stocks_url(&self, market: Market, limit: u32) -> String {
        format!("{}/api/stocks?market={}&limit={limit}", self.base_url(), market.as_query_str())
    }

    pub fn screen_url(&self) -> String {
        format!("{}/api/screen", self.base_url())
    }

    pub fn kline_url(
        &self,
        code: &StockCode,
        days: u32,
        ma_periods: &[u32],
        interval: BarInterval,
    ) -> String {
        let periods = ma_periods.iter().map(u32::to_string).collect::<Vec<_>>().join(",");
        format!(
            "{}/api/stock/{}/kline?days={days}&ma_periods={periods}&interval={}",
            self.base_url(),
            code.value(),
            interval.as_query_str(),
        )
    }

    pub fn health_url(&self) -> String {
        format!("{}/api/health", self.base_url())
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: String) -> Result<T, TransportError> {
        get_logger()
            .info(LogComponent::Infrastructure("ScreenerAPI"), &format!("📡 GET {url}"));

        let send = async {
            Request::get(&url).send().await.map_err(|_| TransportError::unreachable())
        };
        let response = with_timeout(send).await?;
        decode_response(response).await
    }
}

impl Default for ScreenerHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenerApi for ScreenerHttpClient {
    async fn list_stocks(
        &self,
        market: Market,
        limit: u32,
    ) -> Result<Vec<StockSummary>, TransportError> {
        self.get_json(self.stocks_url(market, limit)).await
    }

    async fn screen_stocks(
        &self,
        params: &ScreenParams,
    ) -> Result<Vec<StockSummary>, TransportError> {
        let url = self.screen_url();
        get_logger()
            .info(LogComponent::Infrastructure("ScreenerAPI"), &format!("📡 POST {url}"));

        let send = async {
            Request::post(&url)
                .json(params)
                .map_err(|e| TransportError::Rejected(format!("Invalid request body: {e:?}")))?
                .send()
                .await
                .map_err(|_| TransportError::unreachable())
        };
        let response = with_timeout(send).await?;
        let stocks: Vec<StockSummary> = decode_response(response).await?;

        get_logger().info(
            LogComponent::Infrastructure("ScreenerAPI"),
            &format!("✅ Screen returned {} stocks", stocks.len()),
        );
        Ok(stocks)
    }

    async fn stock_kline(
        &self,
        code: &StockCode,
        days: u32,
        ma_periods: &[u32],
        interval: BarInterval,
    ) -> Result<KlineSeries, TransportError> {
        let series: KlineSeries =
            self.get_json(self.kline_url(code, days, ma_periods, interval)).await?;

        get_logger().info(
            LogComponent::Infrastructure("ScreenerAPI"),
            &format!(
                "✅ Received {} bars / {} MA lines for {}",
                series.bar_count(),
                series.ma_lines.len(),
                code.value()
            ),
        );
        Ok(series)
    }

    async fn health_check(&self) -> Result<HealthStatus, TransportError> {
        self.get_json(self.health_url()).await
    }
}

/// Race a transport call against the request timeout; expiry reads the same
/// as an unreachable server.
async fn with_timeout<T>(
    call: impl Future<Output = Result<T, TransportError>>,
) -> Result<T, TransportError> {
    let call = pin!(call);
    let timeout = pin!(TimeoutFuture::new(REQUEST_TIMEOUT_MS));
    match select(call, timeout).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => {
            get_logger().warn(
                LogComponent::Infrastructure("ScreenerAPI"),
                &format!("⏱ Request timed out after {REQUEST_TIMEOUT_MS}ms"),
            );
            Err(TransportError::unreachable())
        }
    }
}

/// Map a non-2xx response to the server-supplied detail when present,
/// otherwise "HTTP <status>"; decode the body on success.
async fn decode_response<T: for<'de> Deserialize<'de>>(
    response: Response,
) -> Result<T, TransportError> {
    if !response.ok() {
        let status = response.status();
        let detail = response.json::<ErrorBody>().await.ok().and_then(|body| body.detail);
        return Err(TransportError::Rejected(rejection_message(status, detail)));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| TransportError::Rejected(format!("無法解析伺服器回應: {e:?}")))
}

/// Fallback text for a rejection without a usable detail field
pub fn rejection_message(status: u16, detail: Option<String>) -> String {
    detail.filter(|d| !d.is_empty()).unwrap_or_else(|| format!("HTTP {status}"))
}
