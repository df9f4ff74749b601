// src/api.rs - Typed client for the MT5 monitoring API
use std::env;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

use crate::errors::{ApiError, ApiResult};
use crate::types::{
    AnalyzeResponse, ChartResponse, HealthResponse, LevelsResponse, MonitorRequest, MonitorStatus,
    PriceResponse, SignalsBySymbol,
};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

const DEFAULT_CHART_TIMEFRAME: &str = "M10";
const DEFAULT_CHART_BARS: u32 = 100;

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new() -> Self {
        let base_url = env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(self.url(path))
            .timeout(Duration::from_secs(5))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(self.url(path))
            .timeout(Duration::from_secs(10))
    }

    /// Decodes a success body, or turns an error status into
    /// `ApiError::Backend` carrying the backend's `detail` string.
    async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> ApiResult<T> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let detail = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| {
                    body.get("detail")
                        .and_then(|d| d.as_str())
                        .map(str::to_string)
                })
                .unwrap_or_else(|| {
                    format!("HTTP {}", status.canonical_reason().unwrap_or(status.as_str()))
                });
            Err(ApiError::Backend { status, detail })
        }
    }

    pub async fn health(&self) -> ApiResult<HealthResponse> {
        let response = self.get("/health").send().await?;
        Self::decode(response).await
    }

    pub async fn monitor_status(&self) -> ApiResult<MonitorStatus> {
        let response = self.get("/monitor/status").send().await?;
        Self::decode(response).await
    }

    pub async fn signals(&self) -> ApiResult<SignalsBySymbol> {
        let response = self.get("/monitor/signals").send().await?;
        Self::decode(response).await
    }

    pub async fn start_monitor(&self, request: &MonitorRequest) -> ApiResult<MonitorStatus> {
        let response = self.post("/monitor/start").json(request).send().await?;
        Self::decode(response).await
    }

    pub async fn stop_monitor(&self) -> ApiResult<Value> {
        let response = self.post("/monitor/stop").send().await?;
        Self::decode(response).await
    }

    // The data endpoints are POSTs with query parameters, matching the
    // backend's FastAPI signatures.

    pub async fn chart(&self, symbol: &str) -> ApiResult<ChartResponse> {
        let response = self
            .post("/data/chart")
            .query(&[
                ("symbol", symbol.to_string()),
                ("timeframe", DEFAULT_CHART_TIMEFRAME.to_string()),
                ("num_bars", DEFAULT_CHART_BARS.to_string()),
            ])
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn levels(&self, symbol: &str) -> ApiResult<LevelsResponse> {
        let response = self
            .post("/data/levels")
            .query(&[("symbol", symbol)])
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn analyze(
        &self,
        symbol: &str,
        risk_percentage: f64,
        account_size: f64,
    ) -> ApiResult<AnalyzeResponse> {
        let response = self
            .post("/data/analyze")
            .query(&[
                ("symbol", symbol.to_string()),
                ("risk_percentage", risk_percentage.to_string()),
                ("account_size", account_size.to_string()),
            ])
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn price(&self, symbol: &str) -> ApiResult<PriceResponse> {
        let response = self
            .post("/data/price")
            .json(&serde_json::json!({ "symbol": symbol }))
            .send()
            .await?;
        Self::decode(response).await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
