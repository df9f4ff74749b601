// src/types.rs - Wire types for the monitoring API
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Signals keyed by symbol, most-recent-first within each symbol.
pub type SignalsBySymbol = HashMap<String, Vec<Signal>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Ok,
    Error,
    #[serde(other)]
    Unknown,
}

impl HealthState {
    pub fn text(&self) -> &str {
        match self {
            HealthState::Ok => "OK",
            HealthState::Error => "ERROR",
            HealthState::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: HealthState,
    #[serde(default = "unknown_string")]
    pub mt5_status: String,
}

fn unknown_string() -> String {
    "Unknown".to_string()
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: HealthState::Unknown,
            mt5_status: unknown_string(),
        }
    }
}

/// Monitoring state as reported by the backend. Always replaced wholesale
/// from a `/monitor/status` response, never mutated field-by-field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonitorStatus {
    pub active: bool,
    #[serde(default)]
    pub symbols: Vec<String>,
    // Backend emits a naive isoformat string, so it stays opaque.
    #[serde(default)]
    pub start_time: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Bull,
    Bear,
}

impl SignalKind {
    pub fn text(&self) -> &str {
        match self {
            SignalKind::Bull => "BULL",
            SignalKind::Bear => "BEAR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum RegressionTrend {
    #[serde(rename = "UPTREND")]
    Uptrend,
    #[serde(rename = "DOWNTREND")]
    Downtrend,
    #[serde(other)]
    Unknown,
}

impl RegressionTrend {
    pub fn text(&self) -> &str {
        match self {
            RegressionTrend::Uptrend => "UPTREND",
            RegressionTrend::Downtrend => "DOWNTREND",
            RegressionTrend::Unknown => "UNKNOWN",
        }
    }
}

impl Default for RegressionTrend {
    fn default() -> Self {
        RegressionTrend::Unknown
    }
}

/// A detected trade opportunity for one closed candle.
#[derive(Debug, Clone, Deserialize)]
pub struct Signal {
    pub time: String,
    #[serde(rename = "type")]
    pub kind: SignalKind,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub stop_loss: f64,
    #[serde(default)]
    pub position_size: f64,
    #[serde(default)]
    pub levels: Vec<String>,
    #[serde(default)]
    pub regression_trend: RegressionTrend,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonitorRequest {
    pub symbols: Vec<String>,
    pub risk_percentage: f64,
    pub account_size: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandleBar {
    pub time: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub symbol: String,
    pub timeframe: String,
    #[serde(default)]
    pub data: Vec<CandleBar>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LevelsResponse {
    pub symbol: String,
    // BTreeMap keeps level names in a stable order for rendering.
    #[serde(default)]
    pub levels: BTreeMap<String, f64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TradeRecommendation {
    pub direction: String,
    pub entry_price: f64,
    pub stop_loss: f64,
    #[serde(default)]
    pub stop_distance_price: Option<f64>,
    #[serde(default)]
    pub stop_distance_points: Option<f64>,
    pub position_size: f64,
    pub risk_amount: f64,
    #[serde(default)]
    pub regression_trend: RegressionTrend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeResponse {
    pub symbol: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub candle_type: Option<String>,
    #[serde(default)]
    pub touch_levels: Vec<String>,
    #[serde(default)]
    pub price_levels: BTreeMap<String, f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub trade_recommendation: Option<TradeRecommendation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceResponse {
    pub symbol: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Everything the detail view needs for one symbol. Committed to the cache
/// as a unit: either all four bodies decoded, or nothing changes.
#[derive(Debug, Clone)]
pub struct SymbolDetail {
    pub chart: ChartResponse,
    pub levels: LevelsResponse,
    pub analysis: AnalyzeResponse,
    pub price: PriceResponse,
}
