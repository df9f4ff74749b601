// src/controller.rs - Polling operations composing the API client and state
use log::warn;

use crate::api::ApiClient;
use crate::errors::ApiError;
use crate::state::DashboardState;
use crate::types::{HealthResponse, HealthState, MonitorRequest, SymbolDetail};

pub const DEFAULT_RISK_PERCENTAGE: f64 = 0.5;
pub const DEFAULT_ACCOUNT_SIZE: f64 = 100_000.0;

/// The dashboard controller: owns the client and the state container, and is
/// the only thing that mutates state. One method per user/timer action.
pub struct Dashboard {
    api: ApiClient,
    pub state: DashboardState,
}

impl Dashboard {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: DashboardState::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        self.api.base_url()
    }

    /// Health, then status, then signals (only while the monitor is active).
    /// Runs on the poll timer and once at startup.
    pub async fn refresh(&mut self) {
        self.fetch_health().await;
        self.fetch_monitor_status().await;
        if self.state.signals_poll_due() {
            self.fetch_signals().await;
        }
        self.state.mark_updated();
    }

    /// Health failures get a bespoke banner: an unreachable server is by far
    /// the most common setup problem, so the message names the base URL.
    pub async fn fetch_health(&mut self) {
        let token = self.state.health.begin();
        match self.api.health().await {
            Ok(health) => {
                if self.state.health.commit(token, health) {
                    self.state.clear_banner();
                }
            }
            Err(ApiError::Transport(e)) => {
                let fallback = HealthResponse {
                    status: HealthState::Unknown,
                    mt5_status: "Unreachable".to_string(),
                };
                if self.state.health.commit(token, fallback) {
                    self.state.set_banner(format!(
                        "Cannot reach API server at {} ({}). Check that it is running and allows access from this host.",
                        self.api.base_url(),
                        e
                    ));
                }
            }
            Err(err) => {
                let fallback = HealthResponse {
                    status: HealthState::Error,
                    mt5_status: "Unknown".to_string(),
                };
                if self.state.health.commit(token, fallback) {
                    self.state.set_banner(err.user_message());
                }
            }
        }
    }

    /// Background poll; failures are logged, never shown, to keep transient
    /// blips out of the banner.
    pub async fn fetch_monitor_status(&mut self) {
        let token = self.state.monitor.begin();
        match self.api.monitor_status().await {
            Ok(status) => {
                self.state.monitor.commit(token, status);
            }
            Err(e) => warn!("monitor status poll failed: {}", e),
        }
    }

    /// Background poll, gated on the locally known monitor state; the
    /// endpoint rejects the call while monitoring is inactive.
    pub async fn fetch_signals(&mut self) {
        if !self.state.signals_poll_due() {
            return;
        }
        let token = self.state.signals.begin();
        match self.api.signals().await {
            Ok(signals) => {
                self.state.signals.commit(token, signals);
            }
            Err(e) => warn!("signals poll failed: {}", e),
        }
    }

    /// Starts monitoring for `symbols`. Backend-rejected requests surface the
    /// backend's `detail` string verbatim; success re-reads the status slot.
    pub async fn start_monitoring(
        &mut self,
        symbols: Vec<String>,
        risk_percentage: f64,
        account_size: f64,
    ) -> bool {
        let request = MonitorRequest {
            symbols,
            risk_percentage,
            account_size,
        };
        match self.api.start_monitor(&request).await {
            Ok(_) => {
                self.state.clear_banner();
                self.fetch_monitor_status().await;
                true
            }
            Err(e) => {
                self.state.set_banner(e.user_message());
                false
            }
        }
    }

    pub async fn stop_monitoring(&mut self) -> bool {
        match self.api.stop_monitor().await {
            Ok(_) => {
                self.state.clear_banner();
                self.fetch_monitor_status().await;
                true
            }
            Err(e) => {
                self.state.set_banner(e.user_message());
                false
            }
        }
    }

    /// Chart, levels, analysis and price for one symbol, fetched
    /// concurrently. The cache entry is replaced only when all four succeed;
    /// any failure leaves the previous entry (if any) untouched and surfaces
    /// a generic per-symbol error.
    pub async fn fetch_symbol_detail(
        &mut self,
        symbol: &str,
        risk_percentage: f64,
        account_size: f64,
    ) {
        let token = self.state.details.begin(symbol);
        let merged = tokio::try_join!(
            self.api.chart(symbol),
            self.api.levels(symbol),
            self.api.analyze(symbol, risk_percentage, account_size),
            self.api.price(symbol),
        );

        match merged {
            Ok((chart, levels, analysis, price)) => {
                let detail = SymbolDetail {
                    chart,
                    levels,
                    analysis,
                    price,
                };
                if self.state.details.commit(symbol, token, detail) {
                    self.state.clear_banner();
                }
            }
            Err(e) => {
                warn!("detail fetch for {} failed: {}", symbol, e);
                self.state
                    .set_banner(format!("Failed to fetch data for {}", symbol));
            }
        }
    }
}
