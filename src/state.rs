// src/state.rs - Dashboard state container: epoch-guarded slots and the
// bounded per-symbol detail cache.
use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use crate::types::{HealthResponse, MonitorStatus, SignalsBySymbol, SymbolDetail};

pub const DETAIL_CACHE_CAPACITY: usize = 16;

/// One named state slot. Every fetch takes a token from `begin()` before the
/// request goes out; the response may only `commit()` with that token. A token
/// older than the latest issued one is discarded, so a slow response can never
/// overwrite state written by a newer request (timer vs. manual refresh race).
#[derive(Debug, Default)]
pub struct Slot<T> {
    value: T,
    issued: u64,
    committed: u64,
}

impl<T> Slot<T> {
    pub fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Replaces the slot value wholesale. Returns false (and drops the value)
    /// when the token has been superseded.
    pub fn commit(&mut self, token: u64, value: T) -> bool {
        if token != self.issued || token <= self.committed {
            return false;
        }
        self.value = value;
        self.committed = token;
        true
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn has_committed(&self) -> bool {
        self.committed > 0
    }
}

/// Fixed-capacity LRU over `SymbolDetail`. Grows one entry per symbol the
/// user drills into, so a long-running session needs the cap. Same epoch
/// rule as `Slot`, tracked per symbol.
#[derive(Debug)]
pub struct DetailCache {
    capacity: usize,
    entries: HashMap<String, SymbolDetail>,
    // Front = most recently used.
    order: VecDeque<String>,
    issued: HashMap<String, u64>,
    committed: HashMap<String, u64>,
}

impl DetailCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
            issued: HashMap::new(),
            committed: HashMap::new(),
        }
    }

    pub fn begin(&mut self, symbol: &str) -> u64 {
        let issued = self.issued.entry(symbol.to_string()).or_insert(0);
        *issued += 1;
        *issued
    }

    /// Commits a fully merged detail for `symbol`. Partial results never get
    /// here; the controller only calls this once all four requests resolved.
    pub fn commit(&mut self, symbol: &str, token: u64, detail: SymbolDetail) -> bool {
        let latest = self.issued.get(symbol).copied().unwrap_or(0);
        let committed = self.committed.get(symbol).copied().unwrap_or(0);
        if token != latest || token <= committed {
            return false;
        }
        self.entries.insert(symbol.to_string(), detail);
        self.committed.insert(symbol.to_string(), token);
        self.touch(symbol);
        self.evict_past_capacity();
        true
    }

    /// Lookup that refreshes recency.
    pub fn get(&mut self, symbol: &str) -> Option<&SymbolDetail> {
        if self.entries.contains_key(symbol) {
            self.touch(symbol);
        }
        self.entries.get(symbol)
    }

    pub fn peek(&self, symbol: &str) -> Option<&SymbolDetail> {
        self.entries.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn touch(&mut self, symbol: &str) {
        self.order.retain(|s| s != symbol);
        self.order.push_front(symbol.to_string());
    }

    fn evict_past_capacity(&mut self) {
        while self.entries.len() > self.capacity {
            if let Some(oldest) = self.order.pop_back() {
                self.entries.remove(&oldest);
                self.committed.remove(&oldest);
            } else {
                break;
            }
        }
    }
}

impl Default for DetailCache {
    fn default() -> Self {
        Self::new(DETAIL_CACHE_CAPACITY)
    }
}

/// All shared dashboard state, one named slot per backend concern. Mutation
/// happens only through slot commits, so every update path is wholesale
/// replacement of one slot.
pub struct DashboardState {
    pub health: Slot<HealthResponse>,
    pub monitor: Slot<MonitorStatus>,
    pub signals: Slot<SignalsBySymbol>,
    pub details: DetailCache,
    banner: Option<String>,
    pub last_update: Option<Instant>,
    pub update_count: u64,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            health: Slot::default(),
            monitor: Slot::default(),
            signals: Slot::default(),
            details: DetailCache::default(),
            banner: None,
            last_update: None,
            update_count: 0,
        }
    }

    /// The persistent error banner. It stays up until the next successful
    /// relevant call clears it; background poll failures never set it.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn set_banner(&mut self, message: impl Into<String>) {
        self.banner = Some(message.into());
    }

    pub fn clear_banner(&mut self) {
        self.banner = None;
    }

    /// Signals are polled only while the backend reports the monitor active;
    /// the endpoint 400s otherwise.
    pub fn signals_poll_due(&self) -> bool {
        self.monitor.get().active
    }

    pub fn mark_updated(&mut self) {
        self.last_update = Some(Instant::now());
        self.update_count += 1;
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnalyzeResponse, ChartResponse, LevelsResponse, PriceResponse};

    fn detail_for(symbol: &str) -> SymbolDetail {
        SymbolDetail {
            chart: ChartResponse {
                symbol: symbol.to_string(),
                timeframe: "M10".to_string(),
                data: Vec::new(),
            },
            levels: LevelsResponse {
                symbol: symbol.to_string(),
                levels: Default::default(),
                message: None,
                timestamp: None,
            },
            analysis: AnalyzeResponse {
                symbol: symbol.to_string(),
                current_price: Some(1.0),
                candle_type: None,
                touch_levels: Vec::new(),
                price_levels: Default::default(),
                timestamp: None,
                trade_recommendation: None,
            },
            price: PriceResponse {
                symbol: symbol.to_string(),
                price: Some(1.0),
                timestamp: None,
            },
        }
    }

    #[test]
    fn slot_discards_superseded_token() {
        let mut slot: Slot<u32> = Slot::default();
        let first = slot.begin();
        let second = slot.begin();

        // The newer request resolves first.
        assert!(slot.commit(second, 2));
        // The slow first response arrives afterwards and must be dropped.
        assert!(!slot.commit(first, 1));
        assert_eq!(*slot.get(), 2);
    }

    #[test]
    fn slot_rejects_double_commit() {
        let mut slot: Slot<u32> = Slot::default();
        let token = slot.begin();
        assert!(slot.commit(token, 7));
        assert!(!slot.commit(token, 8));
        assert_eq!(*slot.get(), 7);
    }

    #[test]
    fn detail_cache_commit_and_stale_discard() {
        let mut cache = DetailCache::new(4);
        let first = cache.begin("EURUSD");
        let second = cache.begin("EURUSD");

        assert!(cache.commit("EURUSD", second, detail_for("EURUSD")));
        assert!(!cache.commit("EURUSD", first, detail_for("EURUSD")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn detail_cache_evicts_least_recently_used() {
        let mut cache = DetailCache::new(2);
        for symbol in ["EURUSD", "GBPUSD", "USDJPY"] {
            let token = cache.begin(symbol);
            assert!(cache.commit(symbol, token, detail_for(symbol)));
        }

        assert_eq!(cache.len(), 2);
        assert!(cache.peek("EURUSD").is_none());
        assert!(cache.peek("GBPUSD").is_some());
        assert!(cache.peek("USDJPY").is_some());
    }

    #[test]
    fn detail_cache_get_refreshes_recency() {
        let mut cache = DetailCache::new(2);
        for symbol in ["EURUSD", "GBPUSD"] {
            let token = cache.begin(symbol);
            cache.commit(symbol, token, detail_for(symbol));
        }

        // Touch EURUSD so GBPUSD becomes the eviction candidate.
        assert!(cache.get("EURUSD").is_some());
        let token = cache.begin("USDJPY");
        cache.commit("USDJPY", token, detail_for("USDJPY"));

        assert!(cache.peek("EURUSD").is_some());
        assert!(cache.peek("GBPUSD").is_none());
    }

    #[test]
    fn signals_poll_gated_on_monitor_active() {
        let mut state = DashboardState::new();
        assert!(!state.signals_poll_due());

        let token = state.monitor.begin();
        state.monitor.commit(
            token,
            MonitorStatus {
                active: true,
                symbols: vec!["EURUSD".to_string()],
                start_time: Some("2025-06-05T09:00:00".to_string()),
            },
        );
        assert!(state.signals_poll_due());
    }

    #[test]
    fn banner_persists_until_cleared() {
        let mut state = DashboardState::new();
        state.set_banner("MT5 not connected");
        assert_eq!(state.banner(), Some("MT5 not connected"));
        state.clear_banner();
        assert!(state.banner().is_none());
    }
}
