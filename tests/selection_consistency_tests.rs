// tests/selection_consistency_tests.rs
//
// Verifies that the watch-list text and the checkbox map stay in agreement
// through every edit path, and that the state container enforces the
// all-or-nothing / stale-discard commit rules.

use monitor_dashboard::errors::ApiError;
use monitor_dashboard::picker::{is_catalog_symbol, SymbolPicker};
use monitor_dashboard::state::{DashboardState, DetailCache};
use monitor_dashboard::types::{
    AnalyzeResponse, ChartResponse, LevelsResponse, MonitorStatus, PriceResponse, SymbolDetail,
};

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
            current_price: Some(1.2345),
            candle_type: Some("bull".to_string()),
            touch_levels: Vec::new(),
            price_levels: Default::default(),
            timestamp: None,
            trade_recommendation: None,
        },
        price: PriceResponse {
            symbol: symbol.to_string(),
            price: Some(1.2345),
            timestamp: None,
        },
    }
}

#[test]
fn toggle_emits_checked_catalog_then_custom() {
    // "EURUSD, GBPUSD, FOO" -> checkboxes for the two catalog symbols only;
    // toggling AUDUSD emits checked-catalog-then-custom.
    let mut picker = SymbolPicker::new("EURUSD, GBPUSD, FOO");

    assert!(picker.is_selected("EURUSD"));
    assert!(picker.is_selected("GBPUSD"));
    assert!(!picker.is_selected("USDCHF"));
    assert!(!is_catalog_symbol("FOO"));

    picker.toggle("AUDUSD");
    assert_eq!(picker.text(), "EURUSD,GBPUSD,AUDUSD,FOO");
}

#[test]
fn membership_agreement_after_mixed_edit_paths() {
    let mut picker = SymbolPicker::new("");

    picker.set_text("USDJPY,BTCUSD,EURUSD");
    picker.toggle("GBPUSD");
    picker.toggle("USDJPY");
    for c in "ETHUSD".chars() {
        picker.push_custom_char(c);
    }
    picker.add_custom();

    // Every catalog token in the text is checked, every checked symbol is in
    // the text, and custom tokens survived all of it.
    let tokens = picker.tokens();
    for token in &tokens {
        if is_catalog_symbol(token) {
            assert!(picker.is_selected(token), "{} should be checked", token);
        }
    }
    assert!(tokens.contains(&"BTCUSD".to_string()));
    assert!(tokens.contains(&"ETHUSD".to_string()));
    assert!(!tokens.contains(&"USDJPY".to_string()));
}

#[test]
fn multiple_custom_tokens_keep_original_order() {
    let mut picker = SymbolPicker::new("FOO,EURUSD,BAR,BAZ");
    picker.toggle("GBPUSD");

    assert_eq!(picker.text(), "EURUSD,GBPUSD,FOO,BAR,BAZ");
}

#[test]
fn detail_commit_is_all_or_nothing() {
    let mut cache = DetailCache::new(8);

    let token = cache.begin("EURUSD");
    assert!(cache.commit("EURUSD", token, detail_for("EURUSD")));

    // A later fetch fails partway: no commit happens, so the earlier entry
    // must still be there, unchanged.
    let _failed_token = cache.begin("EURUSD");
    let cached = cache.peek("EURUSD").expect("entry must survive the failure");
    assert_eq!(cached.analysis.current_price, Some(1.2345));

    // And a response from before the failed attempt cannot sneak in either.
    assert!(!cache.commit("EURUSD", token, detail_for("EURUSD")));
}

#[test]
fn signals_poll_follows_monitor_active() {
    let mut state = DashboardState::new();
    assert!(!state.signals_poll_due());

    let token = state.monitor.begin();
    assert!(state.monitor.commit(
        token,
        MonitorStatus {
            active: true,
            symbols: vec!["EURUSD".to_string(), "GBPUSD".to_string()],
            start_time: Some("2025-06-05T09:00:00".to_string()),
        },
    ));
    assert!(state.signals_poll_due());

    let token = state.monitor.begin();
    assert!(state.monitor.commit(token, MonitorStatus::default()));
    assert!(!state.signals_poll_due());
}

#[test]
fn backend_detail_surfaces_verbatim() {
    let err = ApiError::Backend {
        status: reqwest::StatusCode::BAD_REQUEST,
        detail: "MT5 not connected".to_string(),
    };
    assert_eq!(err.user_message(), "MT5 not connected");
    assert!(!err.is_transport());
}

#[test]
fn slow_refresh_cannot_overwrite_newer_status() {
    let mut state = DashboardState::new();

    // Timer-driven refresh goes out first, then a manual one.
    let timer_token = state.monitor.begin();
    let manual_token = state.monitor.begin();

    // Manual response lands first with the monitor running.
    assert!(state.monitor.commit(
        manual_token,
        MonitorStatus {
            active: true,
            symbols: vec!["EURUSD".to_string()],
            start_time: Some("2025-06-05T09:00:00".to_string()),
        },
    ));

    // The slow timer response (stopped snapshot) arrives afterwards and is
    // discarded instead of clobbering the newer state.
    assert!(!state.monitor.commit(timer_token, MonitorStatus::default()));
    assert!(state.monitor.get().active);
}
