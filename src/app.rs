// src/app.rs - Terminal app state and key-action logic on top of the
// dashboard controller.
use tokio::time::Duration;

use monitor_dashboard::api::ApiClient;
use monitor_dashboard::controller::{Dashboard, DEFAULT_ACCOUNT_SIZE, DEFAULT_RISK_PERCENTAGE};
use monitor_dashboard::picker::{SymbolPicker, CATALOG};

const ACTIVE_TICK: Duration = Duration::from_secs(5);
const IDLE_TICK: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppPage {
    Dashboard,
    SymbolDetail,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    CustomEntry,
}

/// One navigable row in the picker panel: a group header or a checkbox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickerRow {
    Group(usize),
    Symbol(usize, &'static str),
}

pub struct App {
    pub dashboard: Dashboard,
    pub page: AppPage,
    pub input_mode: InputMode,
    pub picker: SymbolPicker,
    pub picker_cursor: usize,
    pub selected_tile: usize,
    pub detail_symbol: Option<String>,
    pub risk_percentage: f64,
    pub account_size: f64,
}

impl App {
    pub fn new() -> Self {
        Self {
            dashboard: Dashboard::new(ApiClient::new()),
            page: AppPage::Dashboard,
            input_mode: InputMode::Normal,
            picker: SymbolPicker::new("EURUSD,GBPUSD,XAUUSD"),
            picker_cursor: 0,
            selected_tile: 0,
            detail_symbol: None,
            risk_percentage: DEFAULT_RISK_PERCENTAGE,
            account_size: DEFAULT_ACCOUNT_SIZE,
        }
    }

    /// Poll cadence for the refresh timer; faster while the monitor is
    /// active. The run loop re-reads this every iteration, so the timer is
    /// effectively re-armed whenever the active flag flips.
    pub fn tick_rate(&self) -> Duration {
        if self.dashboard.state.monitor.get().active {
            ACTIVE_TICK
        } else {
            IDLE_TICK
        }
    }

    pub async fn update_data(&mut self) {
        self.dashboard.refresh().await;
        self.clamp_tile_selection();
    }

    fn clamp_tile_selection(&mut self) {
        let count = self.dashboard.state.monitor.get().symbols.len();
        if count == 0 {
            self.selected_tile = 0;
        } else if self.selected_tile >= count {
            self.selected_tile = count - 1;
        }
    }

    pub fn switch_page(&mut self, page: AppPage) {
        self.page = page;
    }

    // --- symbol tiles ---

    pub fn selected_symbol(&self) -> Option<String> {
        self.dashboard
            .state
            .monitor
            .get()
            .symbols
            .get(self.selected_tile)
            .cloned()
    }

    pub fn select_next_tile(&mut self) {
        let count = self.dashboard.state.monitor.get().symbols.len();
        if count > 0 {
            self.selected_tile = (self.selected_tile + 1) % count;
        }
    }

    pub fn select_previous_tile(&mut self) {
        let count = self.dashboard.state.monitor.get().symbols.len();
        if count > 0 {
            self.selected_tile = (self.selected_tile + count - 1) % count;
        }
    }

    /// Fetches chart/levels/analysis/price for the selected tile and switches
    /// to the detail page. The page shows whatever the cache holds, so a
    /// failed fetch still lands on the last good snapshot if there is one.
    pub async fn open_detail(&mut self) {
        let Some(symbol) = self.selected_symbol() else {
            return;
        };
        self.dashboard
            .fetch_symbol_detail(&symbol, self.risk_percentage, self.account_size)
            .await;
        self.detail_symbol = Some(symbol);
        self.page = AppPage::SymbolDetail;
    }

    // --- monitor start/stop ---

    pub async fn start_monitoring(&mut self) {
        let symbols = self.picker.tokens();
        if symbols.is_empty() {
            self.dashboard
                .state
                .set_banner("Select at least one symbol to monitor");
            return;
        }
        self.dashboard
            .start_monitoring(symbols, self.risk_percentage, self.account_size)
            .await;
    }

    pub async fn stop_monitoring(&mut self) {
        self.dashboard.stop_monitoring().await;
    }

    // --- picker navigation ---

    pub fn picker_rows(&self) -> Vec<PickerRow> {
        let mut rows = Vec::new();
        for (group_index, group) in CATALOG.iter().enumerate() {
            rows.push(PickerRow::Group(group_index));
            if self.picker.is_group_expanded(group_index) {
                for symbol in group.symbols {
                    rows.push(PickerRow::Symbol(group_index, symbol));
                }
            }
        }
        rows
    }

    pub fn picker_cursor_row(&self) -> Option<PickerRow> {
        self.picker_rows().get(self.picker_cursor).copied()
    }

    pub fn picker_up(&mut self) {
        let len = self.picker_rows().len();
        if len > 0 {
            self.picker_cursor = (self.picker_cursor + len - 1) % len;
        }
    }

    pub fn picker_down(&mut self) {
        let len = self.picker_rows().len();
        if len > 0 {
            self.picker_cursor = (self.picker_cursor + 1) % len;
        }
    }

    /// Space on a checkbox row toggles the symbol; on a header row it
    /// collapses or expands the group.
    pub fn picker_activate(&mut self) {
        match self.picker_cursor_row() {
            Some(PickerRow::Group(group_index)) => {
                self.picker.toggle_group(group_index);
                let len = self.picker_rows().len();
                if self.picker_cursor >= len && len > 0 {
                    self.picker_cursor = len - 1;
                }
            }
            Some(PickerRow::Symbol(_, symbol)) => self.picker.toggle(symbol),
            None => {}
        }
    }

    // --- custom-symbol entry ---

    pub fn enter_custom_mode(&mut self) {
        self.input_mode = InputMode::CustomEntry;
    }

    pub fn handle_custom_char(&mut self, c: char) {
        self.picker.push_custom_char(c);
    }

    pub fn custom_backspace(&mut self) {
        self.picker.pop_custom_char();
    }

    pub fn commit_custom(&mut self) {
        self.picker.add_custom();
        self.input_mode = InputMode::Normal;
    }

    pub fn cancel_custom(&mut self) {
        self.picker.cancel_custom_entry();
        self.input_mode = InputMode::Normal;
    }
}
