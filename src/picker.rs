// src/picker.rs - Symbol watch-list picker: a grouped checkbox catalog
// reconciled against a free-text comma-separated value.
use std::collections::HashMap;

pub struct SymbolGroup {
    pub name: &'static str,
    pub symbols: &'static [&'static str],
}

/// The fixed instrument catalog offered as checkboxes, partitioned into the
/// groups the dashboard shows. Symbols outside the catalog are still valid
/// watch-list entries; they just have no checkbox.
pub const CATALOG: &[SymbolGroup] = &[
    SymbolGroup {
        name: "Majors",
        symbols: &["EURUSD", "GBPUSD", "AUDUSD", "NZDUSD", "USDCAD", "USDCHF"],
    },
    SymbolGroup {
        name: "Crosses",
        symbols: &[
            "EURGBP", "EURAUD", "EURNZD", "EURCHF", "EURCAD", "GBPAUD", "GBPCAD", "GBPCHF",
            "GBPNZD", "AUDCAD", "AUDCHF", "AUDNZD", "CADCHF", "NZDCAD", "NZDCHF",
        ],
    },
    SymbolGroup {
        name: "JPY Pairs",
        symbols: &["USDJPY", "EURJPY", "GBPJPY", "AUDJPY", "NZDJPY", "CADJPY", "CHFJPY"],
    },
    SymbolGroup {
        name: "Metals & Indices",
        symbols: &["XAUUSD", "NAS100", "US500"],
    },
];

pub fn is_catalog_symbol(symbol: &str) -> bool {
    CATALOG
        .iter()
        .any(|group| group.symbols.contains(&symbol))
}

fn catalog_symbols() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().flat_map(|group| group.symbols.iter().copied())
}

/// The picker widget state. The free-text value is the single source of
/// truth for what is monitored; the checkbox map is derived from it and kept
/// in agreement through every edit path. Non-catalog ("custom") tokens live
/// only in the text and survive checkbox edits untouched.
pub struct SymbolPicker {
    text: String,
    selected: HashMap<&'static str, bool>,
    custom_entry: String,
    expanded: Vec<bool>,
}

impl SymbolPicker {
    /// One-way initial sync from the incoming text. Later external changes to
    /// that value are not re-applied; all further edits go through the picker.
    pub fn new(initial_text: &str) -> Self {
        let mut picker = Self {
            text: initial_text.to_string(),
            selected: catalog_symbols().map(|s| (s, false)).collect(),
            custom_entry: String::new(),
            expanded: vec![true; CATALOG.len()],
        };
        picker.derive_checkboxes();
        picker
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_selected(&self, symbol: &str) -> bool {
        self.selected.get(symbol).copied().unwrap_or(false)
    }

    /// Current watch-list: the text split on commas, trimmed, empties dropped.
    pub fn tokens(&self) -> Vec<String> {
        Self::split_tokens(&self.text)
    }

    fn split_tokens(text: &str) -> Vec<String> {
        text.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    }

    /// Free-text edit path: replace the text and re-derive every checkbox
    /// from token membership.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.derive_checkboxes();
    }

    fn derive_checkboxes(&mut self) {
        let tokens = self.tokens();
        for (symbol, checked) in self.selected.iter_mut() {
            *checked = tokens.iter().any(|t| t == symbol);
        }
    }

    /// Checkbox edit path: flip one catalog symbol, then rebuild the text as
    /// checked catalog symbols (catalog order) followed by every non-catalog
    /// token of the prior text in its original order.
    pub fn toggle(&mut self, symbol: &str) {
        let Some(entry) = catalog_symbols().find(|s| *s == symbol) else {
            return;
        };
        let checked = !self.is_selected(entry);
        self.selected.insert(entry, checked);
        self.rebuild_text();
    }

    fn rebuild_text(&mut self) {
        let customs: Vec<String> = self
            .tokens()
            .into_iter()
            .filter(|t| !is_catalog_symbol(t))
            .collect();
        let mut parts: Vec<String> = catalog_symbols()
            .filter(|s| self.is_selected(s))
            .map(String::from)
            .collect();
        parts.extend(customs);
        self.text = parts.join(",");
    }

    // --- custom-symbol entry buffer ---

    pub fn custom_entry(&self) -> &str {
        &self.custom_entry
    }

    /// Characters are upper-cased at entry time; nothing else enforces case.
    pub fn push_custom_char(&mut self, c: char) {
        if !c.is_whitespace() && c != ',' {
            self.custom_entry.push(c.to_ascii_uppercase());
        }
    }

    pub fn pop_custom_char(&mut self) {
        self.custom_entry.pop();
    }

    pub fn cancel_custom_entry(&mut self) {
        self.custom_entry.clear();
    }

    /// Commits the pending custom entry: appended to the text only if not
    /// already present (case-sensitive exact match). A catalog symbol entered
    /// here also gets its checkbox set.
    pub fn add_custom(&mut self) {
        let entry = std::mem::take(&mut self.custom_entry);
        if entry.is_empty() {
            return;
        }
        if self.tokens().iter().any(|t| *t == entry) {
            return;
        }
        if self.text.trim().is_empty() {
            self.text = entry.clone();
        } else {
            self.text = format!(
                "{},{}",
                self.text.trim_end_matches(|c: char| c == ',' || c == ' '),
                entry
            );
        }
        if let Some(symbol) = catalog_symbols().find(|s| *s == entry) {
            self.selected.insert(symbol, true);
        }
    }

    // --- group expand/collapse ---

    pub fn is_group_expanded(&self, group_index: usize) -> bool {
        self.expanded.get(group_index).copied().unwrap_or(true)
    }

    pub fn toggle_group(&mut self, group_index: usize) {
        if let Some(flag) = self.expanded.get_mut(group_index) {
            *flag = !*flag;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_from_text_is_idempotent() {
        let mut picker = SymbolPicker::new("EURUSD, GBPUSD, FOO");
        let first: Vec<bool> = catalog_symbols().map(|s| picker.is_selected(s)).collect();

        // Re-applying the same text must not change the map.
        let text = picker.text().to_string();
        picker.set_text(text);
        let second: Vec<bool> = catalog_symbols().map(|s| picker.is_selected(s)).collect();

        assert_eq!(first, second);
        assert!(picker.is_selected("EURUSD"));
        assert!(picker.is_selected("GBPUSD"));
        assert!(!picker.is_selected("AUDUSD"));
    }

    #[test]
    fn toggle_preserves_custom_tokens_in_order() {
        let mut picker = SymbolPicker::new("EURUSD, GBPUSD, FOO");
        picker.toggle("AUDUSD");

        assert_eq!(picker.text(), "EURUSD,GBPUSD,AUDUSD,FOO");
        assert!(picker.is_selected("AUDUSD"));
    }

    #[test]
    fn toggle_off_keeps_remaining_selection_and_customs() {
        let mut picker = SymbolPicker::new("EURUSD,GBPUSD,FOO,BAR");
        picker.toggle("EURUSD");

        assert_eq!(picker.text(), "GBPUSD,FOO,BAR");
        assert!(!picker.is_selected("EURUSD"));
    }

    #[test]
    fn duplicate_custom_add_is_a_no_op() {
        let mut picker = SymbolPicker::new("EURUSD,FOO");
        for c in "FOO".chars() {
            picker.push_custom_char(c);
        }
        picker.add_custom();

        assert_eq!(picker.text(), "EURUSD,FOO");
    }

    #[test]
    fn custom_add_is_case_sensitive_exact_match() {
        // "foo" already in the text does not block adding "FOO".
        let mut picker = SymbolPicker::new("foo");
        for c in "FOO".chars() {
            picker.push_custom_char(c);
        }
        picker.add_custom();

        assert_eq!(picker.text(), "foo,FOO");
    }

    #[test]
    fn custom_entry_uppercases_at_input_time() {
        let mut picker = SymbolPicker::new("");
        for c in "btcusd".chars() {
            picker.push_custom_char(c);
        }
        assert_eq!(picker.custom_entry(), "BTCUSD");

        picker.add_custom();
        assert_eq!(picker.text(), "BTCUSD");
        assert!(picker.custom_entry().is_empty());
    }

    #[test]
    fn custom_add_of_catalog_symbol_sets_checkbox() {
        let mut picker = SymbolPicker::new("EURUSD");
        for c in "XAUUSD".chars() {
            picker.push_custom_char(c);
        }
        picker.add_custom();

        assert!(picker.is_selected("XAUUSD"));
        assert_eq!(picker.tokens(), vec!["EURUSD", "XAUUSD"]);
    }

    #[test]
    fn free_text_edit_redrives_checkboxes() {
        let mut picker = SymbolPicker::new("EURUSD");
        assert!(picker.is_selected("EURUSD"));

        picker.set_text("GBPUSD , USDJPY,,");
        assert!(!picker.is_selected("EURUSD"));
        assert!(picker.is_selected("GBPUSD"));
        assert!(picker.is_selected("USDJPY"));
        assert_eq!(picker.tokens(), vec!["GBPUSD", "USDJPY"]);
    }

    #[test]
    fn groups_start_expanded_and_toggle() {
        let mut picker = SymbolPicker::new("");
        for i in 0..CATALOG.len() {
            assert!(picker.is_group_expanded(i));
        }
        picker.toggle_group(1);
        assert!(!picker.is_group_expanded(1));
        picker.toggle_group(1);
        assert!(picker.is_group_expanded(1));
    }
}
