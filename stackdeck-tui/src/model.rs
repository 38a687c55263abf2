use crate::decoder::Key;
use std::collections::BTreeSet;
use unicode_segmentation::UnicodeSegmentation;

/// One selectable row. `original_index` is the stable key into the full
/// unfiltered list; selections are stored against it so filtering can never
/// lose or misattribute them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectItem {
    pub label: String,
    pub value: String,
    pub original_index: usize,
}

impl SelectItem {
    pub fn new(label: impl Into<String>, value: impl Into<String>, original_index: usize) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            original_index,
        }
    }

    /// Case-insensitive substring match against label or value.
    fn matches(&self, query_lower: &str) -> bool {
        query_lower.is_empty()
            || self.label.to_lowercase().contains(query_lower)
            || self.value.to_lowercase().contains(query_lower)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    Single,
    Multi,
}

/// How a session ended. `Confirmed` carries the chosen values: at most one in
/// single mode (none when the filtered view was empty), the checked subset in
/// original-list order in multi mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Confirmed(Vec<String>),
    Cancelled,
    Interrupted,
}

/// The one selection engine, parameterized by mode. State lives for a single
/// session and is discarded on confirm or cancel.
#[derive(Debug)]
pub struct SelectList {
    mode: SelectMode,
    items: Vec<SelectItem>,
    query: String,
    /// Positions into `items` currently visible, in list order.
    filtered: Vec<usize>,
    /// Cursor position within `filtered`; meaningless when `filtered` is empty.
    cursor: usize,
    /// Selected `original_index` values. Untouched by filtering.
    selected: BTreeSet<usize>,
}

impl SelectList {
    pub fn new(items: Vec<SelectItem>, mode: SelectMode) -> Self {
        let filtered = (0..items.len()).collect();
        Self {
            mode,
            items,
            query: String::new(),
            filtered,
            cursor: 0,
            selected: BTreeSet::new(),
        }
    }

    pub fn mode(&self) -> SelectMode {
        self.mode
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Visible rows in order: (item, under cursor, checked).
    pub fn visible_rows(&self) -> impl Iterator<Item = (&SelectItem, bool, bool)> {
        self.filtered.iter().enumerate().map(|(row, &item_idx)| {
            let item = &self.items[item_idx];
            (
                item,
                row == self.cursor,
                self.selected.contains(&item.original_index),
            )
        })
    }

    /// Apply one key event. Returns the outcome when the event ends the
    /// session.
    pub fn handle_key(&mut self, key: Key) -> Option<Outcome> {
        match key {
            Key::Printable(c) => {
                self.query.push(c);
                self.refilter();
                None
            }
            Key::Backspace => {
                self.pop_query_grapheme();
                self.refilter();
                None
            }
            Key::MoveUp => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            Key::MoveDown => {
                if !self.filtered.is_empty() && self.cursor + 1 < self.filtered.len() {
                    self.cursor += 1;
                }
                None
            }
            Key::ToggleSelect => {
                self.toggle_under_cursor();
                None
            }
            Key::Confirm => Some(Outcome::Confirmed(self.confirmed_values())),
            Key::Interrupt => Some(Outcome::Interrupted),
            Key::Unrecognized => None,
        }
    }

    /// Recompute the view from the full list. The cursor clamps into the new
    /// view; the selected set is deliberately untouched, so items hidden by
    /// the query stay selected and reappear checked when it clears.
    fn refilter(&mut self) {
        let query_lower = self.query.to_lowercase();
        self.filtered = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.matches(&query_lower))
            .map(|(idx, _)| idx)
            .collect();

        if self.cursor >= self.filtered.len() {
            self.cursor = self.filtered.len().saturating_sub(1);
        }
    }

    fn pop_query_grapheme(&mut self) {
        if let Some((offset, _)) = self.query.grapheme_indices(true).next_back() {
            self.query.truncate(offset);
        }
    }

    fn toggle_under_cursor(&mut self) {
        if self.mode != SelectMode::Multi {
            return;
        }
        let Some(&item_idx) = self.filtered.get(self.cursor) else {
            return;
        };
        let original = self.items[item_idx].original_index;
        if !self.selected.remove(&original) {
            self.selected.insert(original);
        }
    }

    fn confirmed_values(&self) -> Vec<String> {
        match self.mode {
            SelectMode::Single => self
                .filtered
                .get(self.cursor)
                .map(|&item_idx| self.items[item_idx].value.clone())
                .into_iter()
                .collect(),
            // Original-list order, never selection order.
            SelectMode::Multi => self
                .items
                .iter()
                .filter(|item| self.selected.contains(&item.original_index))
                .map(|item| item.value.clone())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(labels: &[&str]) -> Vec<SelectItem> {
        labels
            .iter()
            .enumerate()
            .map(|(i, label)| SelectItem::new(*label, format!("value-{label}"), i))
            .collect()
    }

    fn type_str(list: &mut SelectList, s: &str) {
        for c in s.chars() {
            assert_eq!(list.handle_key(Key::Printable(c)), None);
        }
    }

    #[test]
    fn filter_matches_label_or_value_case_insensitively() {
        let mut list = SelectList::new(
            vec![
                SelectItem::new("Alpha", "cf-alpha", 0),
                SelectItem::new("Child", "cf-child", 1),
                SelectItem::new("Other", "CF-CHILDISH", 2),
            ],
            SelectMode::Multi,
        );

        type_str(&mut list, "CHI");
        let visible: Vec<&str> = list.visible_rows().map(|(item, _, _)| item.label.as_str()).collect();
        assert_eq!(visible, ["Child", "Other"]);
    }

    #[test]
    fn query_chi_filters_to_child_and_resets_cursor() {
        let mut list = SelectList::new(items(&["Alpha", "Child", "Other"]), SelectMode::Single);
        list.handle_key(Key::MoveDown);
        list.handle_key(Key::MoveDown);
        assert_eq!(list.cursor(), 2);

        type_str(&mut list, "chi");

        let visible: Vec<&str> = list.visible_rows().map(|(item, _, _)| item.label.as_str()).collect();
        assert_eq!(visible, ["Child"]);
        assert_eq!(list.cursor(), 0);
    }

    #[test]
    fn empty_query_matches_everything() {
        let mut list = SelectList::new(items(&["A", "B"]), SelectMode::Single);
        type_str(&mut list, "a");
        list.handle_key(Key::Backspace);
        assert_eq!(list.filtered_len(), 2);
    }

    #[test]
    fn cursor_clamps_at_both_ends_without_wrapping() {
        let mut list = SelectList::new(items(&["A", "B", "C"]), SelectMode::Single);
        list.handle_key(Key::MoveUp);
        assert_eq!(list.cursor(), 0);

        for _ in 0..10 {
            list.handle_key(Key::MoveDown);
        }
        assert_eq!(list.cursor(), 2);
    }

    #[test]
    fn double_toggle_is_identity() {
        let mut list = SelectList::new(items(&["A", "B"]), SelectMode::Multi);
        list.handle_key(Key::ToggleSelect);
        assert_eq!(list.selected_count(), 1);
        list.handle_key(Key::ToggleSelect);
        assert_eq!(list.selected_count(), 0);
    }

    #[test]
    fn toggle_is_keyed_by_original_index_under_any_filter() {
        let mut list = SelectList::new(items(&["Alpha", "Beta", "Gamma"]), SelectMode::Multi);

        // Narrow to Gamma, toggle it, clear the filter.
        type_str(&mut list, "gam");
        list.handle_key(Key::ToggleSelect);
        for _ in 0.."gam".len() {
            list.handle_key(Key::Backspace);
        }

        let checked: Vec<&str> = list
            .visible_rows()
            .filter(|(_, _, checked)| *checked)
            .map(|(item, _, _)| item.label.as_str())
            .collect();
        assert_eq!(checked, ["Gamma"]);
    }

    #[test]
    fn hidden_selection_survives_a_narrowed_filter() {
        let mut list = SelectList::new(items(&["Alpha", "Beta", "Gamma"]), SelectMode::Multi);

        // Select original indices 0 and 2.
        list.handle_key(Key::ToggleSelect);
        list.handle_key(Key::MoveDown);
        list.handle_key(Key::MoveDown);
        list.handle_key(Key::ToggleSelect);

        // Narrow the filter to exclude Gamma (original index 2).
        type_str(&mut list, "alph");
        assert_eq!(list.filtered_len(), 1);
        assert_eq!(list.selected_count(), 2);

        // Clearing the filter shows Gamma still checked.
        for _ in 0.."alph".len() {
            list.handle_key(Key::Backspace);
        }
        let checked: Vec<usize> = list
            .visible_rows()
            .filter(|(_, _, checked)| *checked)
            .map(|(item, _, _)| item.original_index)
            .collect();
        assert_eq!(checked, [0, 2]);
    }

    #[test]
    fn cursor_stays_in_bounds_when_the_view_shrinks() {
        let mut list = SelectList::new(items(&["Alpha", "Beta", "Gamma"]), SelectMode::Single);
        list.handle_key(Key::MoveDown);
        list.handle_key(Key::MoveDown);
        assert_eq!(list.cursor(), 2);

        type_str(&mut list, "beta");
        assert_eq!(list.filtered_len(), 1);
        assert_eq!(list.cursor(), 0);
    }

    #[test]
    fn single_confirm_yields_the_item_under_the_cursor() {
        let mut list = SelectList::new(items(&["A", "B", "C"]), SelectMode::Single);
        list.handle_key(Key::MoveDown);
        let outcome = list.handle_key(Key::Confirm).unwrap();
        assert_eq!(outcome, Outcome::Confirmed(vec!["value-B".to_string()]));
    }

    #[test]
    fn single_confirm_on_empty_view_yields_nothing() {
        let mut list = SelectList::new(items(&["A", "B"]), SelectMode::Single);
        type_str(&mut list, "zzz");
        assert_eq!(list.filtered_len(), 0);
        let outcome = list.handle_key(Key::Confirm).unwrap();
        assert_eq!(outcome, Outcome::Confirmed(Vec::new()));
    }

    #[test]
    fn multi_confirm_returns_original_list_order_not_selection_order() {
        let mut list = SelectList::new(items(&["A", "B", "C"]), SelectMode::Multi);
        // Select C first, then A.
        list.handle_key(Key::MoveDown);
        list.handle_key(Key::MoveDown);
        list.handle_key(Key::ToggleSelect);
        list.handle_key(Key::MoveUp);
        list.handle_key(Key::MoveUp);
        list.handle_key(Key::ToggleSelect);

        let outcome = list.handle_key(Key::Confirm).unwrap();
        assert_eq!(
            outcome,
            Outcome::Confirmed(vec!["value-A".to_string(), "value-C".to_string()])
        );
    }

    #[test]
    fn toggle_is_a_noop_in_single_mode_and_on_an_empty_view() {
        let mut list = SelectList::new(items(&["A"]), SelectMode::Single);
        list.handle_key(Key::ToggleSelect);
        assert_eq!(list.selected_count(), 0);

        let mut list = SelectList::new(items(&["A"]), SelectMode::Multi);
        type_str(&mut list, "zzz");
        list.handle_key(Key::ToggleSelect);
        assert_eq!(list.selected_count(), 0);
    }

    #[test]
    fn backspace_removes_one_grapheme() {
        let mut list = SelectList::new(items(&["A"]), SelectMode::Single);
        type_str(&mut list, "ab");
        list.handle_key(Key::Printable('é'));
        list.handle_key(Key::Backspace);
        assert_eq!(list.query(), "ab");
    }

    #[test]
    fn interrupt_and_unrecognized_behave_per_contract() {
        let mut list = SelectList::new(items(&["A"]), SelectMode::Single);
        assert_eq!(list.handle_key(Key::Unrecognized), None);
        assert_eq!(list.handle_key(Key::Interrupt), Some(Outcome::Interrupted));
    }
}
