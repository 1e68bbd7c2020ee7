// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;

use crate::{
    ExportOutcome, InputRow, ProjectionItem, Reconciliation, RowField, RowId, RowStore, TabId,
    reconcile, recompute,
};

pub const DEFAULT_TAB_COUNT: u32 = 5;
pub const MAX_TAB_COUNT: u32 = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: TabId,
    pub label: String,
    store: RowStore,
    projection: Vec<ProjectionItem>,
}

impl Tab {
    pub fn new(id: TabId) -> Self {
        Self {
            id,
            label: format!("page {id}"),
            store: RowStore::new(),
            projection: Vec::new(),
        }
    }

    pub fn rows(&self) -> &[InputRow] {
        self.store.list()
    }

    pub fn store(&self) -> &RowStore {
        &self.store
    }

    pub fn projection(&self) -> &[ProjectionItem] {
        &self.projection
    }

    pub fn edit(&mut self, row: RowId, field: RowField, raw: &str) -> Reconciliation {
        self.store.update(row, field, raw);
        self.refresh()
    }

    pub fn refresh(&mut self) -> Reconciliation {
        let outcome = reconcile(&mut self.store);
        self.projection = recompute(&outcome.entries);
        outcome
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    tabs: BTreeMap<TabId, Tab>,
    pub active_tab: TabId,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_tab_count(DEFAULT_TAB_COUNT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    EditField {
        tab: TabId,
        row: RowId,
        field: RowField,
        raw: String,
    },
    ActivateTab(TabId),
    NextTab,
    PrevTab,
    RecordExport(ExportOutcome),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    TabChanged(TabId),
    RowAppended { tab: TabId, row: RowId },
    RowsChanged { tab: TabId, rows: Vec<InputRow> },
    ProjectionChanged {
        tab: TabId,
        items: Vec<ProjectionItem>,
    },
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    /// Tabs are numbered from 1; the count is clamped to `1..=MAX_TAB_COUNT`.
    pub fn with_tab_count(count: u32) -> Self {
        let count = count.clamp(1, MAX_TAB_COUNT);
        let tabs = (1..=count)
            .map(|index| {
                let id = TabId::new(index);
                (id, Tab::new(id))
            })
            .collect();
        Self {
            tabs,
            active_tab: TabId::new(1),
            status_line: None,
        }
    }

    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.get(&id)
    }

    pub fn tabs(&self) -> impl Iterator<Item = &Tab> {
        self.tabs.values()
    }

    pub fn tab_ids(&self) -> Vec<TabId> {
        self.tabs.keys().copied().collect()
    }

    pub fn active(&self) -> Option<&Tab> {
        self.tabs.get(&self.active_tab)
    }

    pub fn rows(&self, id: TabId) -> &[InputRow] {
        self.tabs.get(&id).map(Tab::rows).unwrap_or_default()
    }

    pub fn projection(&self, id: TabId) -> &[ProjectionItem] {
        self.tabs.get(&id).map(Tab::projection).unwrap_or_default()
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::EditField {
                tab,
                row,
                field,
                raw,
            } => {
                let Some(target) = self.tabs.get_mut(&tab) else {
                    return Vec::new();
                };
                let outcome = target.edit(row, field, &raw);
                refresh_events(target, outcome)
            }
            AppCommand::ActivateTab(tab) => self.activate(tab),
            AppCommand::NextTab => self.rotate_tab(1),
            AppCommand::PrevTab => self.rotate_tab(-1),
            AppCommand::RecordExport(outcome) => vec![self.set_status(&outcome.message())],
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn activate(&mut self, tab: TabId) -> Vec<AppEvent> {
        let Some(target) = self.tabs.get_mut(&tab) else {
            return Vec::new();
        };
        self.active_tab = tab;
        let outcome = target.refresh();
        tracing::debug!(tab = %tab, "tab activated");

        let mut events = vec![AppEvent::TabChanged(tab)];
        events.extend(refresh_events(target, outcome));
        events
    }

    fn rotate_tab(&mut self, delta: isize) -> Vec<AppEvent> {
        let tabs = self.tab_ids();
        if tabs.is_empty() {
            return Vec::new();
        }
        let current = tabs
            .iter()
            .position(|tab| *tab == self.active_tab)
            .unwrap_or(0) as isize;
        let len = tabs.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.activate(tabs[next])
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}

fn refresh_events(tab: &Tab, outcome: Reconciliation) -> Vec<AppEvent> {
    let mut events = Vec::with_capacity(4);
    if let Some(row) = outcome.appended {
        events.push(AppEvent::RowAppended { tab: tab.id, row });
    }
    events.push(AppEvent::RowsChanged {
        tab: tab.id,
        rows: tab.rows().to_vec(),
    });
    events.push(AppEvent::ProjectionChanged {
        tab: tab.id,
        items: tab.projection().to_vec(),
    });
    events
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, AppState, MAX_TAB_COUNT};
    use crate::{ExportOutcome, ProjectionItem, RowField, RowId, TabId};

    fn edit(state: &mut AppState, tab: u32, row: u32, field: RowField, raw: &str) -> Vec<AppEvent> {
        state.dispatch(AppCommand::EditField {
            tab: TabId::new(tab),
            row: RowId::new(row),
            field,
            raw: raw.to_owned(),
        })
    }

    #[test]
    fn default_state_has_five_single_row_tabs() {
        let state = AppState::default();
        assert_eq!(state.tab_ids().len(), 5);
        assert_eq!(state.active_tab, TabId::new(1));
        for tab in state.tabs() {
            assert_eq!(tab.rows().len(), 1);
            assert!(tab.projection().is_empty());
        }
        assert_eq!(
            state.tab(TabId::new(3)).map(|tab| tab.label.as_str()),
            Some("page 3")
        );
    }

    #[test]
    fn tab_count_is_clamped() {
        assert_eq!(AppState::with_tab_count(0).tab_ids().len(), 1);
        assert_eq!(
            AppState::with_tab_count(40).tab_ids().len(),
            MAX_TAB_COUNT as usize
        );
    }

    #[test]
    fn completing_a_row_appends_and_publishes_projection() {
        let mut state = AppState::default();
        edit(&mut state, 1, 1, RowField::Name, "A");
        let events = edit(&mut state, 1, 1, RowField::Seconds, "5");

        assert!(events.contains(&AppEvent::RowAppended {
            tab: TabId::new(1),
            row: RowId::new(2),
        }));
        assert!(events.contains(&AppEvent::ProjectionChanged {
            tab: TabId::new(1),
            items: vec![ProjectionItem::new("A", "00")],
        }));
        assert_eq!(state.rows(TabId::new(1)).len(), 2);
    }

    #[test]
    fn tabs_are_independent() {
        let mut state = AppState::default();
        edit(&mut state, 2, 1, RowField::Name, "B");
        edit(&mut state, 2, 1, RowField::Seconds, "9");

        assert_eq!(state.rows(TabId::new(2)).len(), 2);
        assert_eq!(state.rows(TabId::new(1)).len(), 1);
        assert!(state.projection(TabId::new(1)).is_empty());
        assert_eq!(state.active_tab, TabId::new(1));
    }

    #[test]
    fn edits_to_unknown_tabs_are_ignored() {
        let mut state = AppState::default();
        let before = state.clone();
        let events = edit(&mut state, 77, 1, RowField::Name, "x");
        assert!(events.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn tab_rotation_wraps() {
        let mut state = AppState::with_tab_count(3);
        state.dispatch(AppCommand::PrevTab);
        assert_eq!(state.active_tab, TabId::new(3));

        let events = state.dispatch(AppCommand::NextTab);
        assert_eq!(state.active_tab, TabId::new(1));
        assert_eq!(events.first(), Some(&AppEvent::TabChanged(TabId::new(1))));
    }

    #[test]
    fn activating_a_tab_republishes_only_that_tab() {
        let mut state = AppState::default();
        edit(&mut state, 1, 1, RowField::Name, "A");
        edit(&mut state, 1, 1, RowField::Seconds, "5");

        let events = state.dispatch(AppCommand::ActivateTab(TabId::new(4)));
        assert_eq!(state.active_tab, TabId::new(4));
        assert!(events.iter().all(|event| match event {
            AppEvent::RowsChanged { tab, .. } | AppEvent::ProjectionChanged { tab, .. } => {
                *tab == TabId::new(4)
            }
            _ => true,
        }));
        assert!(state.dispatch(AppCommand::ActivateTab(TabId::new(99))).is_empty());
        assert_eq!(state.active_tab, TabId::new(4));
    }

    #[test]
    fn export_outcome_sets_status() {
        let mut state = AppState::default();
        let events = state.dispatch(AppCommand::RecordExport(ExportOutcome::NothingToCopy));
        assert_eq!(state.status_line.as_deref(), Some("nothing to copy"));
        assert_eq!(
            events,
            vec![AppEvent::StatusUpdated("nothing to copy".to_owned())]
        );

        let cleared = state.dispatch(AppCommand::ClearStatus);
        assert_eq!(state.status_line, None);
        assert_eq!(cleared, vec![AppEvent::StatusCleared]);
    }
}
