// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use headstart_app::{
    AppCommand, AppState, Entry, ProjectionItem, RowField, RowId, RowStore, TabId, export_text,
    reconcile, recompute,
};
use headstart_testkit::{EditFaker, apply_script, apply_step, check_row_invariants, fill_tab};

#[test]
fn random_edit_scripts_keep_row_invariants() -> Result<()> {
    for seed in 1..=40 {
        let mut state = AppState::default();
        let mut faker = EditFaker::new(seed);
        for _ in 0..150 {
            let step = faker.step(5);
            apply_step(&mut state, &step);
            check_row_invariants(state.rows(step.tab))
                .map_err(|error| error.context(format!("seed {seed}, step {step:?}")))?;
        }
    }
    Ok(())
}

#[test]
fn projection_always_matches_entries_of_current_rows() {
    for seed in 1..=20 {
        let mut state = AppState::default();
        apply_script(&mut state, &EditFaker::new(seed).script(5, 120));
        for tab in state.tabs() {
            let entries = tab
                .rows()
                .iter()
                .filter_map(|row| row.entry())
                .collect::<Vec<_>>();
            assert_eq!(tab.projection(), recompute(&entries).as_slice(), "seed {seed}");
            assert_eq!(tab.projection().is_empty(), entries.is_empty());
        }
    }
}

#[test]
fn reactivating_a_tab_is_idempotent() {
    for seed in 1..=20 {
        let mut state = AppState::default();
        apply_script(&mut state, &EditFaker::new(seed).script(5, 80));
        let tab = TabId::new(2);

        state.dispatch(AppCommand::ActivateTab(tab));
        let first = state.tab(tab).cloned();
        state.dispatch(AppCommand::ActivateTab(tab));
        assert_eq!(state.tab(tab).cloned(), first, "seed {seed}");
    }
}

#[test]
fn edits_never_leak_into_other_tabs() {
    let mut state = AppState::default();
    let untouched = state.tab(TabId::new(5)).cloned();
    let script = EditFaker::new(99).script(4, 200);
    apply_script(&mut state, &script);
    assert_eq!(state.tab(TabId::new(5)).cloned(), untouched);
}

#[test]
fn auto_grow_from_a_fresh_tab() -> Result<()> {
    let mut state = AppState::default();
    fill_tab(&mut state, TabId::new(1), &[("A", "5")])?;

    let rows = state.rows(TabId::new(1));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.iter().filter(|row| row.entry().is_some()).count(), 1);
    assert!(rows[1].is_blank());
    Ok(())
}

#[test]
fn auto_prune_keeps_only_the_trailing_blank() {
    let mut store = RowStore::new();
    store.append();
    store.append();
    store.update(RowId::new(1), RowField::Name, "A");
    store.update(RowId::new(1), RowField::Seconds, "5");

    let outcome = reconcile(&mut store);
    assert_eq!(outcome.entries, vec![Entry::new("A", 5)]);
    let ids = store.list().iter().map(|row| row.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![RowId::new(1), RowId::new(3)]);
}

#[test]
fn copied_text_for_a_filled_tab() -> Result<()> {
    let mut state = AppState::default();
    fill_tab(
        &mut state,
        TabId::new(3),
        &[("A", "5"), ("B", "5"), ("C", "10")],
    )?;

    assert_eq!(
        state.projection(TabId::new(3)),
        &[
            ProjectionItem::new("C", "00"),
            ProjectionItem::new("A", "05"),
            ProjectionItem::new("B", "05"),
        ]
    );
    assert_eq!(
        export_text(state.projection(TabId::new(3))).as_deref(),
        Some("C :00\nA :05\nB :05")
    );
    Ok(())
}
