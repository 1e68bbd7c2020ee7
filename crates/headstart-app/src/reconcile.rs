// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Entry, InputRow, RowId, RowStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowClass {
    Entry(Entry),
    BlankRemovable,
    /// Partially filled or invalid; left alone so typing is never interrupted.
    Pending,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub removed: Vec<RowId>,
    pub appended: Option<RowId>,
    pub entries: Vec<Entry>,
}

pub fn classify(rows: &[InputRow]) -> Vec<RowClass> {
    let count = rows.len();
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            if let Some(entry) = row.entry() {
                RowClass::Entry(entry)
            } else if row.is_blank() && index + 1 != count && count > 1 {
                RowClass::BlankRemovable
            } else {
                RowClass::Pending
            }
        })
        .collect()
}

/// Classify, prune, collect and grow in a single pass.
///
/// Classification runs once on the snapshot taken before any removal.
pub fn reconcile(store: &mut RowStore) -> Reconciliation {
    let classes = classify(store.list());

    let mut removed = Vec::new();
    let mut entries = Vec::new();
    for (row, class) in store.list().iter().zip(classes) {
        match class {
            RowClass::Entry(entry) => entries.push(entry),
            RowClass::BlankRemovable => removed.push(row.id),
            RowClass::Pending => {}
        }
    }

    for id in &removed {
        store.remove(*id);
    }

    let needs_trailing_row = store.last().is_none_or(|last| last.entry().is_some());
    let appended = needs_trailing_row.then(|| store.append().id);

    let outcome = Reconciliation {
        removed,
        appended,
        entries,
    };
    tracing::debug!(
        removed = outcome.removed.len(),
        appended = ?outcome.appended,
        entries = outcome.entries.len(),
        rows = store.len(),
        "reconciled rows"
    );
    outcome
}
