// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{InputRow, RowField, RowId};

/// Ordered rows of one tab plus the id generator that feeds them.
///
/// Ids start at 1 and are never handed out twice, even after the row that
/// carried one has been removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowStore {
    rows: Vec<InputRow>,
    next_row_id: u32,
}

impl Default for RowStore {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_row_id: 1,
        }
    }
}

impl RowStore {
    /// A store holding the single empty row every tab starts with.
    pub fn new() -> Self {
        let mut store = Self::default();
        store.append();
        store
    }

    pub fn append(&mut self) -> &InputRow {
        let id = RowId::new(self.next_row_id);
        self.next_row_id += 1;
        let index = self.rows.len();
        self.rows.push(InputRow::blank(id));
        &self.rows[index]
    }

    pub fn remove(&mut self, id: RowId) {
        self.rows.retain(|row| row.id != id);
    }

    pub fn update(&mut self, id: RowId, field: RowField, raw: &str) {
        if let Some(row) = self.rows.iter_mut().find(|row| row.id == id) {
            row.set(field, raw);
        }
    }

    pub fn list(&self) -> &[InputRow] {
        &self.rows
    }

    pub fn get(&self, id: RowId) -> Option<&InputRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn position(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    pub fn last(&self) -> Option<&InputRow> {
        self.rows.last()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
