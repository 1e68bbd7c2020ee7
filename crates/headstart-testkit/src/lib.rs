// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use headstart_app::{AppCommand, AppState, InputRow, RowField, TabId};

const RUNNER_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];

const SECONDS_NOISE: [&str; 8] = ["", " ", "abc", "-5", "4.5", "1e3", "--", "+"];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// One scripted field edit. `row` is a position, resolved against the
/// tab's rows at the moment the step is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditStep {
    pub tab: TabId,
    pub row: usize,
    pub field: RowField,
    pub raw: String,
}

#[derive(Debug, Clone)]
pub struct EditFaker {
    rng: DeterministicRng,
}

impl EditFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn name(&mut self) -> String {
        match self.rng.int_n(6) {
            0 => String::new(),
            1 => "   ".to_owned(),
            _ => self.pick(&RUNNER_NAMES).to_owned(),
        }
    }

    pub fn seconds(&mut self) -> String {
        match self.rng.int_n(5) {
            0 => self.pick(&SECONDS_NOISE).to_owned(),
            1 => format!("{}", self.rng.int_n(400)),
            _ => format!("{}", self.rng.int_n(60)),
        }
    }

    /// A random edit against one of `tab_count` tabs; row positions may
    /// overshoot so scripts also exercise edits to rows that no longer exist.
    pub fn step(&mut self, tab_count: u32) -> EditStep {
        let tab = TabId::new(1 + self.rng.int_n(tab_count.max(1) as usize) as u32);
        let row = self.rng.int_n(6);
        let (field, raw) = if self.rng.bool() {
            (RowField::Name, self.name())
        } else {
            (RowField::Seconds, self.seconds())
        };
        EditStep {
            tab,
            row,
            field,
            raw,
        }
    }

    pub fn script(&mut self, tab_count: u32, len: usize) -> Vec<EditStep> {
        (0..len).map(|_| self.step(tab_count)).collect()
    }

    fn pick<'a>(&mut self, values: &'a [&'a str]) -> &'a str {
        values[self.rng.int_n(values.len())]
    }
}

/// Apply a step the way the terminal view would: edit the row at the given
/// position, or the trailing row when the position is past the end.
pub fn apply_step(state: &mut AppState, step: &EditStep) {
    let rows = state.rows(step.tab);
    let Some(row) = rows.get(step.row).or_else(|| rows.last()).map(|row| row.id) else {
        return;
    };
    state.dispatch(AppCommand::EditField {
        tab: step.tab,
        row,
        field: step.field,
        raw: step.raw.clone(),
    });
}

pub fn apply_script(state: &mut AppState, steps: &[EditStep]) {
    for step in steps {
        apply_step(state, step);
    }
}

/// Type `(name, seconds)` pairs into a tab's trailing row one after another.
pub fn fill_tab(state: &mut AppState, tab: TabId, rows: &[(&str, &str)]) -> Result<()> {
    for (name, seconds) in rows {
        let Some(row) = state.rows(tab).last().map(|row| row.id) else {
            bail!("tab {tab} has no rows to fill");
        };
        for (field, raw) in [(RowField::Name, name), (RowField::Seconds, seconds)] {
            state.dispatch(AppCommand::EditField {
                tab,
                row,
                field,
                raw: (*raw).to_owned(),
            });
        }
    }
    Ok(())
}

/// Check the row-shape invariants that must hold after every reconciliation.
pub fn check_row_invariants(rows: &[InputRow]) -> Result<()> {
    let Some(last) = rows.last() else {
        bail!("store is empty");
    };
    for (index, row) in rows.iter().enumerate() {
        if row.is_blank() && index + 1 != rows.len() {
            bail!("blank row {} at position {index} is not the last row", row.id);
        }
    }
    if last.entry().is_some() {
        bail!("last row {} is a complete entry with no trailing row", last.id);
    }
    for pair in rows.windows(2) {
        if pair[0].id >= pair[1].id {
            bail!("row ids out of order: {} before {}", pair[0].id, pair[1].id);
        }
    }
    Ok(())
}
