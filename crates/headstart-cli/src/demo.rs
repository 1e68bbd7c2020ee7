// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use headstart_app::{AppCommand, AppState, RowField, TabId};

const DEMO_TABS: [&[(&str, &str)]; 2] = [
    &[
        ("Avery", "95"),
        ("Jordan", "80"),
        ("Riley", "80"),
        ("Quinn", "62"),
    ],
    &[("Kai", "240"), ("Rowan", "18"), ("Hayden", "131")],
];

/// Type the demo entries through the same edit path the UI uses.
pub fn seed_demo(state: &mut AppState) -> Result<()> {
    for (index, rows) in DEMO_TABS.iter().enumerate() {
        let tab = TabId::new(index as u32 + 1);
        if state.tab(tab).is_none() {
            break;
        }
        for (name, seconds) in rows.iter() {
            let row = state
                .rows(tab)
                .last()
                .map(|row| row.id)
                .ok_or_else(|| anyhow!("tab {tab} lost its trailing row"))?;
            for (field, raw) in [(RowField::Name, *name), (RowField::Seconds, *seconds)] {
                state.dispatch(AppCommand::EditField {
                    tab,
                    row,
                    field,
                    raw: raw.to_owned(),
                });
            }
        }
    }
    tracing::debug!("seeded demo entries");
    Ok(())
}
