// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Entry, ProjectionItem};

pub const BASELINE_LABEL: &str = "00";

/// Sort entries slowest-first and label each with its distance from the
/// slowest one.
pub fn recompute(entries: &[Entry]) -> Vec<ProjectionItem> {
    let mut sorted = entries.iter().collect::<Vec<_>>();
    // Vec::sort_by is stable, so equal seconds keep their input order.
    sorted.sort_by(|left, right| right.seconds.cmp(&left.seconds));

    let Some(max_seconds) = sorted.first().map(|entry| entry.seconds) else {
        return Vec::new();
    };

    let mut items = sorted
        .into_iter()
        .map(|entry| {
            ProjectionItem::new(
                entry.name.clone(),
                format_offset(entry.seconds.abs_diff(max_seconds)),
            )
        })
        .collect::<Vec<_>>();
    if let Some(first) = items.first_mut() {
        first.offset_label = BASELINE_LABEL.to_owned();
    }
    items
}

pub fn format_offset(offset: u64) -> String {
    format!("{offset:02}")
}
