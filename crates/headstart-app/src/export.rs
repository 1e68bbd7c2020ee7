// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::ProjectionItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Success,
    NothingToCopy,
    PlatformFailure(String),
}

impl ExportOutcome {
    pub fn message(&self) -> String {
        match self {
            Self::Success => "copied".to_owned(),
            Self::NothingToCopy => "nothing to copy".to_owned(),
            Self::PlatformFailure(reason) => format!("copy failed: {reason}"),
        }
    }
}

/// One `<name> :<offset>` line per item, no trailing newline.
pub fn export_text(items: &[ProjectionItem]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    Some(
        items
            .iter()
            .map(ProjectionItem::line)
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

pub fn export_projection<F>(items: &[ProjectionItem], write: F) -> ExportOutcome
where
    F: FnOnce(&str) -> Result<()>,
{
    let Some(text) = export_text(items) else {
        return ExportOutcome::NothingToCopy;
    };
    match write(&text) {
        Ok(()) => ExportOutcome::Success,
        Err(error) => {
            tracing::error!(error = %format!("{error:#}"), "clipboard write failed");
            ExportOutcome::PlatformFailure(error.to_string())
        }
    }
}
