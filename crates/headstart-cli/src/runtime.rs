// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};

/// Hands export text to the system clipboard.
#[derive(Default)]
pub struct ClipboardRuntime {
    // Kept alive between copies: on X11/Wayland the owner must outlive the
    // paste.
    clipboard: Option<arboard::Clipboard>,
}

impl ClipboardRuntime {
    pub fn new() -> Self {
        Self::default()
    }
}

impl headstart_tui::AppRuntime for ClipboardRuntime {
    fn write_clipboard(&mut self, text: &str) -> Result<()> {
        let clipboard = match self.clipboard.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new().context("open system clipboard")?,
        };
        let clipboard = self.clipboard.insert(clipboard);
        clipboard
            .set_text(text)
            .context("write text to system clipboard")?;
        tracing::info!(bytes = text.len(), "copied offsets to clipboard");
        Ok(())
    }
}
