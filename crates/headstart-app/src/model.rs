// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowField {
    Name,
    Seconds,
}

impl RowField {
    pub const ALL: [Self; 2] = [Self::Name, Self::Seconds];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Seconds => "seconds",
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Name => Self::Seconds,
            Self::Seconds => Self::Name,
        }
    }
}

/// One editable (name, seconds) pair.
///
/// The raw text of both fields is kept so a view can echo exactly what was
/// typed; `name()` and `seconds()` are the interpreted values the engine
/// works from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRow {
    pub id: RowId,
    name_text: String,
    seconds_text: String,
    seconds: Option<i64>,
}

impl InputRow {
    pub fn blank(id: RowId) -> Self {
        Self {
            id,
            name_text: String::new(),
            seconds_text: String::new(),
            seconds: None,
        }
    }

    pub fn name(&self) -> &str {
        self.name_text.trim()
    }

    pub fn seconds(&self) -> Option<i64> {
        self.seconds
    }

    pub fn raw(&self, field: RowField) -> &str {
        match field {
            RowField::Name => &self.name_text,
            RowField::Seconds => &self.seconds_text,
        }
    }

    pub fn set(&mut self, field: RowField, raw: &str) {
        match field {
            RowField::Name => {
                self.name_text = raw.to_owned();
            }
            RowField::Seconds => {
                self.seconds_text = raw.to_owned();
                self.seconds = parse_seconds(raw);
            }
        }
    }

    /// Both fields empty: the only kind of row reconciliation may prune.
    pub fn is_blank(&self) -> bool {
        self.name().is_empty() && self.seconds.is_none()
    }

    pub fn entry(&self) -> Option<Entry> {
        if self.name().is_empty() {
            return None;
        }
        let seconds = u64::try_from(self.seconds?).ok()?;
        Some(Entry {
            name: self.name().to_owned(),
            seconds,
        })
    }
}

pub fn parse_seconds(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub seconds: u64,
}

impl Entry {
    pub fn new(name: impl Into<String>, seconds: u64) -> Self {
        Self {
            name: name.into(),
            seconds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionItem {
    pub name: String,
    pub offset_label: String,
}

impl ProjectionItem {
    pub fn new(name: impl Into<String>, offset_label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            offset_label: offset_label.into(),
        }
    }

    pub fn line(&self) -> String {
        format!("{} :{}", self.name, self.offset_label)
    }
}

#[cfg(test)]
mod tests {
    use super::{Entry, InputRow, RowField, parse_seconds};
    use crate::RowId;

    #[test]
    fn row_fields_cycle_in_column_order() {
        assert_eq!(RowField::ALL.map(RowField::as_str), ["name", "seconds"]);
        for field in RowField::ALL {
            assert_eq!(field.next().next(), field);
        }
        assert_eq!(RowField::Name.next(), RowField::Seconds);
    }

    #[test]
    fn seconds_parse_rejects_non_integers() {
        assert_eq!(parse_seconds("42"), Some(42));
        assert_eq!(parse_seconds(" 7 "), Some(7));
        assert_eq!(parse_seconds("-3"), Some(-3));
        assert_eq!(parse_seconds(""), None);
        assert_eq!(parse_seconds("4.5"), None);
        assert_eq!(parse_seconds("12abc"), None);
        assert_eq!(parse_seconds("99999999999999999999999"), None);
    }

    #[test]
    fn name_is_read_trimmed_but_raw_text_is_kept() {
        let mut row = InputRow::blank(RowId::new(1));
        row.set(RowField::Name, "  Ada ");
        assert_eq!(row.name(), "Ada");
        assert_eq!(row.raw(RowField::Name), "  Ada ");
    }

    #[test]
    fn whitespace_only_name_counts_as_blank() {
        let mut row = InputRow::blank(RowId::new(1));
        row.set(RowField::Name, "   ");
        assert!(row.is_blank());
    }

    #[test]
    fn entry_requires_name_and_non_negative_seconds() {
        let mut row = InputRow::blank(RowId::new(1));
        row.set(RowField::Name, "Ada");
        assert_eq!(row.entry(), None);

        row.set(RowField::Seconds, "-1");
        assert_eq!(row.entry(), None);
        assert!(!row.is_blank());

        row.set(RowField::Seconds, "0");
        assert_eq!(row.entry(), Some(Entry::new("Ada", 0)));
    }

    #[test]
    fn seconds_without_name_is_not_an_entry() {
        let mut row = InputRow::blank(RowId::new(1));
        row.set(RowField::Seconds, "12");
        assert_eq!(row.entry(), None);
        assert!(!row.is_blank());
    }
}
