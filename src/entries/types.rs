use anyhow::{bail, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::calendar::{date_key, parse_date_key};
use crate::scoring::{Evaluation, FlagSet, NormalizedAnswerMap, RawAnswerMap};

/// One day's check, keyed by its `YYYY-MM-DD` date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub date: String,
    #[serde(default)]
    pub is_night: bool,
    #[serde(default)]
    pub answers: RawAnswerMap,
    #[serde(default)]
    pub normalized: NormalizedAnswerMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feelings: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<String>,
    #[serde(default)]
    pub flags: FlagSet,
    #[serde(default)]
    pub suggestions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Free-text notes attached to an entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryNotes {
    pub facts: Option<String>,
    pub feelings: Option<String>,
    pub actions: Option<String>,
}

impl DailyEntry {
    pub fn new(
        date: NaiveDate,
        is_night: bool,
        answers: RawAnswerMap,
        evaluation: Evaluation,
        notes: EntryNotes,
    ) -> Self {
        let now = Utc::now();
        Self {
            date: date_key(date),
            is_night,
            answers,
            normalized: evaluation.normalized,
            facts: non_blank(notes.facts),
            feelings: non_blank(notes.feelings),
            actions: non_blank(notes.actions),
            flags: evaluation.flags,
            suggestions: evaluation.suggestions,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn naive_date(&self) -> Option<NaiveDate> {
        parse_date_key(&self.date)
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    #[default]
    None,
    Planned,
    Done,
}

impl RecoveryStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "" | "none" => Some(RecoveryStatus::None),
            "planned" => Some(RecoveryStatus::Planned),
            "done" => Some(RecoveryStatus::Done),
            _ => None,
        }
    }
}

impl fmt::Display for RecoveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecoveryStatus::None => "none",
            RecoveryStatus::Planned => "planned",
            RecoveryStatus::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryItem {
    pub name: String,
    #[serde(default)]
    pub status: RecoveryStatus,
    #[serde(default)]
    pub note: String,
}

impl RecoveryItem {
    /// Parse `NAME[:STATUS[:NOTE]]`. The status defaults to `planned`; the
    /// note keeps any further colons.
    pub fn parse(arg: &str) -> Result<Self> {
        let mut parts = arg.splitn(3, ':');
        let name = parts.next().unwrap_or_default().trim();
        if name.is_empty() {
            bail!("Missing recovery item name in '{}'", arg);
        }

        let status = match parts.next() {
            Some(raw) => match RecoveryStatus::parse(raw) {
                Some(status) => status,
                None => bail!(
                    "Unknown recovery status '{}' (expected none, planned or done)",
                    raw.trim()
                ),
            },
            None => RecoveryStatus::Planned,
        };

        Ok(Self {
            name: name.to_string(),
            status,
            note: parts.next().unwrap_or_default().trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryLog {
    pub date: String,
    #[serde(default)]
    pub items: Vec<RecoveryItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecoveryLog {
    pub fn new(date: NaiveDate, items: Vec<RecoveryItem>) -> Self {
        let now = Utc::now();
        Self {
            date: date_key(date),
            items,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Something stored once per calendar day.
pub trait Dated {
    fn date_key(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
    fn set_created_at(&mut self, at: DateTime<Utc>);
}

impl Dated for DailyEntry {
    fn date_key(&self) -> &str {
        &self.date
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn set_created_at(&mut self, at: DateTime<Utc>) {
        self.created_at = at;
    }
}

impl Dated for RecoveryLog {
    fn date_key(&self) -> &str {
        &self.date
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn set_created_at(&mut self, at: DateTime<Utc>) {
        self.created_at = at;
    }
}

/// Versioned on-disk collection with one record per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct DatedStore<T> {
    pub version: u32,
    #[serde(default)]
    pub records: BTreeMap<String, T>,
}

pub type EntryLog = DatedStore<DailyEntry>;
pub type RecoveryBook = DatedStore<RecoveryLog>;

impl<T> Default for DatedStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DatedStore<T> {
    pub fn new() -> Self {
        Self {
            version: 1,
            records: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get_by_date(&self, date: NaiveDate) -> Option<&T> {
        self.records.get(&date_key(date))
    }

    /// Newest first, at most `limit` records.
    pub fn list_recent(&self, limit: usize) -> Vec<&T> {
        self.records.values().rev().take(limit).collect()
    }

    /// Records dated on or after `since`, newest first.
    pub fn list_since(&self, since: NaiveDate) -> Vec<&T> {
        self.records
            .range(date_key(since)..)
            .rev()
            .map(|(_, record)| record)
            .collect()
    }
}

impl<T: Dated> DatedStore<T> {
    /// Insert or replace the record for its date. A replaced record keeps
    /// its original creation time.
    pub fn upsert(&mut self, mut record: T) {
        let key = record.date_key().to_string();
        if let Some(existing) = self.records.get(&key) {
            record.set_created_at(existing.created_at());
        }
        self.records.insert(key, record);
    }
}
