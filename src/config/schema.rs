use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::calendar::NightWindow;
use crate::questions::{DEFAULT_RECOVERY_MENU, QUESTION_DEFINITIONS};

/// User settings.
///
/// Example YAML:
/// ```yaml
/// night_start: "21:30"
/// night_end: "05:00"
/// recovery_menu: ["サウナ", "睡眠"]
/// questions_enabled:
///   F3: false
/// questions_skip_holiday:
///   B1: true
///   B2: true
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Start of the night window, `HH:MM` (default "20:00")
    #[serde(default = "default_night_start")]
    pub night_start: String,

    /// End of the night window, `HH:MM` (default "06:00")
    #[serde(default = "default_night_end")]
    pub night_end: String,

    /// Recovery activities offered when logging recovery
    #[serde(default = "default_recovery_menu")]
    pub recovery_menu: Vec<String>,

    /// Question id -> asked at all (default true)
    #[serde(default)]
    pub questions_enabled: BTreeMap<String, bool>,

    /// Question id -> skipped on weekends and holidays (default false)
    #[serde(default)]
    pub questions_skip_holiday: BTreeMap<String, bool>,

    /// Where entries and recovery logs are stored (defaults to the config dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

fn default_night_start() -> String {
    "20:00".to_string()
}

fn default_night_end() -> String {
    "06:00".to_string()
}

fn default_recovery_menu() -> Vec<String> {
    DEFAULT_RECOVERY_MENU.iter().map(|s| s.to_string()).collect()
}

fn toggle_map(
    source: &BTreeMap<String, bool>,
    default_value: bool,
) -> BTreeMap<String, bool> {
    QUESTION_DEFINITIONS
        .iter()
        .map(|q| {
            let value = source.get(q.id).copied().unwrap_or(default_value);
            (q.id.to_string(), value)
        })
        .collect()
}

impl Default for Settings {
    fn default() -> Self {
        let empty = BTreeMap::new();
        Self {
            night_start: default_night_start(),
            night_end: default_night_end(),
            recovery_menu: default_recovery_menu(),
            questions_enabled: toggle_map(&empty, true),
            questions_skip_holiday: toggle_map(&empty, false),
            data_dir: None,
        }
    }
}

impl Settings {
    /// Fill both question maps with an entry for every catalog id and drop
    /// ids the catalog does not know.
    pub fn normalized(mut self) -> Self {
        self.questions_enabled = toggle_map(&self.questions_enabled, true);
        self.questions_skip_holiday = toggle_map(&self.questions_skip_holiday, false);
        self
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        self.questions_enabled.get(id).copied().unwrap_or(true)
    }

    pub fn skips_on_holiday(&self, id: &str) -> bool {
        self.questions_skip_holiday.get(id).copied().unwrap_or(false)
    }

    pub fn night_window(&self) -> NightWindow {
        NightWindow::parse(&self.night_start, &self.night_end)
    }
}
