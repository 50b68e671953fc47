use serde::{Deserialize, Serialize};

use super::answers::{RawAnswer, RawAnswerMap};

/// A behavioral risk signal, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    EmotionUnlabeled,
    TrustToneRisk,
    Hoarding,
    RushedConclusion,
    UnstableAxis,
}

impl Flag {
    pub const ALL: [Flag; 5] = [
        Flag::EmotionUnlabeled,
        Flag::TrustToneRisk,
        Flag::Hoarding,
        Flag::RushedConclusion,
        Flag::UnstableAxis,
    ];

    /// Wire name, as stored in entries.
    pub fn key(&self) -> &'static str {
        match self {
            Flag::EmotionUnlabeled => "emotionUnlabeled",
            Flag::TrustToneRisk => "trustToneRisk",
            Flag::Hoarding => "hoarding",
            Flag::RushedConclusion => "rushedConclusion",
            Flag::UnstableAxis => "unstableAxis",
        }
    }
}

/// Flags raised by one day's answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagSet {
    pub emotion_unlabeled: bool,
    pub trust_tone_risk: bool,
    pub hoarding: bool,
    pub rushed_conclusion: bool,
    pub unstable_axis: bool,
}

impl FlagSet {
    pub fn is_set(&self, flag: Flag) -> bool {
        match flag {
            Flag::EmotionUnlabeled => self.emotion_unlabeled,
            Flag::TrustToneRisk => self.trust_tone_risk,
            Flag::Hoarding => self.hoarding,
            Flag::RushedConclusion => self.rushed_conclusion,
            Flag::UnstableAxis => self.unstable_axis,
        }
    }

    /// Raised flags in canonical order.
    pub fn raised(&self) -> impl Iterator<Item = Flag> + '_ {
        Flag::ALL.into_iter().filter(move |flag| self.is_set(*flag))
    }

    pub fn any(&self) -> bool {
        self.raised().next().is_some()
    }
}

/// Derive flags from raw answers.
///
/// These rules look at specific questions and compare raw values exactly,
/// so a missing answer never raises the boolean flags while a missing or
/// textual E2 always raises `unstable_axis`.
pub fn detect_flags(answers: &RawAnswerMap) -> FlagSet {
    let flag_is = |id: &str, expected: bool| answers.get(id).is_some_and(|a| a.is_flag(expected));

    FlagSet {
        emotion_unlabeled: flag_is("A1", false),
        trust_tone_risk: flag_is("B4", false),
        hoarding: flag_is("C3", false),
        rushed_conclusion: answers.get("D3").is_some_and(|a| a.is_text("fixed")),
        unstable_axis: !matches!(
            answers.get("E2"),
            Some(RawAnswer::Number(n)) if *n == 4.0 || *n == 5.0
        ),
    }
}
