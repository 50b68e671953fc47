use super::answers::RawAnswerMap;
use super::engine::SectionAverages;
use super::flags::{Flag, FlagSet};

pub const MAX_SUGGESTIONS: usize = 3;

/// Shown when no flag is raised.
pub const ALL_CLEAR: &str = "今日は整っている。そのままで大丈夫。";

/// What suggestion selection may look at. Only the flags decide the current
/// wording; averages and raw answers are passed along for richer rules.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionContext<'a> {
    pub flags: &'a FlagSet,
    pub section_averages: &'a SectionAverages,
    pub answers: &'a RawAnswerMap,
}

impl Flag {
    pub fn suggestion(&self) -> &'static str {
        match self {
            Flag::EmotionUnlabeled => "感情に名前を置くだけで、距離ができる。",
            Flag::TrustToneRisk => "言葉の品位は、静かな信頼をつくる。",
            Flag::Hoarding => "余白を少し先に置くと、動きが整う。",
            Flag::RushedConclusion => "結論を急がないと、視野が広がる。",
            Flag::UnstableAxis => "重心を分けると、判断は軽くなる。",
        }
    }
}

/// One line per raised flag in canonical order, at most [`MAX_SUGGESTIONS`].
/// With nothing raised the result is exactly [`ALL_CLEAR`].
pub fn generate_suggestions(ctx: SuggestionContext<'_>) -> Vec<String> {
    let mut suggestions: Vec<String> = ctx
        .flags
        .raised()
        .take(MAX_SUGGESTIONS)
        .map(|flag| flag.suggestion().to_string())
        .collect();

    if suggestions.is_empty() {
        suggestions.push(ALL_CLEAR.to_string());
    }
    suggestions
}
