use serde::{Deserialize, Serialize};

/// Questionnaire section. Used only for grouping and averaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Section {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::A,
        Section::B,
        Section::C,
        Section::D,
        Section::E,
        Section::F,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Section::A => "A",
            Section::B => "B",
            Section::C => "C",
            Section::D => "D",
            Section::E => "E",
            Section::F => "F",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::A => "感情と所作",
            Section::B => "役割と信頼",
            Section::C => "型と余裕",
            Section::D => "判断の品位",
            Section::E => "重心",
            Section::F => "最終姿勢",
        }
    }
}

/// One choice of a select question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    /// Score in [0, 1] given when this option is chosen.
    pub normalized: f64,
}

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "options", rename_all = "snake_case")]
pub enum InputType {
    Boolean,
    /// Integer rating 1..=5.
    Likert5,
    Select(&'static [SelectOption]),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuestionDefinition {
    pub id: &'static str,
    pub section: Section,
    pub label: &'static str,
    pub input_type: InputType,
}

impl QuestionDefinition {
    pub fn options(&self) -> &'static [SelectOption] {
        match self.input_type {
            InputType::Select(options) => options,
            _ => &[],
        }
    }

    /// Short hint of the accepted answer shape, for prompts and listings.
    pub fn answer_hint(&self) -> String {
        match self.input_type {
            InputType::Boolean => "true/false".to_string(),
            InputType::Likert5 => "1-5".to_string(),
            InputType::Select(options) => options
                .iter()
                .map(|o| o.value)
                .collect::<Vec<_>>()
                .join("/"),
        }
    }
}
