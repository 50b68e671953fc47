use std::collections::HashSet;

use super::types::{InputType, QuestionDefinition, Section, SelectOption};

const fn boolean(id: &'static str, section: Section, label: &'static str) -> QuestionDefinition {
    QuestionDefinition {
        id,
        section,
        label,
        input_type: InputType::Boolean,
    }
}

const fn likert(id: &'static str, section: Section, label: &'static str) -> QuestionDefinition {
    QuestionDefinition {
        id,
        section,
        label,
        input_type: InputType::Likert5,
    }
}

const RECOVERY_PAUSE_OPTIONS: &[SelectOption] = &[
    SelectOption { value: "none", label: "置かなかった", normalized: 0.0 },
    SelectOption { value: "short", label: "少し置いた", normalized: 0.5 },
    SelectOption { value: "scheduled", label: "予定にした", normalized: 1.0 },
];

/// `fixed` is the "rushed" answer that raises the rushed-conclusion flag.
const CONCLUSION_OPTIONS: &[SelectOption] = &[
    SelectOption { value: "fixed", label: "急いだ", normalized: 0.0 },
    SelectOption { value: "held", label: "保留した", normalized: 0.75 },
    SelectOption { value: "asked", label: "吟味した", normalized: 1.0 },
];

/// The questionnaire, in display order.
pub static QUESTION_DEFINITIONS: &[QuestionDefinition] = &[
    boolean("A1", Section::A, "感情を静かに言葉にした"),
    likert("A2", Section::A, "落ち着いた所作で動いた"),
    boolean("A3", Section::A, "自分で選んで動いた"),
    likert("B1", Section::B, "役割にふさわしく動いた"),
    likert("B2", Section::B, "信頼を優先して動いた"),
    boolean("B3", Section::B, "事実を確かめて動いた"),
    boolean("B4", Section::B, "言葉の品位を保った"),
    boolean("C1", Section::C, "型を崩さなかった"),
    QuestionDefinition {
        id: "C2",
        section: Section::C,
        label: "回復の間を置いた",
        input_type: InputType::Select(RECOVERY_PAUSE_OPTIONS),
    },
    boolean("C3", Section::C, "抱え込まなかった"),
    boolean("D1", Section::D, "事実だけ記した"),
    boolean("D2", Section::D, "推測と分けた"),
    QuestionDefinition {
        id: "D3",
        section: Section::D,
        label: "結論を急がなかった",
        input_type: InputType::Select(CONCLUSION_OPTIONS),
    },
    likert("E1", Section::E, "軸を自分に戻した"),
    likert("E2", Section::E, "重心を分散した"),
    boolean("E3", Section::E, "足場を整えた"),
    boolean("F1", Section::F, "感情を静かに扱った"),
    likert("F2", Section::F, "一貫した姿勢でいた"),
    boolean("F3", Section::F, "今宵はここまで"),
];

pub const DEFAULT_RECOVERY_MENU: &[&str] = &[
    "サウナ",
    "プログラミング",
    "文章",
    "睡眠",
    "運動",
    "誰かに話す",
    "その他",
];

pub fn find_question(id: &str) -> Option<&'static QuestionDefinition> {
    QUESTION_DEFINITIONS.iter().find(|q| q.id == id)
}

/// Check catalog invariants. Returns every violation, not just the first.
pub fn validate_catalog(questions: &[QuestionDefinition]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for question in questions {
        if !seen.insert(question.id) {
            errors.push(format!("question {}: duplicate id", question.id));
        }

        if let InputType::Select(options) = question.input_type {
            if options.is_empty() {
                errors.push(format!("question {}: select without options", question.id));
            }
            for option in options {
                if !(0.0..=1.0).contains(&option.normalized) {
                    errors.push(format!(
                        "question {}: option '{}' score {} outside [0, 1]",
                        question.id, option.value, option.normalized
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        assert!(validate_catalog(QUESTION_DEFINITIONS).is_ok());
        assert_eq!(QUESTION_DEFINITIONS.len(), 19);
    }

    #[test]
    fn test_every_section_has_questions() {
        for section in Section::ALL {
            assert!(
                QUESTION_DEFINITIONS.iter().any(|q| q.section == section),
                "section {} is empty",
                section.code()
            );
        }
    }

    #[test]
    fn test_find_question() {
        let d3 = find_question("D3").unwrap();
        assert_eq!(d3.section, Section::D);
        assert_eq!(d3.options().len(), 3);
        assert_eq!(d3.answer_hint(), "fixed/held/asked");
        assert!(find_question("Z9").is_none());
    }

    #[test]
    fn test_validate_catalog_collects_all_errors() {
        const BAD_OPTIONS: &[SelectOption] = &[SelectOption {
            value: "too-much",
            label: "",
            normalized: 1.5,
        }];
        let questions = [
            boolean("X1", Section::A, ""),
            boolean("X1", Section::A, ""),
            QuestionDefinition {
                id: "X2",
                section: Section::B,
                label: "",
                input_type: InputType::Select(&[]),
            },
            QuestionDefinition {
                id: "X3",
                section: Section::B,
                label: "",
                input_type: InputType::Select(BAD_OPTIONS),
            },
        ];
        let errors = validate_catalog(&questions).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("duplicate"));
        assert!(errors[1].contains("without options"));
        assert!(errors[2].contains("outside"));
    }
}
