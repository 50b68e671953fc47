use serde::Serialize;
use std::collections::BTreeMap;

use super::answers::{NormalizedAnswerMap, RawAnswer, RawAnswerMap};
use super::flags::{detect_flags, FlagSet};
use super::suggestions::{generate_suggestions, SuggestionContext};
use crate::questions::{InputType, QuestionDefinition, Section};

/// Section -> mean normalized score of its questions.
pub type SectionAverages = BTreeMap<Section, f64>;

/// Everything derived from one day's answers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub normalized: NormalizedAnswerMap,
    pub section_averages: SectionAverages,
    pub overall: f64,
    pub flags: FlagSet,
    pub suggestions: Vec<String>,
}

/// Score one answer on [0, 1]. Anything unusable scores 0.
pub fn normalize_answer(question: &QuestionDefinition, answer: Option<&RawAnswer>) -> f64 {
    match question.input_type {
        InputType::Boolean => {
            if answer.is_some_and(|a| a.is_flag(true)) {
                1.0
            } else {
                0.0
            }
        }
        InputType::Likert5 => match answer.and_then(RawAnswer::as_number) {
            Some(value) if value.is_finite() && (1.0..=5.0).contains(&value) => (value - 1.0) / 4.0,
            _ => 0.0,
        },
        InputType::Select(options) => answer
            .and_then(|a| match a {
                RawAnswer::Text(value) => options.iter().find(|o| o.value == value),
                _ => None,
            })
            .map_or(0.0, |option| option.normalized),
    }
}

/// Normalize every question's answer. The result has an entry for each
/// question, answered or not.
pub fn normalize_answers(
    questions: &[QuestionDefinition],
    answers: &RawAnswerMap,
) -> NormalizedAnswerMap {
    questions
        .iter()
        .map(|q| (q.id.to_string(), normalize_answer(q, answers.get(q.id))))
        .collect()
}

/// Average normalized scores per section. Questions missing from
/// `normalized` count as 0.
pub fn calculate_section_averages(
    questions: &[QuestionDefinition],
    normalized: &NormalizedAnswerMap,
) -> SectionAverages {
    let mut buckets: BTreeMap<Section, Vec<f64>> = BTreeMap::new();
    for question in questions {
        let score = normalized.get(question.id).copied().unwrap_or(0.0);
        buckets.entry(question.section).or_default().push(score);
    }

    buckets
        .into_iter()
        .map(|(section, scores)| {
            let average = if scores.is_empty() {
                0.0
            } else {
                scores.iter().sum::<f64>() / scores.len() as f64
            };
            (section, average)
        })
        .collect()
}

/// Unweighted mean of the section averages, 0 when there are none.
pub fn compute_overall_score(section_averages: &SectionAverages) -> f64 {
    if section_averages.is_empty() {
        return 0.0;
    }
    section_averages.values().sum::<f64>() / section_averages.len() as f64
}

/// Run the full pipeline for the given questions.
pub fn evaluate(questions: &[QuestionDefinition], answers: &RawAnswerMap) -> Evaluation {
    let normalized = normalize_answers(questions, answers);
    let section_averages = calculate_section_averages(questions, &normalized);
    let overall = compute_overall_score(&section_averages);
    let flags = detect_flags(answers);
    let suggestions = generate_suggestions(SuggestionContext {
        flags: &flags,
        section_averages: &section_averages,
        answers,
    });

    Evaluation {
        normalized,
        section_averages,
        overall,
        flags,
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::{find_question, SelectOption, QUESTION_DEFINITIONS};
    use crate::scoring::suggestions::ALL_CLEAR;

    fn pick(ids: &[&str]) -> Vec<QuestionDefinition> {
        ids.iter().map(|id| *find_question(id).unwrap()).collect()
    }

    fn answers(pairs: &[(&str, RawAnswer)]) -> RawAnswerMap {
        pairs
            .iter()
            .map(|(id, a)| (id.to_string(), a.clone()))
            .collect()
    }

    #[test]
    fn test_normalizes_boolean_likert_and_select() {
        let questions = pick(&["A1", "A2", "C2"]);
        let normalized = normalize_answers(
            &questions,
            &answers(&[
                ("A1", RawAnswer::Flag(true)),
                ("A2", RawAnswer::Number(5.0)),
                ("C2", RawAnswer::Text("short".to_string())),
            ]),
        );
        assert_eq!(normalized["A1"], 1.0);
        assert_eq!(normalized["A2"], 1.0);
        assert_eq!(normalized["C2"], 0.5);
    }

    #[test]
    fn test_boolean_only_true_scores() {
        let q = find_question("A1").unwrap();
        assert_eq!(normalize_answer(q, Some(&RawAnswer::Flag(true))), 1.0);
        assert_eq!(normalize_answer(q, Some(&RawAnswer::Flag(false))), 0.0);
        assert_eq!(normalize_answer(q, Some(&RawAnswer::Text("true".to_string()))), 0.0);
        assert_eq!(normalize_answer(q, Some(&RawAnswer::Number(1.0))), 0.0);
        assert_eq!(normalize_answer(q, None), 0.0);
    }

    #[test]
    fn test_likert_scale() {
        let q = find_question("A2").unwrap();
        let score = |a: RawAnswer| normalize_answer(q, Some(&a));
        assert_eq!(score(RawAnswer::Number(1.0)), 0.0);
        assert_eq!(score(RawAnswer::Number(3.0)), 0.5);
        assert_eq!(score(RawAnswer::Number(5.0)), 1.0);
        assert_eq!(score(RawAnswer::Number(7.0)), 0.0);
        assert_eq!(score(RawAnswer::Number(0.0)), 0.0);
        assert_eq!(score(RawAnswer::Number(f64::NAN)), 0.0);
        assert_eq!(score(RawAnswer::Text("4".to_string())), 0.75);
        assert_eq!(score(RawAnswer::Text("four".to_string())), 0.0);
        assert_eq!(score(RawAnswer::Flag(true)), 0.0);
        assert_eq!(normalize_answer(q, None), 0.0);
    }

    #[test]
    fn test_select_matches_exact_value() {
        let q = find_question("D3").unwrap();
        let score = |a: RawAnswer| normalize_answer(q, Some(&a));
        assert_eq!(score(RawAnswer::Text("held".to_string())), 0.75);
        assert_eq!(score(RawAnswer::Text("asked".to_string())), 1.0);
        assert_eq!(score(RawAnswer::Text("fixed".to_string())), 0.0);
        assert_eq!(score(RawAnswer::Text("Held".to_string())), 0.0);
        assert_eq!(score(RawAnswer::Number(1.0)), 0.0);
    }

    #[test]
    fn test_custom_select_question() {
        const OPTIONS: &[SelectOption] = &[
            SelectOption { value: "low", label: "", normalized: 0.2 },
            SelectOption { value: "high", label: "", normalized: 0.9 },
        ];
        let q = QuestionDefinition {
            id: "X1",
            section: Section::A,
            label: "",
            input_type: InputType::Select(OPTIONS),
        };
        assert_eq!(normalize_answer(&q, Some(&RawAnswer::Text("high".to_string()))), 0.9);
        assert_eq!(normalize_answer(&q, Some(&RawAnswer::Text("mid".to_string()))), 0.0);
    }

    #[test]
    fn test_normalize_covers_every_question() {
        let normalized = normalize_answers(QUESTION_DEFINITIONS, &RawAnswerMap::new());
        assert_eq!(normalized.len(), QUESTION_DEFINITIONS.len());
        assert!(normalized.values().all(|v| *v == 0.0));
    }

    #[test]
    fn test_section_averages() {
        let questions = pick(&["A1", "A2", "A3", "C2"]);
        let mut normalized = NormalizedAnswerMap::new();
        normalized.insert("A1".to_string(), 1.0);
        normalized.insert("A2".to_string(), 0.5);
        // A3 missing counts as 0
        normalized.insert("C2".to_string(), 0.5);

        let averages = calculate_section_averages(&questions, &normalized);
        assert_eq!(averages.len(), 2);
        assert_eq!(averages[&Section::A], 0.5);
        assert_eq!(averages[&Section::C], 0.5);
        assert!(!averages.contains_key(&Section::B));
    }

    #[test]
    fn test_overall_score() {
        assert_eq!(compute_overall_score(&SectionAverages::new()), 0.0);

        let mut averages = SectionAverages::new();
        averages.insert(Section::A, 1.0);
        averages.insert(Section::B, 0.5);
        averages.insert(Section::C, 0.0);
        assert_eq!(compute_overall_score(&averages), 0.5);
    }

    #[test]
    fn test_evaluate_perfect_day() {
        let mut raw = RawAnswerMap::new();
        for q in QUESTION_DEFINITIONS {
            let answer = match q.input_type {
                InputType::Boolean => RawAnswer::Flag(true),
                InputType::Likert5 => RawAnswer::Number(5.0),
                InputType::Select(options) => {
                    RawAnswer::Text(options.last().unwrap().value.to_string())
                }
            };
            raw.insert(q.id.to_string(), answer);
        }

        let evaluation = evaluate(QUESTION_DEFINITIONS, &raw);
        assert_eq!(evaluation.overall, 1.0);
        assert_eq!(evaluation.section_averages.len(), 6);
        assert!(!evaluation.flags.any());
        assert_eq!(evaluation.suggestions, vec![ALL_CLEAR.to_string()]);
    }

    #[test]
    fn test_evaluate_empty_answers() {
        let evaluation = evaluate(QUESTION_DEFINITIONS, &RawAnswerMap::new());
        assert_eq!(evaluation.overall, 0.0);
        // Only E2 can be raised by a missing answer
        assert!(evaluation.flags.unstable_axis);
        assert_eq!(evaluation.suggestions.len(), 1);
    }

    #[test]
    fn test_unasked_answer_flags_but_does_not_score() {
        let questions = pick(&["A2"]);
        let raw = answers(&[
            ("A2", RawAnswer::Number(5.0)),
            ("A1", RawAnswer::Flag(false)),
            ("E2", RawAnswer::Number(5.0)),
        ]);

        let evaluation = evaluate(&questions, &raw);
        assert_eq!(evaluation.overall, 1.0);
        assert!(!evaluation.normalized.contains_key("A1"));
        assert!(evaluation.flags.emotion_unlabeled);
    }

    #[test]
    fn test_evaluate_no_questions() {
        let evaluation = evaluate(&[], &RawAnswerMap::new());
        assert!(evaluation.normalized.is_empty());
        assert!(evaluation.section_averages.is_empty());
        assert_eq!(evaluation.overall, 0.0);
    }
}
