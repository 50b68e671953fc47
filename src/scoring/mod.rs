pub mod answers;
pub mod engine;
pub mod flags;
pub mod suggestions;

pub use answers::{parse_answer_arg, NormalizedAnswerMap, RawAnswer, RawAnswerMap};
pub use engine::{
    calculate_section_averages, compute_overall_score, evaluate, normalize_answer,
    normalize_answers, Evaluation, SectionAverages,
};
pub use flags::{detect_flags, Flag, FlagSet};
pub use suggestions::{generate_suggestions, SuggestionContext, ALL_CLEAR, MAX_SUGGESTIONS};
