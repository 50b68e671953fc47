pub mod formatter;

pub use formatter::{
    format_day_status, format_entry_detail, format_evaluation, format_history,
    format_holiday_list, format_question_list, format_recovery_logs, format_score,
    should_use_colors,
};
